//! An on-disk key directory acting as the federation host.
//!
//! Keys live side by side as `<diaspora_id>.pem` (private) and
//! `<diaspora_id>.pub.pem` (public). A person with only a public key file
//! is treated as remote.
//!
//! Parents that relayables may refer to are recorded under
//! `parents/<guid>.json` with their type, author and visibility.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use federation_crypto::{PrivateKey, PublicKey};
use federation_model::{Entity, FederationHost, HostError, RelatedEntity};
use federation_types::{DiasporaId, Guid};
use serde_json::{Value as Json, json};
use tracing::{debug, info};

const PARENTS_DIR: &str = "parents";

/// A parent entity known to this directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRecord {
    /// Class name, e.g. `Post`.
    pub entity_type: String,
    pub author: String,
    /// Whether the author's pod is this one.
    pub local: bool,
    pub public: bool,
}

/// An entity handed over by the receivers, with its sender and recipient.
pub type Received = (Entity, String, Option<String>);

pub struct KeyDirectory {
    root: PathBuf,
    received: Mutex<Vec<Received>>,
}

impl KeyDirectory {
    /// Opens `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create key directory {}", root.display()))?;
        Ok(Self {
            root,
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn private_key_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.pem", checked_id(id)?)))
    }

    pub fn public_key_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.pub.pem", checked_id(id)?)))
    }

    /// Generates a key pair for `id` and writes both files.
    pub fn generate(&self, id: &str, bits: usize) -> Result<PathBuf> {
        let private_path = self.private_key_path(id)?;
        if private_path.exists() {
            anyhow::bail!("A key for {id} already exists at {}", private_path.display());
        }
        info!("Generating {bits}-bit key for {id}");
        let key = PrivateKey::generate(bits).context("Failed to generate key")?;
        fs::write(&private_path, key.to_pem()?.as_bytes())
            .with_context(|| format!("Failed to write {}", private_path.display()))?;
        let public_path = self.public_key_path(id)?;
        fs::write(&public_path, key.public_key().to_pem()?)
            .with_context(|| format!("Failed to write {}", public_path.display()))?;
        Ok(private_path)
    }

    pub fn load_private(&self, id: &str) -> Result<PrivateKey> {
        let path = self.private_key_path(id)?;
        let pem = fs::read_to_string(&path)
            .with_context(|| format!("No private key for {id} at {}", path.display()))?;
        PrivateKey::from_pem(&pem).with_context(|| format!("Invalid private key in {}", path.display()))
    }

    /// The public key file, or the public half of the private key.
    pub fn load_public(&self, id: &str) -> Result<PublicKey> {
        let path = self.public_key_path(id)?;
        match fs::read_to_string(&path) {
            Ok(pem) => PublicKey::from_pem(&pem)
                .with_context(|| format!("Invalid public key in {}", path.display())),
            Err(_) => self.load_private(id).map(|key| key.public_key()),
        }
    }

    /// Drains what the receivers handed over so far.
    pub fn take_received(&self) -> Result<Vec<Received>> {
        let mut received = self
            .received
            .lock()
            .map_err(|_| anyhow!("Received list poisoned"))?;
        Ok(std::mem::take(&mut *received))
    }

    pub fn parent_path(&self, guid: &str) -> Result<PathBuf> {
        let guid = Guid::parse(guid).with_context(|| format!("{guid:?} is not a GUID"))?;
        Ok(self.root.join(PARENTS_DIR).join(format!("{}.json", guid.as_str())))
    }

    /// Records the parent with `guid`, replacing an earlier record.
    pub fn add_parent(&self, guid: &str, record: &ParentRecord) -> Result<PathBuf> {
        checked_id(&record.author)?;
        let path = self.parent_path(guid)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let body = json!({
            "entity_type": record.entity_type,
            "author": record.author,
            "local": record.local,
            "public": record.public,
        });
        fs::write(&path, serde_json::to_string_pretty(&body)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Recorded {} {guid} by {}", record.entity_type, record.author);
        Ok(path)
    }

    /// The recorded parent with `guid`, if any.
    pub fn load_parent(&self, guid: &str) -> Result<Option<ParentRecord>> {
        let path = self.parent_path(guid)?;
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        let body: Json =
            serde_json::from_str(&body).with_context(|| format!("Invalid parent record {}", path.display()))?;
        let text = |key: &str| {
            body.get(key)
                .and_then(Json::as_str)
                .map(str::to_string)
                .with_context(|| format!("Parent record {} lacks {key}", path.display()))
        };
        Ok(Some(ParentRecord {
            entity_type: text("entity_type")?,
            author: text("author")?,
            local: body.get("local").and_then(Json::as_bool).unwrap_or(false),
            public: body.get("public").and_then(Json::as_bool).unwrap_or(true),
        }))
    }
}

fn checked_id(id: &str) -> Result<String> {
    let id = DiasporaId::parse(id).with_context(|| format!("{id:?} is not a diaspora ID"))?;
    Ok(id.as_str().to_string())
}

impl FederationHost for KeyDirectory {
    fn fetch_public_key(&self, diaspora_id: &str) -> Option<PublicKey> {
        self.load_public(diaspora_id)
            .inspect_err(|e| debug!("{e:#}"))
            .ok()
    }

    fn fetch_private_key(&self, diaspora_id: &str) -> Option<PrivateKey> {
        self.load_private(diaspora_id)
            .inspect_err(|e| debug!("{e:#}"))
            .ok()
    }

    fn post_author_is_local(&self, guid: &str) -> bool {
        match self.load_parent(guid) {
            Ok(record) => record.is_some_and(|record| record.local),
            Err(e) => {
                debug!("{e:#}");
                false
            }
        }
    }

    fn fetch_related_entity(&self, entity_type: &str, guid: &str) -> Option<RelatedEntity> {
        match self.load_parent(guid) {
            Ok(Some(record)) if record.entity_type == entity_type => {
                Some(RelatedEntity::new(record.author, record.local, record.public))
            }
            Ok(Some(record)) => {
                debug!("{guid} is recorded as {}, not {entity_type}", record.entity_type);
                None
            }
            Ok(None) => {
                debug!("Key directory knows no {entity_type} {guid}");
                None
            }
            Err(e) => {
                debug!("{e:#}");
                None
            }
        }
    }

    fn receive_entity(
        &self,
        entity: Entity,
        sender: &str,
        recipient_id: Option<&str>,
    ) -> Result<(), HostError> {
        self.received
            .lock()
            .map_err(|_| HostError("received list poisoned".into()))?
            .push((entity, sender.to_string(), recipient_id.map(str::to_string)));
        Ok(())
    }
}
