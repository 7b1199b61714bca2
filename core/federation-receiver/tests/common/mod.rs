//! Shared test helpers: fixed key pairs and an in-memory host.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{LazyLock, Mutex};

use federation_crypto::{PrivateKey, PublicKey};
use federation_model::{Entity, FederationHost, HostError, RelatedEntity};

pub const TEST_KEY_BITS: usize = 1024;

pub const ALICE: &str = "alice@pod.example";
pub const BOB: &str = "bob@remote.example";
pub const CAROL: &str = "carol@third.example";

pub const POST_GUID: &str = "0123456789abcdef0123456789abcdef";
pub const COMMENT_GUID: &str = "fedcba9876543210fedcba9876543210";

static ALICE_KEY: LazyLock<PrivateKey> =
    LazyLock::new(|| PrivateKey::generate(TEST_KEY_BITS).unwrap());
static BOB_KEY: LazyLock<PrivateKey> =
    LazyLock::new(|| PrivateKey::generate(TEST_KEY_BITS).unwrap());
static CAROL_KEY: LazyLock<PrivateKey> =
    LazyLock::new(|| PrivateKey::generate(TEST_KEY_BITS).unwrap());

pub fn alice_key() -> &'static PrivateKey {
    &ALICE_KEY
}

pub fn bob_key() -> &'static PrivateKey {
    &BOB_KEY
}

pub fn carol_key() -> &'static PrivateKey {
    &CAROL_KEY
}

/// In-memory host; everything unknown resolves to `None`.
#[derive(Default)]
pub struct FakeHost {
    private_keys: HashMap<String, PrivateKey>,
    public_keys: HashMap<String, PublicKey>,
    post_public_keys: HashMap<String, PublicKey>,
    post_private_keys: HashMap<String, PrivateKey>,
    related: HashMap<(String, String), RelatedEntity>,
    local_posts: HashSet<String>,
    rejection: Option<String>,
    pub received: Mutex<Vec<(Entity, String, Option<String>)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A person hosted on this pod: both keys known.
    pub fn with_local_person(mut self, id: &str, key: &PrivateKey) -> Self {
        self.private_keys.insert(id.to_string(), key.clone());
        self.public_keys.insert(id.to_string(), key.public_key());
        self
    }

    /// A remote person: only the public key is known.
    pub fn with_remote_person(mut self, id: &str, key: &PrivateKey) -> Self {
        self.public_keys.insert(id.to_string(), key.public_key());
        self
    }

    pub fn with_post_public_key(mut self, guid: &str, key: &PrivateKey) -> Self {
        self.post_public_keys.insert(guid.to_string(), key.public_key());
        self
    }

    pub fn with_post_private_key(mut self, guid: &str, key: &PrivateKey) -> Self {
        self.post_private_keys.insert(guid.to_string(), key.clone());
        self
    }

    pub fn with_related(mut self, entity_type: &str, guid: &str, related: RelatedEntity) -> Self {
        self.related
            .insert((entity_type.to_string(), guid.to_string()), related);
        self
    }

    pub fn with_local_post(mut self, guid: &str) -> Self {
        self.local_posts.insert(guid.to_string());
        self
    }

    /// Makes `receive_entity` fail with `message`.
    pub fn with_rejection(mut self, message: &str) -> Self {
        self.rejection = Some(message.to_string());
        self
    }

    pub fn received(&self) -> Vec<(Entity, String, Option<String>)> {
        self.received.lock().unwrap().clone()
    }
}

impl FederationHost for FakeHost {
    fn fetch_public_key(&self, diaspora_id: &str) -> Option<PublicKey> {
        self.public_keys.get(diaspora_id).cloned()
    }

    fn fetch_private_key(&self, diaspora_id: &str) -> Option<PrivateKey> {
        self.private_keys.get(diaspora_id).cloned()
    }

    fn fetch_public_key_by_post_guid(&self, guid: &str) -> Option<PublicKey> {
        self.post_public_keys.get(guid).cloned()
    }

    fn fetch_private_key_by_post_guid(&self, guid: &str) -> Option<PrivateKey> {
        self.post_private_keys.get(guid).cloned()
    }

    fn post_author_is_local(&self, guid: &str) -> bool {
        self.local_posts.contains(guid)
    }

    fn fetch_related_entity(&self, entity_type: &str, guid: &str) -> Option<RelatedEntity> {
        self.related
            .get(&(entity_type.to_string(), guid.to_string()))
            .cloned()
    }

    fn receive_entity(
        &self,
        entity: Entity,
        sender: &str,
        recipient_id: Option<&str>,
    ) -> Result<(), HostError> {
        if let Some(message) = &self.rejection {
            return Err(HostError(message.clone()));
        }
        self.received.lock().unwrap().push((
            entity,
            sender.to_string(),
            recipient_id.map(str::to_string),
        ));
        Ok(())
    }
}
