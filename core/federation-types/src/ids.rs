//! Identifier types used on the federation wire.
//!
//! A diaspora ID addresses a person on their home pod (`alice@pod.example:3000`),
//! a GUID addresses a single entity instance across all pods.

use crate::Error;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;

/// Upper bound for both diaspora IDs and GUIDs.
const MAX_LENGTH: usize = 255;

/// Lower bound for GUIDs.
const MIN_GUID_LENGTH: usize = 16;

static DIASPORA_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let label = r"[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?";
    let hostname = format!(r"(?:{label}\.)*{label}");
    let ipv6 = r"\[[0-9a-fA-F:.]+\]";
    Regex::new(&format!(r"^([a-z0-9_.\-]+)@((?:{hostname})|(?:{ipv6}))(?::([0-9]{{1,5}}))?$"))
        .expect("diaspora ID pattern is valid")
});

static GUID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z\-_@.:]+$").expect("GUID pattern is valid"));

/// A person's federation address: `username@host[:port]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiasporaId(String);

impl DiasporaId {
    /// Parses and validates a diaspora ID.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidDiasporaId(s.to_string()))
        }
    }

    /// Returns true if `s` is a syntactically valid diaspora ID.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.len() <= MAX_LENGTH && DIASPORA_ID_REGEX.is_match(s)
    }

    /// The part before the `@`.
    #[must_use]
    pub fn username(&self) -> &str {
        self.0.split_once('@').map_or("", |(user, _)| user)
    }

    /// The host part including the port, if any.
    #[must_use]
    pub fn host(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, host)| host)
    }

    /// Base URL of the person's home pod.
    #[must_use]
    pub fn pod_url(&self) -> String {
        format!("https://{}/", self.host())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiasporaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DiasporaId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DiasporaId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidDiasporaId(value))
        }
    }
}

impl From<DiasporaId> for String {
    fn from(id: DiasporaId) -> Self {
        id.0
    }
}

impl AsRef<str> for DiasporaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Globally unique identifier of an entity instance.
///
/// Locally generated GUIDs are 32 lowercase hex characters; remote pods may
/// use any 16..=255 characters of `[0-9a-z\-_@.:]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Guid(String);

impl Guid {
    /// Generates a new random GUID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parses and validates a GUID.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidGuid(s.to_string()))
        }
    }

    /// Returns true if `s` is an acceptable GUID.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        (MIN_GUID_LENGTH..=MAX_LENGTH).contains(&s.len()) && GUID_REGEX.is_match(s)
    }

    /// Returns the GUID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Guid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidGuid(value))
        }
    }
}

impl From<Guid> for String {
    fn from(guid: Guid) -> Self {
        guid.0
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
