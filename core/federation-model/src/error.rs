//! Error types for the entity model.

use std::fmt;
use thiserror::Error;

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Property name; nested properties are reported as `parent.child`.
    pub property: String,
    /// The offending value in wire form, `None` if it was absent.
    pub value: Option<String>,
    /// Stable rule key, e.g. `required`, `guid`, `length`.
    pub rule: &'static str,
    /// Rule parameters, e.g. `[("maximum", "255")]`.
    pub params: Vec<(&'static str, String)>,
}

impl Violation {
    pub(crate) fn new(property: impl Into<String>, value: Option<String>, rule: &'static str) -> Self {
        Self {
            property: property.into(),
            value,
            rule,
            params: Vec::new(),
        }
    }

    pub(crate) fn with_params(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.params = params;
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {:?} ({}", self.property, value, self.rule)?,
            None => write!(f, "{}: nil ({}", self.property, self.rule)?,
        }
        for (name, param) in &self.params {
            write!(f, " {name}={param}")?;
        }
        f.write_str(")")
    }
}

/// Entity construction failed; lists every violated rule, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed validation for {entity}: {}", join_violations(.violations))]
pub struct ValidationError {
    /// Snake case name of the entity type.
    pub entity: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Names of the properties reported as missing.
    pub fn missing_properties(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| v.rule == "required")
            .map(|v| v.property.as_str())
            .collect()
    }

    /// Returns true if `property` failed `rule`.
    pub fn has(&self, property: &str, rule: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.property == property && v.rule == rule)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A schema definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("'{0}' is not a valid entity name")]
    InvalidName(String),

    #[error("{entity}: property {property} is declared twice")]
    DuplicateProperty { entity: String, property: String },

    #[error("{entity}: wire name {wire_name} is used twice")]
    DuplicateWireName { entity: String, wire_name: String },

    #[error("{entity}: default of {property} does not match its type")]
    IllTypedDefault { entity: String, property: String },

    #[error("{entity}: rule for undeclared property {property}")]
    UnknownRuleProperty { entity: String, property: String },

    #[error("{entity}: required property {property} is not declared")]
    MissingProperty { entity: String, property: String },

    #[error("entity type {0} is already registered")]
    DuplicateEntity(String),
}

/// A wire tag could not be mapped to a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("'{0}' is not a valid entity name")]
    InvalidEntityName(String),

    #[error("unknown entity type: {0}")]
    UnknownEntity(String),
}

/// Signing or verifying an entity failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The host has no public key for this person.
    #[error("public key not found for {0}")]
    PublicKeyNotFound(String),

    /// An outbound entity cannot be signed because its author's key is unknown.
    #[error("private key not found for author {0}")]
    AuthorPrivateKeyNotFound(String),

    /// The signature does not match the signed data.
    #[error("{field} verification failed for {entity} {guid}")]
    SignatureVerificationFailed {
        entity: String,
        guid: String,
        field: &'static str,
    },

    /// A relayable's parent could not be resolved.
    #[error("parent {parent_type} {guid} not found")]
    ParentNotFound { parent_type: String, guid: String },
}

/// A host callback reported a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host callback failed: {0}")]
pub struct HostError(pub String);
