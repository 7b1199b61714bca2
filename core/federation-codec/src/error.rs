//! Error types for the codecs.

use federation_model::{LookupError, SignatureError, ValidationError};
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding entities.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The entity type tag contains characters no entity name can have.
    #[error("invalid entity name: {0}")]
    InvalidEntityName(String),

    /// The entity type tag is well-formed but not registered.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The document root is not an entity or a known wrapper.
    #[error("invalid root node: {0}")]
    InvalidRootNode(String),

    /// The document is well-formed but not shaped like an entity.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// The decoded values failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A signature could not be produced or verified.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<LookupError> for CodecError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidEntityName(name) => Self::InvalidEntityName(name),
            LookupError::UnknownEntity(name) => Self::UnknownEntity(name),
        }
    }
}

impl From<quick_xml::Error> for CodecError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}
