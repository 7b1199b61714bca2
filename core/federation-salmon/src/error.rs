//! Error types for the envelope layer.

use federation_codec::CodecError;
use federation_crypto::CryptoError;
use thiserror::Error;

/// Result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Errors that can occur while wrapping or unwrapping envelopes.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// A required envelope element is missing or empty.
    #[error("invalid magic envelope: {0}")]
    InvalidEnvelope(String),

    /// `me:data` does not declare `application/xml`.
    #[error("invalid data type: {0:?}")]
    InvalidDataType(String),

    /// `me:encoding` is not `base64url`.
    #[error("invalid encoding: {0:?}")]
    InvalidEncoding(String),

    /// `me:alg` is not `RSA-SHA256`.
    #[error("invalid algorithm: {0:?}")]
    InvalidAlgorithm(String),

    /// The host has no public key for the envelope sender.
    #[error("sender key not found for {0}")]
    SenderKeyNotFound(String),

    /// The envelope signature does not match its contents.
    #[error("envelope signature verification failed for {0}")]
    SignatureVerificationFailed(String),

    /// The document root is not the expected wrapper.
    #[error("invalid root node: {0}")]
    InvalidRootNode(String),

    /// A Slap header carries no author.
    #[error("slap header has no author_id")]
    MissingAuthor,

    /// A Slap carries no magic envelope.
    #[error("slap has no magic envelope")]
    MissingMagicEnvelope,

    /// The payload could not be decoded or authenticated.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Encryption, decryption or key handling failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Malformed encrypted envelope JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

