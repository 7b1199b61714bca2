//! Error types for receive dispatch.

use federation_model::HostError;
use federation_salmon::EnvelopeError;
use thiserror::Error;

/// Result type for receive operations.
pub type ReceiveResult<T> = Result<T, ReceiveError>;

/// Errors that can occur while receiving an entity.
#[derive(Debug, Error)]
pub enum ReceiveError {
    /// The envelope sender may not speak for the entity's author.
    #[error("{sender} is not allowed to send {entity} by {author}")]
    InvalidSender {
        sender: String,
        author: String,
        entity: String,
    },

    /// A private receive without a recipient.
    #[error("private receive requires a recipient")]
    RecipientRequired,

    /// A non-public entity arrived on the public path.
    #[error("{entity} {guid} is not public")]
    NotPublic { entity: String, guid: String },

    /// A private receive without the recipient's private key.
    #[error("no private key for the recipient")]
    RecipientKeyNotFound,

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Host(#[from] HostError),
}
