//! Core type definitions for the federation protocol.
//!
//! This crate defines the small value types every other federation crate
//! shares:
//! - [`DiasporaId`]: `user@host[:port]` person addresses
//! - [`Guid`]: globally unique entity identifiers
//! - [`Timestamp`]: second-precision UTC wire timestamps
//!
//! Entity schemas, codecs and signatures live in the crates layered above.

mod ids;
mod timestamp;

pub use ids::{DiasporaId, Guid};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing wire identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid diaspora ID: {0:?}")]
    InvalidDiasporaId(String),

    #[error("invalid GUID: {0:?}")]
    InvalidGuid(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
