//! Operator tooling for federation payloads.
//!
//! [`KeyDirectory`] stores key pairs and parent records on disk and
//! serves them to the codec and envelope layers; [`ops`] implements the subcommands.

mod keys;
pub mod ops;

pub use keys::{KeyDirectory, ParentRecord, Received};
pub use ops::Format;
