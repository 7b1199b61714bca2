//! Wire codecs for federation entities.
//!
//! - [`xml`]: the XML entity format, the element tree it is built on, and
//!   the legacy `<XML><post>` wrapper
//! - [`json`]: the `{entity_type, entity_data}` JSON format
//! - [`Codec`]: host-aware encode (sign) and decode (verify) entry points
//!
//! Both formats preserve elements the schema does not declare, so entities
//! from newer peers survive a round trip through this version intact.

mod codec;
mod coerce;
mod error;
pub mod json;
pub mod xml;

pub use codec::Codec;
pub use error::{CodecError, CodecResult};
pub use xml::{Element, XmlPayload};
