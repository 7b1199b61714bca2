//! The canonical signing primitive.
//!
//! Entity signatures are `base64(RSA-SHA256(values.join(";")))`. A missing
//! key or signature is a failed verification, never an error: the layers
//! above decide which failures are fatal.

use crate::encoding;
use crate::key::{PrivateKey, PublicKey};

/// Separator between signed property values.
pub const VALUE_SEPARATOR: &str = ";";

/// Joins property values into the string that gets signed.
pub fn canonical_string<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(VALUE_SEPARATOR)
}

/// Signs `data` and returns the base64 encoded signature.
#[must_use]
pub fn sign(key: &PrivateKey, data: &str) -> String {
    encoding::encode(key.sign(data.as_bytes()))
}

/// Verifies a base64 signature over `data`.
///
/// Returns false when either the key or the signature is absent, or when the
/// signature is not valid base64.
#[must_use]
pub fn verify(key: Option<&PublicKey>, data: &str, signature: Option<&str>) -> bool {
    let (Some(key), Some(signature)) = (key, signature) else {
        return false;
    };
    match encoding::decode(signature) {
        Ok(raw) => key.verify(data.as_bytes(), &raw),
        Err(_) => false,
    }
}
