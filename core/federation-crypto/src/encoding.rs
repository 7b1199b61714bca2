//! Base64 dialects used on the wire.
//!
//! Entity signatures and AES payloads use standard base64; the magic
//! envelope uses base64url. Peers disagree on padding and some wrap long
//! lines, so decoding strips whitespace and accepts either padding style.

use crate::error::{CryptoError, CryptoResult};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Standard base64 with padding.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Decodes standard base64, ignoring whitespace and padding differences.
pub fn decode(encoded: &str) -> CryptoResult<Vec<u8>> {
    STANDARD_LENIENT
        .decode(strip_whitespace(encoded))
        .map_err(|e| CryptoError::InvalidBase64(e.to_string()))
}

/// URL-safe base64 with padding.
pub fn urlsafe_encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(data)
}

/// Decodes URL-safe base64, ignoring whitespace and padding differences.
pub fn urlsafe_decode(encoded: &str) -> CryptoResult<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(strip_whitespace(encoded))
        .map_err(|e| CryptoError::InvalidBase64(e.to_string()))
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}
