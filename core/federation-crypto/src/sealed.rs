//! AES key bundles sealed with a recipient's RSA key.
//!
//! Only the compact `{"key": .., "iv": ..}` JSON goes through RSA; the
//! payload itself is encrypted with the AES params inside it.

use crate::cipher::CipherParams;
use crate::encoding;
use crate::error::CryptoResult;
use crate::key::{PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct EncodedParams {
    key: String,
    iv: String,
}

/// RSA-encrypts the params for `recipient`, returning base64.
pub fn seal(params: &CipherParams, recipient: &PublicKey) -> CryptoResult<String> {
    let json = serde_json::to_vec(&EncodedParams {
        key: params.key_base64(),
        iv: params.iv_base64(),
    })?;
    Ok(encoding::encode(recipient.encrypt(&json)?))
}

/// Reverses [`seal`] with the recipient's private key.
pub fn open(sealed: &str, key: &PrivateKey) -> CryptoResult<CipherParams> {
    let json = key.decrypt(&encoding::decode(sealed)?)?;
    let encoded: EncodedParams = serde_json::from_slice(&json)?;
    CipherParams::from_base64(&encoded.key, &encoded.iv)
}
