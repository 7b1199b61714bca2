//! One-time AES-256-CBC encryption.
//!
//! Every private message gets a fresh key and IV; the pair travels next to
//! the ciphertext, itself encrypted for the recipient (see [`crate::sealed`]).

use crate::encoding;
use crate::error::{CryptoError, CryptoResult};
use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of AES-256 keys in bytes.
pub const AES_KEY_SIZE: usize = 32;

/// Size of the CBC initialisation vector in bytes.
pub const AES_IV_SIZE: usize = 16;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// A one-time AES key and IV pair.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CipherParams {
    key: [u8; AES_KEY_SIZE],
    iv: [u8; AES_IV_SIZE],
}

impl CipherParams {
    /// Generates a random key and IV.
    pub fn generate() -> Self {
        let mut key = [0u8; AES_KEY_SIZE];
        let mut iv = [0u8; AES_IV_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut key);
        rand::rngs::OsRng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Builds params from raw slices, checking their lengths.
    pub fn from_slices(key: &[u8], iv: &[u8]) -> CryptoResult<Self> {
        let key: [u8; AES_KEY_SIZE] =
            key.try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: AES_KEY_SIZE,
                    actual: key.len(),
                })?;
        let iv: [u8; AES_IV_SIZE] = iv.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: AES_IV_SIZE,
            actual: iv.len(),
        })?;
        Ok(Self { key, iv })
    }

    /// Builds params from the base64 strings used in JSON and XML headers.
    pub fn from_base64(key: &str, iv: &str) -> CryptoResult<Self> {
        Self::from_slices(&encoding::decode(key)?, &encoding::decode(iv)?)
    }

    /// Returns the key bytes.
    pub fn key(&self) -> &[u8; AES_KEY_SIZE] {
        &self.key
    }

    /// Returns the IV bytes.
    pub fn iv(&self) -> &[u8; AES_IV_SIZE] {
        &self.iv
    }

    /// Base64 of the key.
    pub fn key_base64(&self) -> String {
        encoding::encode(self.key)
    }

    /// Base64 of the IV.
    pub fn iv_base64(&self) -> String {
        encoding::encode(self.iv)
    }
}

impl std::fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherParams")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Encrypts plaintext with AES-256-CBC and PKCS#7 padding.
pub fn encrypt(params: &CipherParams, plaintext: &[u8]) -> Vec<u8> {
    Encryptor::new(&params.key.into(), &params.iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypts AES-256-CBC ciphertext.
pub fn decrypt(params: &CipherParams, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    Decryptor::new(&params.key.into(), &params.iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decryption("bad padding (wrong key or tampered data)".into()))
}

/// Encrypts a string and returns base64-encoded ciphertext.
pub fn encrypt_string(params: &CipherParams, plaintext: &str) -> String {
    encoding::encode(encrypt(params, plaintext.as_bytes()))
}

/// Decrypts base64-encoded ciphertext into a UTF-8 string.
pub fn decrypt_string(params: &CipherParams, encoded: &str) -> CryptoResult<String> {
    let plaintext = decrypt(params, &encoding::decode(encoded)?)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {}", e)))
}
