//! Derived vault keys.
//!
//! A `VaultKey` is only ever produced by running the KDF over a master
//! password and the salt of one particular save, so every save encrypts
//! under a key that has never been used before.

use zeroize::Zeroize;

use super::encryption;
use super::kdf::{derive_key, KdfParams, KEY_LEN};
use crate::errors::Result;

/// A wrapper around a 32-byte vault key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Run the KDF and wrap the result.
    pub fn derive(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<Self> {
        let mut bytes = derive_key(password, salt, params)?;
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Encrypt `plaintext` under this key (fresh nonce per call).
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encryption::encrypt(&self.bytes, plaintext)
    }

    /// Authenticate and decrypt a blob produced by `seal`.
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>> {
        encryption::decrypt(&self.bytes, blob)
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(**redacted**)")
    }
}
