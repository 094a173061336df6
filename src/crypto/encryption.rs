//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.  No associated data is bound.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{KryptosError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext || tag).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| KryptosError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| KryptosError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// A blob too short to hold a nonce is rejected as malformed before any
/// cryptography runs.  Any tag mismatch is `AuthenticationFailed` and
/// yields no plaintext at all.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN {
        return Err(KryptosError::MalformedCiphertext(
            ciphertext_with_nonce.len(),
        ));
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| KryptosError::AuthenticationFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| KryptosError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_prepended() {
        let key = [0x42u8; 32];
        let blob = encrypt(&key, b"abc").unwrap();
        // nonce + 3 bytes of ciphertext + 16-byte tag
        assert_eq!(blob.len(), NONCE_LEN + 3 + 16);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = [0x01u8; 32];
        let blob = encrypt(&key, b"").unwrap();
        assert_eq!(decrypt(&key, &blob).unwrap(), b"");
    }

    #[test]
    fn exactly_nonce_length_is_not_malformed() {
        // 12 bytes passes the length check but cannot authenticate.
        let key = [0x01u8; 32];
        let err = decrypt(&key, &[0u8; NONCE_LEN]).unwrap_err();
        assert!(matches!(err, KryptosError::AuthenticationFailed));
    }

    #[test]
    fn short_blob_is_malformed() {
        let key = [0x01u8; 32];
        let err = decrypt(&key, &[0u8; 11]).unwrap_err();
        assert!(matches!(err, KryptosError::MalformedCiphertext(11)));
    }

    #[test]
    fn bad_key_length_fails_to_encrypt() {
        assert!(matches!(
            encrypt(&[0u8; 7], b"x"),
            Err(KryptosError::EncryptionFailed(_))
        ));
    }
}
