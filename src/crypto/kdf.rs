//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The default parameters are process-wide
//! constants; a vault file records the parameters it was written with
//! so they can be raised later without locking anyone out.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{KryptosError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Maximum memory cost in KiB (1 GB).
const MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Maximum number of passes.
const MAX_ITERATIONS: u32 = 64;

/// Maximum number of lanes.
const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Check the parameters against the guard rails.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(KryptosError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(KryptosError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at most {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(KryptosError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(KryptosError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Derive a 32-byte key from a master password and a 16-byte salt.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8], kdf_params: &KdfParams) -> Result<[u8; KEY_LEN]> {
    if salt.len() != SALT_LEN {
        return Err(KryptosError::KeyDerivationFailed(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    kdf_params.validate()?;

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| KryptosError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| KryptosError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> KdfParams {
        KdfParams {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"Secret123!", &salt, &cheap()).unwrap();
        let b = derive_key(b"Secret123!", &salt, &cheap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_salt_gives_different_key() {
        let a = derive_key(b"pw", &[1u8; SALT_LEN], &cheap()).unwrap();
        let b = derive_key(b"pw", &[2u8; SALT_LEN], &cheap()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn different_params_give_different_key() {
        let salt = [3u8; SALT_LEN];
        let a = derive_key(b"pw", &salt, &cheap()).unwrap();
        let b = derive_key(
            b"pw",
            &salt,
            &KdfParams {
                iterations: 2,
                ..cheap()
            },
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_wrong_salt_length() {
        let err = derive_key(b"pw", &[0u8; 8], &cheap()).unwrap_err();
        assert!(matches!(err, KryptosError::KeyDerivationFailed(_)));
    }

    #[test]
    fn rejects_weak_params() {
        let weak = KdfParams {
            memory_kib: 1024,
            ..cheap()
        };
        assert!(derive_key(b"pw", &[0u8; SALT_LEN], &weak).is_err());

        let no_iterations = KdfParams {
            iterations: 0,
            ..cheap()
        };
        assert!(no_iterations.validate().is_err());
    }

    #[test]
    fn rejects_absurd_memory_cost() {
        let huge = KdfParams {
            memory_kib: u32::MAX,
            ..cheap()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn rejects_absurd_time_and_lane_costs() {
        let endless = KdfParams {
            iterations: u32::MAX,
            ..cheap()
        };
        assert!(endless.validate().is_err());
        assert!(derive_key(b"pw", &[0u8; SALT_LEN], &endless).is_err());

        let lanes = KdfParams {
            parallelism: MAX_PARALLELISM + 1,
            ..cheap()
        };
        assert!(lanes.validate().is_err());

        let ceiling = KdfParams {
            memory_kib: MAX_MEMORY_KIB,
            iterations: MAX_ITERATIONS,
            parallelism: MAX_PARALLELISM,
        };
        assert!(ceiling.validate().is_ok());
    }

    #[test]
    fn default_params_are_valid() {
        assert!(KdfParams::default().validate().is_ok());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
