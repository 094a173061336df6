//! Random password generation.

use rand::Rng;

use crate::errors::{KryptosError, Result};

/// Letters, digits and ASCII punctuation (94 symbols).
const CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+=-`~[]\\{}|;':\",./<>?";

/// Default length used when none is configured.
pub const DEFAULT_LENGTH: usize = 20;

/// Upper bound on a single generated password.
const MAX_LENGTH: usize = 1024;

/// Generate a password of `length` symbols drawn uniformly from `CHARSET`.
pub fn generate_password(length: usize) -> Result<String> {
    if length == 0 || length > MAX_LENGTH {
        return Err(KryptosError::CommandFailed(format!(
            "password length must be between 1 and {MAX_LENGTH} (got {length})"
        )));
    }

    let mut rng = rand::rng();
    let password = (0..length)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect();
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_has_94_unique_symbols() {
        let mut sorted = CHARSET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 94);
    }

    #[test]
    fn generates_requested_length_from_charset() {
        let pw = generate_password(64).unwrap();
        assert_eq!(pw.chars().count(), 64);
        assert!(pw.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn consecutive_passwords_differ() {
        assert_ne!(
            generate_password(DEFAULT_LENGTH).unwrap(),
            generate_password(DEFAULT_LENGTH).unwrap()
        );
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(generate_password(0).is_err());
        assert!(generate_password(MAX_LENGTH + 1).is_err());
        assert!(generate_password(MAX_LENGTH).is_ok());
    }
}
