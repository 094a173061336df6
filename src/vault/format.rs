//! On-disk envelope format and crash-safe file writes.
//!
//! Each account's vault file is a small JSON document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "kdf": { "algorithm": "argon2id", "memoryKib": 65536, "iterations": 3, "parallelism": 4 },
//!   "salt": "<base64, 16 bytes>",
//!   "entries": "<base64 of nonce || ciphertext || tag>"
//! }
//! ```
//!
//! - **version**: format version (currently `1`).  Optional on read.
//! - **kdf**: Argon2id parameters the key was derived with.  Optional on
//!   read; files without it were written with the defaults.
//! - **salt**: fresh random salt of the save that produced this file.
//! - **entries**: the AES-256-GCM blob of the JSON record array.

use std::fs;
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::{KdfParams, NONCE_LEN, SALT_LEN};
use crate::errors::{KryptosError, Result};

/// Current envelope format version.
pub const CURRENT_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// KDF parameters recorded in the envelope so the exact same settings
/// are used when the file is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredKdfParams {
    pub algorithm: KdfAlgorithm,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfAlgorithm {
    #[serde(rename = "argon2id")]
    Argon2id,
}

impl From<KdfParams> for StoredKdfParams {
    fn from(p: KdfParams) -> Self {
        Self {
            algorithm: KdfAlgorithm::Argon2id,
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

impl From<StoredKdfParams> for KdfParams {
    fn from(p: StoredKdfParams) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

/// The encrypted vault of one account, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default = "legacy_version")]
    pub version: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<StoredKdfParams>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// nonce || ciphertext || tag
    #[serde(
        rename = "entries",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub ciphertext: Vec<u8>,
}

fn legacy_version() -> u8 {
    1
}

impl Envelope {
    /// Build a current-version envelope.
    pub fn new(salt: [u8; SALT_LEN], params: KdfParams, ciphertext: Vec<u8>) -> Self {
        Self {
            version: CURRENT_VERSION,
            kdf: Some(params.into()),
            salt: salt.to_vec(),
            ciphertext,
        }
    }

    /// The KDF parameters to use when opening this envelope.
    pub fn kdf_params(&self) -> KdfParams {
        self.kdf.map(KdfParams::from).unwrap_or_default()
    }

    /// Parse and structurally validate an envelope.
    ///
    /// A blob shorter than a nonce is reported as `MalformedCiphertext`
    /// here, before any key derivation is attempted.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(data)
            .map_err(|e| KryptosError::InvalidFormat(format!("envelope JSON: {e}")))?;

        if envelope.version == 0 || envelope.version > CURRENT_VERSION {
            return Err(KryptosError::InvalidFormat(format!(
                "unsupported version {}, expected {CURRENT_VERSION}",
                envelope.version
            )));
        }
        if let Some(kdf) = envelope.kdf {
            KdfParams::from(kdf)
                .validate()
                .map_err(|e| KryptosError::InvalidFormat(format!("stored KDF parameters: {e}")))?;
        }
        if envelope.salt.len() != SALT_LEN {
            return Err(KryptosError::InvalidFormat(format!(
                "salt must be {SALT_LEN} bytes (got {})",
                envelope.salt.len()
            )));
        }
        if envelope.ciphertext.len() < NONCE_LEN {
            return Err(KryptosError::MalformedCiphertext(envelope.ciphertext.len()));
        }

        Ok(envelope)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| KryptosError::SerializationError(format!("envelope: {e}")))
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

/// Write `data` to `path` **atomically** with owner-only permissions.
///
/// 1. Write to a temp file (mode 0600) in the same directory.
/// 2. Flush it to disk.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = (|| -> Result<()> {
        let mut file = open_private(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Create (or truncate) a file readable and writable by the owner only.
fn open_private(path: &Path) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;

    // `mode` only applies on creation; tighten a pre-existing temp file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Envelope {
        Envelope::new([9u8; SALT_LEN], KdfParams::default(), vec![1u8; 40])
    }

    #[test]
    fn json_uses_salt_and_entries_keys() {
        let json: serde_json::Value = serde_json::from_slice(&sample().to_bytes().unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["kdf"]["algorithm"], "argon2id");
        assert_eq!(json["kdf"]["memoryKib"], 65_536);
        assert!(json["salt"].is_string());
        assert!(json["entries"].is_string());
    }

    #[test]
    fn parses_what_it_writes() {
        let env = sample();
        let back = Envelope::from_bytes(&env.to_bytes().unwrap()).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn legacy_envelope_without_header_uses_defaults() {
        let legacy = format!(
            r#"{{"salt":"{}","entries":"{}"}}"#,
            BASE64.encode([0u8; SALT_LEN]),
            BASE64.encode([0u8; 32])
        );
        let env = Envelope::from_bytes(legacy.as_bytes()).unwrap();
        assert_eq!(env.version, 1);
        assert!(env.kdf.is_none());
        assert_eq!(env.kdf_params(), KdfParams::default());
    }

    #[test]
    fn rejects_future_version() {
        let mut env = sample();
        env.version = CURRENT_VERSION + 1;
        let err = Envelope::from_bytes(&env.to_bytes().unwrap()).unwrap_err();
        assert!(matches!(err, KryptosError::InvalidFormat(_)));
    }

    #[test]
    fn rejects_unknown_kdf() {
        let json = format!(
            r#"{{"version":1,"kdf":{{"algorithm":"scrypt","memoryKib":1,"iterations":1,"parallelism":1}},"salt":"{}","entries":"{}"}}"#,
            BASE64.encode([0u8; SALT_LEN]),
            BASE64.encode([0u8; 32])
        );
        assert!(matches!(
            Envelope::from_bytes(json.as_bytes()),
            Err(KryptosError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_kdf_costs_outside_the_guard_rails() {
        for (memory, iterations, parallelism) in [(65_536, u32::MAX, 4), (1, 3, 4), (65_536, 3, 0)] {
            let json = format!(
                r#"{{"version":1,"kdf":{{"algorithm":"argon2id","memoryKib":{memory},"iterations":{iterations},"parallelism":{parallelism}}},"salt":"{}","entries":"{}"}}"#,
                BASE64.encode([0u8; SALT_LEN]),
                BASE64.encode([0u8; 32])
            );
            assert!(
                matches!(
                    Envelope::from_bytes(json.as_bytes()),
                    Err(KryptosError::InvalidFormat(_))
                ),
                "accepted m={memory} t={iterations} p={parallelism}"
            );
        }
    }

    #[test]
    fn rejects_wrong_salt_length() {
        let mut env = sample();
        env.salt = vec![0u8; 8];
        assert!(matches!(
            Envelope::from_bytes(&env.to_bytes().unwrap()),
            Err(KryptosError::InvalidFormat(_))
        ));
    }

    #[test]
    fn short_ciphertext_is_malformed() {
        let mut env = sample();
        env.ciphertext = vec![0u8; NONCE_LEN - 1];
        assert!(matches!(
            Envelope::from_bytes(&env.to_bytes().unwrap()),
            Err(KryptosError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn garbage_is_a_format_error() {
        assert!(matches!(
            Envelope::from_bytes(b"not json"),
            Err(KryptosError::InvalidFormat(_))
        ));
        assert!(matches!(
            Envelope::from_bytes(br#"{"salt":"!!!","entries":""}"#),
            Err(KryptosError::InvalidFormat(_))
        ));
    }

    #[test]
    fn write_atomic_replaces_contents_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join(".a.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        write_atomic(&path, b"x").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
