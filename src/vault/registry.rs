//! The plaintext catalog of account names.
//!
//! The registry is a JSON array of strings next to the vault files.  It
//! is not encrypted and does not gate access to anything: a listed name
//! need not have a vault file, and a vault file may exist unlisted.
//! Keeping the two in step is up to the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{KryptosError, Result};

use super::format;
use super::paths;

/// Handle on `kryptos_accounts.json` in one app directory.
pub struct AccountRegistry {
    dir: PathBuf,
}

impl AccountRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Registry in the platform default app directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(paths::default_app_dir()?))
    }

    /// All registered names, in registration order.
    ///
    /// Returns an empty list if the file does not exist yet.
    pub fn list(&self) -> Result<Vec<String>> {
        let data = match fs::read(self.path()) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let names: Vec<String> = serde_json::from_slice(&data)
            .map_err(|e| KryptosError::InvalidFormat(format!("account registry: {e}")))?;
        Ok(dedup(names))
    }

    /// Replace the registry with `names`.  Duplicates are dropped.
    pub fn save(&self, names: &[String]) -> Result<()> {
        let names = dedup(names.to_vec());
        let data = serde_json::to_vec(&names)
            .map_err(|e| KryptosError::SerializationError(format!("account registry: {e}")))?;

        paths::ensure_app_dir(&self.dir)?;
        format::write_atomic(&self.path(), &data)
    }

    /// Register `name`.  Returns `false` if it was already present.
    pub fn add(&self, name: &str) -> Result<bool> {
        paths::validate_account_name(name)?;
        let mut names = self.list()?;
        if names.iter().any(|n| n == name) {
            return Ok(false);
        }
        names.push(name.to_string());
        self.save(&names)?;
        Ok(true)
    }

    /// Unregister `name`.  Returns `false` if it was not present.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut names = self.list()?;
        let before = names.len();
        names.retain(|n| n != name);
        if names.len() == before {
            return Ok(false);
        }
        self.save(&names)?;
        Ok(true)
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|n| n == name))
    }

    /// Path of the registry file.
    pub fn path(&self) -> PathBuf {
        paths::accounts_file(&self.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Drop repeated names, keeping the first occurrence.
fn dedup(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> (TempDir, AccountRegistry) {
        let dir = TempDir::new().unwrap();
        let reg = AccountRegistry::new(dir.path().join("Kryptos"));
        (dir, reg)
    }

    #[test]
    fn missing_file_lists_empty() {
        let (_dir, reg) = registry();
        assert!(reg.list().unwrap().is_empty());
    }

    #[test]
    fn save_and_list_roundtrip_keeps_order() {
        let (_dir, reg) = registry();
        let names = vec!["work".to_string(), "alice".to_string()];
        reg.save(&names).unwrap();
        assert_eq!(reg.list().unwrap(), names);
    }

    #[test]
    fn file_is_a_plain_json_array() {
        let (_dir, reg) = registry();
        reg.save(&["alice".to_string()]).unwrap();
        let raw = fs::read_to_string(reg.path()).unwrap();
        assert_eq!(raw, r#"["alice"]"#);
    }

    #[test]
    fn save_drops_duplicates() {
        let (_dir, reg) = registry();
        reg.save(&["a".into(), "b".into(), "a".into()]).unwrap();
        assert_eq!(reg.list().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn add_and_remove() {
        let (_dir, reg) = registry();
        assert!(reg.add("alice").unwrap());
        assert!(!reg.add("alice").unwrap());
        assert!(reg.add("bob").unwrap());
        assert!(reg.contains("bob").unwrap());

        assert!(reg.remove("alice").unwrap());
        assert!(!reg.remove("alice").unwrap());
        assert_eq!(reg.list().unwrap(), vec!["bob"]);
    }

    #[test]
    fn add_rejects_unsafe_name() {
        let (_dir, reg) = registry();
        assert!(reg.add("../x").is_err());
    }

    #[test]
    fn corrupt_registry_is_a_format_error() {
        let (_dir, reg) = registry();
        fs::create_dir_all(reg.dir()).unwrap();
        fs::write(reg.path(), b"{not an array").unwrap();
        assert!(matches!(reg.list(), Err(KryptosError::InvalidFormat(_))));
    }
}
