//! Per-account vault persistence.
//!
//! `VaultRepository` owns the on-disk representation of every account's
//! vault.  Each save serializes the whole record set, derives a key from
//! the master password and a brand-new salt, encrypts, and replaces the
//! account's envelope file atomically.  Load reverses the steps using
//! the salt and KDF parameters stored in the file.
//!
//! Mutating operations on the same account are serialized through an
//! in-process lock table.  Nothing here guards against a second process.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};
use zeroize::Zeroize;

use crate::crypto::{generate_salt, KdfParams, VaultKey};
use crate::errors::{KryptosError, Result};

use super::collection::Vault;
use super::format::{self, Envelope};
use super::paths;

/// Handle on the vault files in one app directory.
pub struct VaultRepository {
    /// Directory holding the envelope files.
    dir: PathBuf,

    /// KDF parameters used for every save.
    params: KdfParams,

    /// One mutex per account name, created on first use.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl VaultRepository {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Repository over `dir` using the default KDF parameters.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_params(dir, KdfParams::default())
    }

    /// Repository over `dir` that writes with explicit KDF parameters.
    ///
    /// Reads always use whatever parameters the file records, so changing
    /// these only affects future saves.
    pub fn with_params(dir: impl Into<PathBuf>, params: KdfParams) -> Self {
        Self {
            dir: dir.into(),
            params,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Repository over the platform default app directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(paths::default_app_dir()?))
    }

    // ------------------------------------------------------------------
    // Core operations
    // ------------------------------------------------------------------

    /// Load and decrypt the vault of `account`.
    ///
    /// A missing file is a brand-new account: an empty vault is returned.
    pub fn load(&self, account: &str, password: &[u8]) -> Result<Vault> {
        let path = self.account_path(account)?;

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(account, "no vault file yet, starting empty");
                return Ok(Vault::new());
            }
            Err(e) => return Err(e.into()),
        };

        let envelope = Envelope::from_bytes(&data)?;
        let key = VaultKey::derive(password, &envelope.salt, &envelope.kdf_params())?;

        let mut plaintext = key.open(&envelope.ciphertext)?;
        let parsed = serde_json::from_slice::<Vault>(&plaintext);
        plaintext.zeroize();

        let vault = parsed.map_err(|e| KryptosError::InvalidFormat(format!("records JSON: {e}")))?;
        debug!(account, records = vault.len(), "vault loaded");
        Ok(vault)
    }

    /// Encrypt and persist `vault` as the complete contents of `account`.
    ///
    /// Always generates a fresh salt, so two saves of identical data
    /// never produce the same file.
    pub fn save(&self, account: &str, password: &[u8], vault: &Vault) -> Result<()> {
        let lock = self.account_lock(account);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.save_locked(account, password, vault)
    }

    /// Load, modify and save `account` while holding its lock.
    ///
    /// If `f` fails nothing is written.
    pub fn update<R, F>(&self, account: &str, password: &[u8], f: F) -> Result<R>
    where
        F: FnOnce(&mut Vault) -> Result<R>,
    {
        let lock = self.account_lock(account);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut vault = self.load(account, password)?;
        let out = f(&mut vault)?;
        self.save_locked(account, password, &vault)?;
        Ok(out)
    }

    /// Copy the account's envelope file verbatim to `destination`.
    ///
    /// No decryption or validation takes place.
    pub fn export_raw(&self, account: &str, destination: &Path) -> Result<()> {
        let path = self.account_path(account)?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(KryptosError::VaultNotFound(account.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        format::write_atomic(destination, &data)?;
        info!(account, destination = %destination.display(), "vault exported");
        Ok(())
    }

    /// Replace the account's envelope file with the bytes at `source`.
    ///
    /// No decryption or validation takes place; the password is only
    /// needed later, when the imported vault is loaded.
    pub fn import_raw(&self, account: &str, source: &Path) -> Result<()> {
        let path = self.account_path(account)?;
        let data = fs::read(source)?;

        let lock = self.account_lock(account);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        paths::ensure_app_dir(&self.dir)?;
        format::write_atomic(&path, &data)?;
        info!(account, source = %source.display(), "vault imported");
        Ok(())
    }

    /// Delete the account's vault file.  Returns `false` if there was none.
    pub fn delete(&self, account: &str) -> Result<bool> {
        let path = self.account_path(account)?;

        let lock = self.account_lock(account);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(account, "vault file deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns `true` if `account` has a vault file.
    pub fn exists(&self, account: &str) -> Result<bool> {
        Ok(self.account_path(account)?.is_file())
    }

    /// Path of the vault file for `account`.
    pub fn account_path(&self, account: &str) -> Result<PathBuf> {
        paths::account_file(&self.dir, account)
    }

    /// Returns the app directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the KDF parameters used for saves.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn save_locked(&self, account: &str, password: &[u8], vault: &Vault) -> Result<()> {
        let path = self.account_path(account)?;
        paths::ensure_app_dir(&self.dir)?;

        let mut plaintext = serde_json::to_vec(vault)
            .map_err(|e| KryptosError::SerializationError(format!("records: {e}")))?;

        let salt = generate_salt();
        let sealed =
            VaultKey::derive(password, &salt, &self.params).and_then(|key| key.seal(&plaintext));
        plaintext.zeroize();

        let envelope = Envelope::new(salt, self.params, sealed?);
        format::write_atomic(&path, &envelope.to_bytes()?)?;

        info!(account, records = vault.len(), "vault saved");
        Ok(())
    }

    fn account_lock(&self, account: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(account.to_string()).or_default())
    }
}
