//! Where Kryptos keeps its files.
//!
//! Everything lives in one application-private directory
//! (`<user config dir>/Kryptos` by default):
//!
//! ```text
//! Kryptos/
//!   kryptos_accounts.json        account registry (plaintext)
//!   <account>_kryptos_data.json  one encrypted envelope per account
//!   kryptos.toml                 optional settings
//!   audit.db                     audit log
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{KryptosError, Result};

/// Folder created under the platform config root.
pub const APP_DIR_NAME: &str = "Kryptos";

/// Suffix appended to the account name to form its vault file name.
pub const DATA_FILE_SUFFIX: &str = "kryptos_data.json";

/// Name of the account registry file.
pub const ACCOUNTS_FILE_NAME: &str = "kryptos_accounts.json";

/// Longest accepted account name.
const MAX_ACCOUNT_NAME_LEN: usize = 64;

/// The default app directory: `<config dir>/Kryptos`.
pub fn default_app_dir() -> Result<PathBuf> {
    let config = dirs::config_dir().ok_or(KryptosError::DataDirUnavailable)?;
    Ok(config.join(APP_DIR_NAME))
}

/// Create the app directory with owner-only permissions if it is missing.
pub fn ensure_app_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Path of the vault file for `account` inside `dir`.
///
/// The name is validated first so it can never escape `dir`.
pub fn account_file(dir: &Path, account: &str) -> Result<PathBuf> {
    validate_account_name(account)?;
    Ok(dir.join(format!("{account}_{DATA_FILE_SUFFIX}")))
}

/// Path of the account registry inside `dir`.
pub fn accounts_file(dir: &Path) -> PathBuf {
    dir.join(ACCOUNTS_FILE_NAME)
}

/// Validate that an account name is safe to embed in a file name.
///
/// Must be non-empty, at most 64 characters, contain no path separators
/// or control characters, and must not start with a period.
pub fn validate_account_name(name: &str) -> Result<()> {
    let invalid = |why: &str| Err(KryptosError::InvalidAccountName(name.to_string(), why.into()));

    if name.trim().is_empty() {
        return invalid("name cannot be empty");
    }
    if name.chars().count() > MAX_ACCOUNT_NAME_LEN {
        return invalid("name cannot exceed 64 characters");
    }
    if name.starts_with('.') {
        return invalid("name cannot start with a period");
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
    {
        return invalid("name cannot contain path separators or control characters");
    }
    Ok(())
}
