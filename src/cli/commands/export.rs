//! `kryptos export` — copy an account's encrypted vault file elsewhere.
//!
//! The copy stays encrypted under the account's master password; it is
//! a backup or transfer artifact, not a plaintext dump.

use std::path::Path;

use crate::cli::output;
use crate::cli::{existing_account, log_audit, registry, repository, Cli};
use crate::errors::{KryptosError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, destination: &str) -> Result<()> {
    let repo = repository(cli)?;
    let registry = registry(cli)?;
    let account = existing_account(cli, &repo, &registry)?;

    let dest_path = Path::new(destination);

    // Safety: refuse to export over the vault file itself.
    if dest_path == repo.account_path(account)? {
        return Err(KryptosError::CommandFailed(
            "refusing to export a vault onto itself".into(),
        ));
    }

    repo.export_raw(account, dest_path)?;

    log_audit(cli, "export", Some(account), None, Some(destination));

    output::success(&format!("Exported {account} to {destination}"));
    output::tip("The exported file is still encrypted with this account's master password.");

    Ok(())
}
