//! `kryptos import` — replace an account's vault with an exported file.
//!
//! The file is copied as-is.  It is only decrypted the next time the
//! account is opened, with the password it was exported under.

use std::path::Path;

use crate::cli::output;
use crate::cli::{confirm, log_audit, registry, repository, require_account, Cli};
use crate::errors::{KryptosError, Result};

/// Execute the `import` command.
pub fn execute(cli: &Cli, source: &str, force: bool) -> Result<()> {
    let account = require_account(cli)?;
    let repo = repository(cli)?;
    let registry = registry(cli)?;

    let source_path = Path::new(source);
    if !source_path.is_file() {
        return Err(KryptosError::CommandFailed(format!(
            "import file '{source}' does not exist"
        )));
    }

    if repo.exists(account)?
        && !force
        && !confirm(&format!(
            "Replace all entries of '{account}' with the contents of {source}?"
        ))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    repo.import_raw(account, source_path)?;
    let registered = registry.add(account)?;

    log_audit(cli, "import", Some(account), None, Some(source));

    output::success(&format!("Imported {source} into {account}"));
    if registered {
        output::info(&format!("Registered new account '{account}'."));
    }
    output::tip(&format!(
        "Open it with the exported vault's master password: `kryptos --account {account} list`"
    ));

    Ok(())
}
