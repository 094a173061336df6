//! `kryptos show` — print a single entry.

use crate::cli::output;
use crate::cli::{existing_account, log_audit, prompt_password, registry, repository, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str, reveal: bool) -> Result<()> {
    let repo = repository(cli)?;
    let registry = registry(cli)?;
    let account = existing_account(cli, &repo, &registry)?;

    let password = prompt_password(account)?;
    let vault = repo.load(account, password.as_bytes())?;
    let record = vault.find(id)?;

    if reveal {
        log_audit(cli, "reveal", Some(account), Some(&record.id), None);
    }

    output::print_record(record, reveal);

    Ok(())
}
