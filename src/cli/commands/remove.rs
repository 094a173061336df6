//! `kryptos remove` — delete an entry from an account's vault.

use crate::cli::output;
use crate::cli::{confirm, existing_account, log_audit, prompt_password, registry, repository, Cli};
use crate::errors::{KryptosError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let repo = repository(cli)?;
    let registry = registry(cli)?;
    let account = existing_account(cli, &repo, &registry)?;
    let master = prompt_password(account)?;

    let removed = repo.update(account, master.as_bytes(), |vault| {
        let record = vault.find(id)?;

        // Unless --force is set, ask for confirmation before deleting.
        if !force && !confirm(&format!("Delete entry '{}'?", record.title))? {
            return Err(KryptosError::UserCancelled);
        }

        let full_id = record.id.clone();
        vault.remove(&full_id)
    });

    let removed = match removed {
        Ok(record) => record,
        Err(KryptosError::UserCancelled) => {
            output::info("Cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    log_audit(
        cli,
        "remove",
        Some(account),
        Some(&removed.id),
        Some(&removed.title),
    );
    output::success(&format!(
        "Deleted entry '{}' ({})",
        removed.title,
        output::short_id(&removed.id)
    ));

    Ok(())
}
