//! `kryptos account` — list, create and delete accounts.

use console::style;

use crate::cli::output;
use crate::cli::{confirm, log_audit, prompt_new_password, registry, repository, Cli};
use crate::errors::{KryptosError, Result};
use crate::vault::{paths, Vault};

/// Execute `kryptos account list`.
pub fn execute_list(cli: &Cli) -> Result<()> {
    let registry = registry(cli)?;
    let repo = repository(cli)?;
    let names = registry.list()?;

    if names.is_empty() {
        output::info("No accounts yet.");
        output::tip("Run `kryptos account create <NAME>` to create one.");
        return Ok(());
    }

    output::info(&format!("{} account(s):", names.len()));
    for name in &names {
        // The registry and the vault files are not kept in lockstep.
        if repo.exists(name).unwrap_or(false) {
            println!("  {name}");
        } else {
            println!("  {name} {}", style("(no vault file)").dim());
        }
    }

    Ok(())
}

/// Execute `kryptos account create <name>`.
pub fn execute_create(cli: &Cli, name: &str) -> Result<()> {
    paths::validate_account_name(name)?;

    let registry = registry(cli)?;
    let repo = repository(cli)?;

    if registry.contains(name)? || repo.exists(name)? {
        return Err(KryptosError::AccountAlreadyExists(name.to_string()));
    }

    let password = prompt_new_password()?;

    // Write the empty vault first so a failed save leaves no registry entry.
    repo.save(name, password.as_bytes(), &Vault::new())?;
    registry.add(name)?;

    log_audit(cli, "account-create", Some(name), None, None);

    output::success(&format!("Account '{name}' created"));
    output::tip(&format!(
        "Run `kryptos --account {name} add --title <TITLE> --username <USER>` to add an entry."
    ));

    Ok(())
}

/// Execute `kryptos account delete <name>`.
pub fn execute_delete(cli: &Cli, name: &str, force: bool, keep_data: bool) -> Result<()> {
    paths::validate_account_name(name)?;

    let registry = registry(cli)?;
    let repo = repository(cli)?;

    if !registry.contains(name)? && !repo.exists(name)? {
        return Err(KryptosError::AccountNotFound(name.to_string()));
    }

    if !force {
        let prompt = if keep_data {
            format!("Unregister account '{name}'? The vault file stays on disk")
        } else {
            format!("Delete account '{name}' and all its entries? This cannot be undone")
        };
        if !confirm(&prompt)? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // File first: if that fails the account stays registered and intact.
    let removed_file = if keep_data { false } else { repo.delete(name)? };
    registry.remove(name)?;

    let details = if removed_file {
        "vault deleted"
    } else {
        "unregistered"
    };
    log_audit(cli, "account-delete", Some(name), None, Some(details));

    output::success(&format!("Account '{name}' {details}"));

    Ok(())
}
