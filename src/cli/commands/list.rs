//! `kryptos list` — display the entries of an account in a table.

use crate::cli::output;
use crate::cli::{existing_account, prompt_password, registry, repository, Cli};
use crate::errors::Result;
use crate::vault::Record;

/// Execute the `list` command.
pub fn execute(cli: &Cli, search: Option<&str>, tag: Option<&str>) -> Result<()> {
    let repo = repository(cli)?;
    let registry = registry(cli)?;
    let account = existing_account(cli, &repo, &registry)?;

    let password = prompt_password(account)?;
    let vault = repo.load(account, password.as_bytes())?;

    let mut shown: Vec<&Record> = match search {
        Some(term) => vault.search(term).collect(),
        None => vault.iter().collect(),
    };
    if let Some(tag) = tag {
        shown.retain(|r| r.has_tag(tag));
    }

    let noun = if vault.len() == 1 { "entry" } else { "entries" };
    if shown.len() == vault.len() {
        output::info(&format!("{account}: {} {noun}", vault.len()));
    } else {
        output::info(&format!(
            "{account}: {} of {} {noun} match",
            shown.len(),
            vault.len()
        ));
    }

    output::print_records_table(&shown);

    Ok(())
}
