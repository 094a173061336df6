//! `kryptos add` — add a new entry to an account's vault.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{
    app_dir, existing_account, load_settings, log_audit, parse_tags, prompt_password,
    read_entry_password, registry, repository, Cli,
};
use crate::errors::{KryptosError, Result};
use crate::generator::generate_password;
use crate::vault::Record;

/// Fields for a new entry, as collected from the command line.
pub struct NewEntry<'a> {
    pub title: &'a str,
    pub username: &'a str,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub length: Option<usize>,
    pub url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub tags: Option<&'a str>,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, entry: &NewEntry<'_>) -> Result<()> {
    if entry.title.trim().is_empty() || entry.username.trim().is_empty() {
        return Err(KryptosError::CommandFailed(
            "title and username cannot be empty".into(),
        ));
    }

    let repo = repository(cli)?;
    let registry = registry(cli)?;
    let account = existing_account(cli, &repo, &registry)?;

    // Determine the entry password from one of three sources.
    let entry_password = if entry.generate {
        let length = match entry.length {
            Some(n) => n,
            None => load_settings(&app_dir(cli)?)?.generated_password_length,
        };
        Zeroizing::new(generate_password(length)?)
    } else if let Some(pw) = entry.password {
        output::warning("Password provided on command line — it may appear in shell history.");
        Zeroizing::new(pw.to_string())
    } else {
        read_entry_password(entry.title)?
    };

    if entry_password.is_empty() {
        return Err(KryptosError::CommandFailed(
            "entry password cannot be empty".into(),
        ));
    }

    let mut record = Record::new(entry.title, entry.username, entry_password.as_str());
    if let Some(url) = entry.url {
        record = record.with_url(url);
    }
    if let Some(notes) = entry.notes {
        record = record.with_notes(notes);
    }
    if let Some(tags) = entry.tags {
        record = record.with_tags(parse_tags(tags));
    }

    let master = prompt_password(account)?;
    let id = record.id.clone();
    let total = repo.update(account, master.as_bytes(), |vault| {
        vault.insert(record)?;
        Ok(vault.len())
    })?;

    log_audit(cli, "add", Some(account), Some(&id), Some(entry.title));

    output::success(&format!(
        "Added '{}' ({}) to {account} ({total} total)",
        entry.title,
        output::short_id(&id)
    ));
    if entry.generate {
        output::tip("Run `kryptos show <ID> --reveal` to see the generated password.");
    }

    Ok(())
}
