//! `kryptos edit` — change fields of an existing entry.

use crate::cli::output;
use crate::cli::{
    app_dir, existing_account, load_settings, log_audit, parse_tags, prompt_password, registry,
    repository, Cli,
};
use crate::errors::{KryptosError, Result};
use crate::generator::generate_password;
use crate::vault::RecordUpdate;

/// Field changes requested on the command line.
#[derive(Default)]
pub struct EntryChanges<'a> {
    pub title: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub url: Option<&'a str>,
    pub clear_url: bool,
    pub notes: Option<&'a str>,
    pub clear_notes: bool,
    pub tags: Option<&'a str>,
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: &str, changes: &EntryChanges<'_>) -> Result<()> {
    let generated = if changes.generate {
        let length = load_settings(&app_dir(cli)?)?.generated_password_length;
        Some(generate_password(length)?)
    } else {
        None
    };

    let update = build_update(changes, generated)?;
    if update.is_empty() {
        return Err(KryptosError::CommandFailed(
            "nothing to change — pass at least one field to edit".into(),
        ));
    }

    let repo = repository(cli)?;
    let registry = registry(cli)?;
    let account = existing_account(cli, &repo, &registry)?;
    let master = prompt_password(account)?;

    let (full_id, title) = repo.update(account, master.as_bytes(), |vault| {
        let full_id = vault.find(id)?.id.clone();
        let record = vault.update(&full_id, update)?;
        Ok((full_id, record.title.clone()))
    })?;

    log_audit(cli, "edit", Some(account), Some(&full_id), Some(&title));
    output::success(&format!(
        "Updated '{title}' ({})",
        output::short_id(&full_id)
    ));

    Ok(())
}

/// Turn command-line changes into a `RecordUpdate`, rejecting blank
/// required fields.
fn build_update(changes: &EntryChanges<'_>, generated: Option<String>) -> Result<RecordUpdate> {
    let required = |name: &str, value: Option<&str>| -> Result<Option<String>> {
        match value {
            Some(v) if v.trim().is_empty() => Err(KryptosError::CommandFailed(format!(
                "{name} cannot be empty"
            ))),
            Some(v) => Ok(Some(v.to_string())),
            None => Ok(None),
        }
    };

    let url = if changes.clear_url {
        Some(None)
    } else {
        changes.url.map(|u| Some(u.to_string()))
    };
    let notes = if changes.clear_notes {
        Some(None)
    } else {
        changes.notes.map(|n| Some(n.to_string()))
    };

    Ok(RecordUpdate {
        title: required("title", changes.title)?,
        username: required("username", changes.username)?,
        password: match generated {
            Some(pw) => Some(pw),
            None => required("password", changes.password)?,
        },
        url,
        notes,
        tags: changes.tags.map(parse_tags),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changes_give_empty_update() {
        let update = build_update(&EntryChanges::default(), None).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn clear_flags_produce_nested_none() {
        let changes = EntryChanges {
            clear_url: true,
            notes: Some("new"),
            ..EntryChanges::default()
        };
        let update = build_update(&changes, None).unwrap();
        assert_eq!(update.url, Some(None));
        assert_eq!(update.notes, Some(Some("new".to_string())));
    }

    #[test]
    fn generated_password_wins() {
        let update = build_update(&EntryChanges::default(), Some("gen".into())).unwrap();
        assert_eq!(update.password.as_deref(), Some("gen"));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let changes = EntryChanges {
            title: Some("  "),
            ..EntryChanges::default()
        };
        assert!(build_update(&changes, None).is_err());
    }

    #[test]
    fn tags_are_split() {
        let changes = EntryChanges {
            tags: Some("a,b"),
            ..EntryChanges::default()
        };
        let update = build_update(&changes, None).unwrap();
        assert_eq!(update.tags, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
