//! `kryptos audit` — show the log of vault operations.
//!
//! Usage:
//!   kryptos audit                       # last 50 events, all accounts
//!   kryptos --account alice audit       # only alice's events
//!   kryptos audit --last 10 --since 7d

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{app_dir, Cli};
use crate::errors::{KryptosError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let dir = app_dir(cli)?;
    let cutoff = since.map(parse_since).transpose()?;

    // An account filter is optional here, unlike the entry commands.
    let account = cli.account.as_deref();

    if !AuditLog::db_path(&dir).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| KryptosError::AuditError("failed to open audit database".into()))?;
    let entries = audit.query(last, cutoff, account)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Turn "7d", "24h" or "30m" into the timestamp that long ago.
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        KryptosError::CommandFailed(format!(
            "invalid duration '{input}' — use a form like 7d, 24h or 30m"
        ))
    };

    let split = input.len().checked_sub(1).ok_or_else(invalid)?;
    if !input.is_char_boundary(split) {
        return Err(invalid());
    }
    let (amount, unit) = input.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let span = match unit {
        "d" => Duration::try_days(amount),
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Ok(Utc::now() - span)
}

fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Account", "Entry", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.account.clone().unwrap_or_else(|| "-".into()),
            entry
                .entry_id
                .as_deref()
                .map_or_else(|| "-".into(), |id| output::short_id(id).to_string()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("{}", style(format!("{} audit entries:", entries.len())).bold());
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    match op {
        "account-create" | "add" => style(op).green().to_string(),
        "edit" => style(op).blue().to_string(),
        "remove" | "account-delete" => style(op).red().to_string(),
        "reveal" => style(op).yellow().to_string(),
        "export" | "import" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_units() {
        let days = Utc::now() - parse_since("7d").unwrap();
        assert!((days.num_days() - 7).abs() <= 1);

        let hours = Utc::now() - parse_since("24h").unwrap();
        assert!((hours.num_hours() - 24).abs() <= 1);

        let minutes = Utc::now() - parse_since(" 30m ").unwrap();
        assert!((minutes.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_since_rejects_garbage() {
        for bad in ["", "d", "abc", "7x", "-3d", "7dd", "é"] {
            assert!(parse_since(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn colorize_keeps_the_operation_name() {
        for op in ["add", "remove", "reveal", "export", "something-else"] {
            assert!(console::strip_ansi_codes(&colorize_operation(op)).contains(op));
        }
    }

    #[test]
    fn since_filter_includes_recent_events() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();
        audit.log("add", Some("alice"), Some("abc"), None);

        let cutoff = parse_since("1h").unwrap();
        assert_eq!(audit.query(10, Some(cutoff), None).unwrap().len(), 1);
        assert_eq!(audit.query(10, Some(cutoff), Some("bob")).unwrap().len(), 0);
    }
}
