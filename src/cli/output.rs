//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Record;

/// Characters of the id shown in tables; enough to address an entry.
const SHORT_ID_LEN: usize = 8;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Shortened id for display.
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Print a table of entries (ID, Title, Username, URL, Tags, Updated).
/// Passwords are never shown here.
pub fn print_records_table(records: &[&Record]) {
    if records.is_empty() {
        info("No entries to show.");
        tip("Run `kryptos add --title <TITLE> --username <USER>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Username", "URL", "Tags", "Updated"]);

    for r in records {
        table.add_row(vec![
            short_id(&r.id).to_string(),
            r.title.clone(),
            r.username.clone(),
            r.url.clone().unwrap_or_default(),
            r.tags.join(", "),
            r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of one entry.  The password is masked unless `reveal`.
pub fn print_record(record: &Record, reveal: bool) {
    let password = if reveal {
        record.password.clone()
    } else {
        "\u{2022}".repeat(8)
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["ID".to_string(), record.id.clone()]);
    table.add_row(vec!["Title".to_string(), record.title.clone()]);
    table.add_row(vec!["Username".to_string(), record.username.clone()]);
    table.add_row(vec!["Password".to_string(), password]);
    if let Some(url) = &record.url {
        table.add_row(vec!["URL".to_string(), url.clone()]);
    }
    if let Some(notes) = &record.notes {
        table.add_row(vec!["Notes".to_string(), notes.clone()]);
    }
    if !record.tags.is_empty() {
        table.add_row(vec!["Tags".to_string(), record.tags.join(", ")]);
    }
    table.add_row(vec![
        "Created".to_string(),
        record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        record.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_uuid() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
