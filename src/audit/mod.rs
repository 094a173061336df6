//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (add, edit, export, etc.)
//! in a local SQLite database at `<app_dir>/audit.db`.  Only account
//! names, entry ids and short descriptions are recorded, never any
//! credential material.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::cli::Cli;
use crate::errors::{KryptosError, Result};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub account: Option<String>,
    pub entry_id: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<app_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(app_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(app_dir);
        let conn = Connection::open(&db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                account     TEXT,
                entry_id    TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(
        &self,
        operation: &str,
        account: Option<&str>,
        entry_id: Option<&str>,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, account, entry_id, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, account, entry_id, details],
        );
    }

    /// Query recent audit entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only return entries newer than this timestamp.
    /// - `account`: if provided, only return entries for this account.
    pub fn query(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
        account: Option<&str>,
    ) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, account, entry_id, details
                 FROM audit_log
                 WHERE (?1 IS NULL OR timestamp >= ?1)
                   AND (?2 IS NULL OR account = ?2)
                 ORDER BY id DESC
                 LIMIT ?3",
            )
            .map_err(|e| KryptosError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since, account, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    account: row.get(3)?,
                    entry_id: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| KryptosError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| KryptosError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database.
    pub fn db_path(app_dir: &Path) -> PathBuf {
        app_dir.join("audit.db")
    }
}

/// Convenience helper: log an audit event using the CLI context.
///
/// Respects the `audit_log` setting, and silently ignores any errors.
/// This is safe to call from any command — it never fails the parent operation.
pub fn log_audit(
    cli: &Cli,
    op: &str,
    account: Option<&str>,
    entry_id: Option<&str>,
    details: Option<&str>,
) {
    let Ok(app_dir) = crate::cli::app_dir(cli) else {
        return;
    };
    if !crate::cli::load_settings(&app_dir).is_ok_and(|s| s.audit_log) {
        return;
    }

    if let Some(audit) = AuditLog::open(&app_dir) {
        audit.log(op, account, entry_id, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path());
        assert!(audit.is_some(), "should open successfully");
        assert!(dir.path().join("audit.db").exists());
    }

    #[test]
    fn log_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", Some("alice"), Some("id-1"), Some("GitHub"));
        audit.log("add", Some("alice"), Some("id-2"), None);
        audit.log("remove", Some("alice"), Some("id-1"), None);

        let entries = audit.query(10, None, None).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].operation, "remove");
        assert_eq!(entries[1].operation, "add");
        assert_eq!(entries[2].details.as_deref(), Some("GitHub"));
    }

    #[test]
    fn query_with_limit() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        for i in 0..10 {
            audit.log("add", Some("alice"), Some(&format!("id-{i}")), None);
        }

        let entries = audit.query(3, None, None).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn query_with_since_filter() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", Some("alice"), None, None);

        let past = Utc::now() - chrono::Duration::hours(1);
        let entries = audit.query(10, Some(past), None).unwrap();
        assert_eq!(entries.len(), 1);

        let future = Utc::now() + chrono::Duration::hours(1);
        let entries = audit.query(10, Some(future), None).unwrap();
        assert_eq!(entries.len(), 0);
    }

    #[test]
    fn query_with_account_filter() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", Some("alice"), None, None);
        audit.log("add", Some("bob"), None, None);
        audit.log("account-create", Some("bob"), None, None);

        assert_eq!(audit.query(10, None, Some("bob")).unwrap().len(), 2);
        assert_eq!(audit.query(10, None, Some("carol")).unwrap().len(), 0);
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        let result = AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn audit_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let perms = std::fs::metadata(dir.path().join("audit.db"))
            .unwrap()
            .permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
