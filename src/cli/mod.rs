//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{KryptosError, Result};
use crate::vault::{paths, AccountRegistry, VaultRepository};

/// Minimum master password length for new accounts.
const MIN_PASSWORD_LEN: usize = 8;

/// Kryptos CLI: local password manager with encrypted per-account vaults.
#[derive(Parser)]
#[command(
    name = "kryptos",
    about = "Local password manager with encrypted per-account vaults",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Account to operate on
    #[arg(short, long, env = "KRYPTOS_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Data directory (default: <config dir>/Kryptos)
    #[arg(long, env = "KRYPTOS_DIR", global = true)]
    pub data_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Manage accounts (list, create, delete)
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// List entries in the account's vault
    List {
        /// Only show entries whose title, username, URL or notes contain this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only show entries carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Add a new entry
    Add {
        /// Entry title (e.g. GitHub)
        #[arg(long)]
        title: String,
        /// Login name for the entry
        #[arg(short, long)]
        username: String,
        /// Entry password (omit for prompt or stdin)
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password for the entry
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(long, requires = "generate")]
        length: Option<usize>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Edit an existing entry
    Edit {
        /// Entry id (or unique prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
        #[arg(long, conflicts_with = "clear_url")]
        url: Option<String>,
        /// Remove the URL
        #[arg(long)]
        clear_url: bool,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        /// Remove the notes
        #[arg(long)]
        clear_notes: bool,
        /// Comma-separated tags (replaces existing tags)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Remove an entry
    Remove {
        /// Entry id (or unique prefix)
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show a single entry
    Show {
        /// Entry id (or unique prefix)
        id: String,
        /// Print the password instead of masking it
        #[arg(long)]
        reveal: bool,
    },

    /// Copy the account's encrypted vault file to a path
    Export {
        /// Destination file
        path: String,
    },

    /// Replace the account's vault with an encrypted vault file
    Import {
        /// Source file (produced by `export`)
        path: String,
        /// Overwrite an existing vault without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Print a random password
    Generate {
        /// Number of characters
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Account subcommands.
#[derive(clap::Subcommand)]
pub enum AccountAction {
    /// List registered accounts
    List,

    /// Create a new account with its own master password
    Create {
        /// Account name
        name: String,
    },

    /// Unregister an account and delete its vault
    Delete {
        /// Account name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
        /// Only unregister; leave the vault file on disk
        #[arg(long)]
        keep_data: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the app directory: `--data-dir` / `KRYPTOS_DIR`, else the default.
pub fn app_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.data_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => paths::default_app_dir(),
    }
}

/// Load `kryptos.toml` from the app directory (defaults if absent).
pub fn load_settings(app_dir: &Path) -> Result<Settings> {
    Settings::load(app_dir)
}

/// Build a repository over the app directory using the configured KDF params.
pub fn repository(cli: &Cli) -> Result<VaultRepository> {
    let dir = app_dir(cli)?;
    let settings = load_settings(&dir)?;
    Ok(VaultRepository::with_params(dir, settings.kdf_params()))
}

/// Account registry in the app directory.
pub fn registry(cli: &Cli) -> Result<AccountRegistry> {
    Ok(AccountRegistry::new(app_dir(cli)?))
}

/// The `--account` argument, which entry commands require.
pub fn require_account(cli: &Cli) -> Result<&str> {
    let account = cli.account.as_deref().ok_or_else(|| {
        KryptosError::CommandFailed(
            "no account selected — pass --account <NAME> or set KRYPTOS_ACCOUNT".into(),
        )
    })?;
    paths::validate_account_name(account)?;
    Ok(account)
}

/// The selected account, which must be registered or already have a vault.
///
/// Guards against a typo silently starting a brand-new empty vault.
pub fn existing_account<'a>(
    cli: &'a Cli,
    repo: &VaultRepository,
    registry: &AccountRegistry,
) -> Result<&'a str> {
    let account = require_account(cli)?;
    if registry.contains(account)? || repo.exists(account)? {
        Ok(account)
    } else {
        output::tip(&format!("Run `kryptos account create {account}` first."));
        Err(KryptosError::AccountNotFound(account.to_string()))
    }
}

/// Get the master password, trying in order:
/// 1. `KRYPTOS_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(account: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("KRYPTOS_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Master password for '{account}'"))
        .interact()
        .map_err(|e| KryptosError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `account create`).
///
/// Also respects `KRYPTOS_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("KRYPTOS_PASSWORD") {
        if !pw.is_empty() {
            if pw.chars().count() < MIN_PASSWORD_LEN {
                return Err(KryptosError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| KryptosError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read an entry password from stdin when piped, else prompt for it.
pub fn read_entry_password(title: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let value = buf.trim_end_matches(|c| c == '\r' || c == '\n');
        return Ok(Zeroizing::new(value.to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for '{title}'"))
        .interact()
        .map_err(|e| KryptosError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| KryptosError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Split a comma-separated tag list.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

/// Record an audit event if the audit log is compiled in and enabled.
pub fn log_audit(
    cli: &Cli,
    op: &str,
    account: Option<&str>,
    entry_id: Option<&str>,
    details: Option<&str>,
) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(cli, op, account, entry_id, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (cli, op, account, entry_id, details);
}
