use clap::Parser;
use tracing_subscriber::EnvFilter;

use kryptos::cli::commands::{add::NewEntry, edit::EntryChanges};
use kryptos::cli::{AccountAction, Cli, Commands};
use kryptos::errors::Result;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::debug!(error = ?e, "command failed");
        kryptos::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `KRYPTOS_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("KRYPTOS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    use kryptos::cli::commands::*;

    match &cli.command {
        Commands::Account { action } => match action {
            AccountAction::List => account::execute_list(cli),
            AccountAction::Create { name } => account::execute_create(cli, name),
            AccountAction::Delete {
                name,
                force,
                keep_data,
            } => account::execute_delete(cli, name, *force, *keep_data),
        },
        Commands::List { search, tag } => list::execute(cli, search.as_deref(), tag.as_deref()),
        Commands::Add {
            title,
            username,
            password,
            generate,
            length,
            url,
            notes,
            tags,
        } => add::execute(
            cli,
            &NewEntry {
                title,
                username,
                password: password.as_deref(),
                generate: *generate,
                length: *length,
                url: url.as_deref(),
                notes: notes.as_deref(),
                tags: tags.as_deref(),
            },
        ),
        Commands::Edit {
            id,
            title,
            username,
            password,
            generate,
            url,
            clear_url,
            notes,
            clear_notes,
            tags,
        } => edit::execute(
            cli,
            id,
            &EntryChanges {
                title: title.as_deref(),
                username: username.as_deref(),
                password: password.as_deref(),
                generate: *generate,
                url: url.as_deref(),
                clear_url: *clear_url,
                notes: notes.as_deref(),
                clear_notes: *clear_notes,
                tags: tags.as_deref(),
            },
        ),
        Commands::Remove { id, force } => remove::execute(cli, id, *force),
        Commands::Show { id, reveal } => show::execute(cli, id, *reveal),
        Commands::Export { path } => export::execute(cli, path),
        Commands::Import { path, force } => import_cmd::execute(cli, path, *force),
        Commands::Generate { length } => generate::execute(cli, *length),
        Commands::Completions { shell } => completions::execute(*shell),
        Commands::Audit { last, since } => audit(cli, *last, since.as_deref()),
    }
}

#[cfg(feature = "audit-log")]
fn audit(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    kryptos::cli::commands::audit_cmd::execute(cli, last, since)
}

#[cfg(not(feature = "audit-log"))]
fn audit(_cli: &Cli, _last: usize, _since: Option<&str>) -> Result<()> {
    Err(kryptos::KryptosError::CommandFailed(
        "this build has no audit log (rebuild with the `audit-log` feature)".into(),
    ))
}
