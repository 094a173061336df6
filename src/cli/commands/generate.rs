//! `kryptos generate` — print a random password.

use crate::cli::{app_dir, load_settings, Cli};
use crate::errors::Result;
use crate::generator::generate_password;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>) -> Result<()> {
    let length = match length {
        Some(n) => n,
        None => load_settings(&app_dir(cli)?)?.generated_password_length,
    };

    println!("{}", generate_password(length)?);
    Ok(())
}
