//! `lockbox get`: print a single secret's password.

use crate::cli::{resolve_secret, unlock_session, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, query: &str) -> Result<()> {
    let (_settings, session) = unlock_session(cli)?;

    let record = resolve_secret(session.list_secrets()?, query)?;
    println!("{}", record.password);

    Ok(())
}
