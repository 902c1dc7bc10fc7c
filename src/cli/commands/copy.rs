//! `lockbox copy`: copy a secret's password to the clipboard.

use crate::cli::output;
use crate::cli::{resolve_secret, unlock_session, Cli};
use crate::clipboard::{copy_password, SystemClipboard};
use crate::errors::Result;

/// Execute the `copy` command.
pub fn execute(cli: &Cli, query: &str) -> Result<()> {
    let (_settings, session) = unlock_session(cli)?;

    let record = resolve_secret(session.list_secrets()?, query)?;
    copy_password(&mut SystemClipboard::new(), record)?;

    output::success(&format!("Password for '{}' copied to clipboard", record.name));
    Ok(())
}
