//! `lockbox delete`: remove a secret from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{resolve_secret, unlock_session, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, query: &str, force: bool) -> Result<()> {
    let (_settings, mut session) = unlock_session(cli)?;

    let record = resolve_secret(session.list_secrets()?, query)?;
    let (id, name) = (record.id.clone(), record.name.clone());

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.delete_secret(&id)?;

    output::success(&format!("Deleted secret '{name}'"));
    Ok(())
}
