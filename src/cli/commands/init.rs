//! `lockbox init`: create a new vault protected by a master password.

use crate::cli::output;
use crate::cli::{open_session, prompt_new_password, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, mut session) = open_session(cli)?;

    // 1. Refuse to overwrite an existing vault.
    if session.has_vault()? {
        output::tip("Use `lockbox add` to store secrets in the existing vault.");
        return Err(LockboxError::VaultAlreadyExists);
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password()?;

    // 3. Derive the key, encrypt an empty vault and write it.
    output::info("Deriving key from master password...");
    session.create_vault(password.as_bytes())?;

    let path = session.store().path_for(session.storage_key())?;
    output::success(&format!("Vault created at {}", path.display()));
    output::warning("There is no way to recover the vault if you forget the master password.");
    output::tip("Run `lockbox add --name <NAME> --username <USER> --generate` to add a secret.");

    Ok(())
}
