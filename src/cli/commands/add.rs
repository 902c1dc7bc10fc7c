//! `lockbox add`: store a new secret in the vault.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::crypto::generate_password;
use crate::errors::{LockboxError, Result};
use crate::vault::SecretRecord;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    username: &str,
    password: Option<&str>,
    generate: bool,
    notes: Option<&str>,
) -> Result<()> {
    let (settings, mut session) = unlock_session(cli)?;

    let secret_password = if generate {
        generate_password(settings.generated_password_length)?
    } else {
        read_secret_password(password, name)?
    };

    let record = SecretRecord::new(name, username, &secret_password, notes);
    let id = record.id.clone();
    session.add_secret(record)?;

    output::success(&format!(
        "Secret '{name}' added ({} total)",
        session.list_secrets()?.len()
    ));
    output::tip(&format!("id: {id}"));
    if generate {
        output::tip(&format!("Run `lockbox copy {}` to copy the generated password.", output::short_id(&id)));
    }

    Ok(())
}

/// Determine a secret's password from one of three sources.
pub(crate) fn read_secret_password(inline: Option<&str>, name: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        // Source 1: Inline value on the command line.
        output::warning("Password provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut *buf)?;
        let trimmed = Zeroizing::new(buf.trim_end().to_string());
        if trimmed.is_empty() {
            return Err(LockboxError::Validation("password cannot be empty".into()));
        }
        return Ok(trimmed);
    }

    // Source 3: Interactive secure prompt (default).
    let value = dialoguer::Password::new()
        .with_prompt(format!("Password for {name}"))
        .interact()
        .map_err(|e| LockboxError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}
