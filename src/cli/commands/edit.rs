//! `lockbox edit`: change fields of an existing secret.
//!
//! The record is replaced as a whole; fields not given on the command
//! line keep their current values.

use crate::cli::commands::add::read_secret_password;
use crate::cli::output;
use crate::cli::{resolve_secret, unlock_session, Cli};
use crate::crypto::generate_password;
use crate::errors::{LockboxError, Result};

/// Field changes requested on the command line.
pub struct EditArgs<'a> {
    pub name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub notes: Option<&'a str>,
}

impl EditArgs<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && !self.generate
            && self.notes.is_none()
    }
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, query: &str, args: &EditArgs<'_>) -> Result<()> {
    if args.is_empty() {
        return Err(LockboxError::CommandFailed(
            "nothing to change; pass at least one of --name, --username, --password, --generate, --notes".into(),
        ));
    }

    let (settings, mut session) = unlock_session(cli)?;
    let mut record = resolve_secret(session.list_secrets()?, query)?.clone();

    if let Some(name) = args.name {
        record.name = name.to_string();
    }
    if let Some(username) = args.username {
        record.username = username.to_string();
    }
    if args.generate {
        record.password = generate_password(settings.generated_password_length)?.as_str().to_string();
    } else if let Some(password) = args.password {
        record.password = read_secret_password(Some(password), &record.name)?.as_str().to_string();
    }
    if let Some(notes) = args.notes {
        record.notes = Some(notes.to_string()).filter(|n| !n.trim().is_empty());
    }

    session.update_secret(record.clone())?;

    output::success(&format!("Secret '{}' updated", record.name));
    Ok(())
}
