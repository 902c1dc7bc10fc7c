//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{LockboxError, Result};
use crate::vault::{FileStore, SecretRecord, VaultSession};

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Shortest id prefix accepted when looking a secret up by id.
const MIN_ID_PREFIX_LEN: usize = 4;

/// Lockbox CLI: encrypted password vault.
#[derive(Parser)]
#[command(name = "lockbox", about = "Encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: .lockbox, or `vault_dir` from .lockbox.toml)
    #[arg(long, env = "LOCKBOX_DIR", global = true)]
    pub vault_dir: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault with a master password
    Init,

    /// Show whether a vault exists and when it was last saved
    Status,

    /// List stored secrets
    List {
        /// Only show secrets whose name or username contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a new secret
    Add {
        /// Display name (e.g. "Mail")
        #[arg(long)]
        name: String,
        /// Account username or email
        #[arg(long)]
        username: String,
        /// Password (omit for interactive prompt or piped stdin)
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password instead of entering one
        #[arg(short, long)]
        generate: bool,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Print a secret's password
    Get {
        /// Secret id, id prefix, or name
        query: String,
    },

    /// Change fields of an existing secret
    Edit {
        /// Secret id, id prefix, or name
        query: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
        /// New notes (pass an empty string to clear)
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a secret
    Delete {
        /// Secret id, id prefix, or name
        query: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Copy a secret's password to the clipboard
    Copy {
        /// Secret id, id prefix, or name
        query: String,
    },

    /// Generate a random password without storing it
    Generate {
        /// Number of characters (default: 16, or the configured length)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Open an interactive session that auto-locks after 5 idle minutes
    Shell,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `LOCKBOX_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("LOCKBOX_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| LockboxError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `LOCKBOX_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("LOCKBOX_PASSWORD") {
        if !pw.is_empty() {
            check_new_password(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| LockboxError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if let Err(e) = check_new_password(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(password);
    }
}

fn check_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LockboxError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Load settings and build a locked session over the configured vault dir.
pub fn open_session(cli: &Cli) -> Result<(Settings, VaultSession<FileStore>)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let dir = settings.vault_dir(&cwd, cli.vault_dir.as_deref());
    let session = VaultSession::with_storage_key(FileStore::new(dir), &settings.storage_key);
    Ok((settings, session))
}

/// Like `open_session`, then prompt for the master password and unlock.
pub fn unlock_session(cli: &Cli) -> Result<(Settings, VaultSession<FileStore>)> {
    let (settings, mut session) = open_session(cli)?;
    if !session.has_vault()? {
        return Err(LockboxError::VaultNotFound);
    }

    let password = prompt_password()?;
    session.unlock(password.as_bytes())?;
    Ok((settings, session))
}

/// Find the one secret a user-supplied query refers to.
///
/// Tried in order: exact id, unique id prefix (at least 4 characters),
/// unique case-insensitive name.
pub fn resolve_secret<'a>(records: &'a [SecretRecord], query: &str) -> Result<&'a SecretRecord> {
    if let Some(record) = records.iter().find(|r| r.id == query) {
        return Ok(record);
    }

    if query.len() >= MIN_ID_PREFIX_LEN {
        let by_prefix: Vec<_> = records.iter().filter(|r| r.id.starts_with(query)).collect();
        match by_prefix.as_slice() {
            [one] => return Ok(*one),
            [] => {}
            _ => {
                return Err(LockboxError::CommandFailed(format!(
                    "id prefix '{query}' matches {} secrets; use a longer prefix",
                    by_prefix.len()
                )))
            }
        }
    }

    let by_name: Vec<_> = records
        .iter()
        .filter(|r| r.name.eq_ignore_ascii_case(query))
        .collect();
    match by_name.as_slice() {
        [one] => Ok(*one),
        [] => Err(LockboxError::SecretNotFound(query.to_string())),
        _ => Err(LockboxError::CommandFailed(format!(
            "{} secrets are named '{query}'; use the id instead",
            by_name.len()
        ))),
    }
}
