//! `lockbox shell`: an interactive session that stays unlocked between
//! commands and locks itself after five idle minutes.
//!
//! Idle time is measured between input lines: when a line arrives after
//! the timeout, the session is locked before the line is handled.
//! A terminal has no visibility signal, so the shell never fires the
//! session's `on_hidden` hook.

use std::io::{self, BufRead, Write};

use crate::cli::output;
use crate::cli::{prompt_password, resolve_secret, unlock_session, Cli};
use crate::clipboard::{copy_password, Clipboard, SystemClipboard};
use crate::errors::{LockboxError, Result};
use crate::vault::{IdleWatch, KeyValueStore, VaultSession};

const HELP: &str = "\
commands:
  list [text]   list secrets, optionally filtered by name/username
  get <query>   print a secret's password
  copy <query>  copy a secret's password to the clipboard
  lock          lock the vault now
  unlock        unlock again with the master password
  status        show whether the vault is locked
  quit          lock and exit";

/// What the read loop should do after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, session) = unlock_session(cli)?;
    output::info("Vault unlocked. Type `help` for commands.");

    let stdin = io::stdin();
    run(
        session,
        stdin.lock(),
        &mut SystemClipboard::new(),
        IdleWatch::new(),
    )
}

fn run<S, R, C>(
    mut session: VaultSession<S>,
    mut input: R,
    clipboard: &mut C,
    mut watch: IdleWatch,
) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    C: Clipboard,
{
    loop {
        print!("lockbox> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        if watch.enforce(&mut session) {
            output::warning("Vault locked after 5 minutes of inactivity.");
        }
        watch.record_activity();

        match handle(&mut session, clipboard, line.trim()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(LockboxError::VaultLocked) => {
                output::error("Vault is locked.");
                output::tip("Type `unlock` to continue.");
            }
            Err(e) => output::error(&e.to_string()),
        }
    }

    session.lock();
    Ok(())
}

fn handle<S: KeyValueStore, C: Clipboard>(
    session: &mut VaultSession<S>,
    clipboard: &mut C,
    line: &str,
) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" | "?" => println!("{HELP}"),
        "list" | "ls" => {
            let secrets = session.search_secrets(arg)?;
            output::print_secrets_table(&secrets);
        }
        "get" => {
            let record = resolve_secret(session.list_secrets()?, require_arg(command, arg)?)?;
            println!("{}", record.password);
        }
        "copy" | "cp" => {
            let record = resolve_secret(session.list_secrets()?, require_arg(command, arg)?)?;
            copy_password(clipboard, record)?;
            output::success(&format!("Password for '{}' copied", record.name));
        }
        "lock" => {
            session.lock();
            output::info("Vault locked.");
        }
        "unlock" => {
            if session.is_unlocked() {
                output::info("Vault is already unlocked.");
            } else {
                let password = prompt_password()?;
                session.unlock(password.as_bytes())?;
                output::success("Vault unlocked.");
            }
        }
        "status" => {
            let state = if session.is_unlocked() { "unlocked" } else { "locked" };
            output::info(&format!("Vault is {state}."));
        }
        "quit" | "exit" => return Ok(Flow::Quit),
        other => {
            return Err(LockboxError::CommandFailed(format!(
                "unknown command '{other}'; type `help`"
            )))
        }
    }

    Ok(Flow::Continue)
}

fn require_arg<'a>(command: &str, arg: &'a str) -> Result<&'a str> {
    if arg.is_empty() {
        return Err(LockboxError::CommandFailed(format!(
            "usage: {command} <id|name>"
        )));
    }
    Ok(arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{MemoryStore, SecretRecord};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingClipboard {
        last: Option<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            self.last = Some(text.to_string());
            Ok(())
        }
    }

    fn unlocked_session() -> VaultSession<MemoryStore> {
        let mut session = VaultSession::new(MemoryStore::new());
        session.create_vault(b"shell-password").unwrap();
        session
            .add_secret(SecretRecord::new("Mail", "a@b.com", "mail-pw", None))
            .unwrap();
        session
    }

    #[test]
    fn copy_writes_password_to_clipboard() {
        let mut session = unlocked_session();
        let mut clipboard = RecordingClipboard::default();

        let flow = handle(&mut session, &mut clipboard, "copy mail").unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(clipboard.last.as_deref(), Some("mail-pw"));
    }

    #[test]
    fn lock_command_locks_and_blocks_reads() {
        let mut session = unlocked_session();
        let mut clipboard = RecordingClipboard::default();

        handle(&mut session, &mut clipboard, "lock").unwrap();
        assert!(!session.is_unlocked());
        assert!(matches!(
            handle(&mut session, &mut clipboard, "get mail"),
            Err(LockboxError::VaultLocked)
        ));
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut session = unlocked_session();
        let mut clipboard = RecordingClipboard::default();

        assert_eq!(handle(&mut session, &mut clipboard, "quit").unwrap(), Flow::Quit);
        assert!(matches!(
            handle(&mut session, &mut clipboard, "frobnicate"),
            Err(LockboxError::CommandFailed(_))
        ));
        assert!(matches!(
            handle(&mut session, &mut clipboard, "get"),
            Err(LockboxError::CommandFailed(_))
        ));
    }

    #[test]
    fn run_locks_when_input_ends() {
        let session = unlocked_session();
        let mut clipboard = RecordingClipboard::default();
        let input = io::Cursor::new("status\nlist\n");

        run(session, input, &mut clipboard, IdleWatch::new()).unwrap();
    }

    #[test]
    fn idle_timeout_locks_before_the_next_command() {
        let session = unlocked_session();
        let mut clipboard = RecordingClipboard::default();
        // A zero timeout is already expired when the first line arrives.
        let input = io::Cursor::new("copy mail\n");

        run(
            session,
            input,
            &mut clipboard,
            IdleWatch::with_timeout(Duration::ZERO),
        )
        .unwrap();
        assert_eq!(clipboard.last, None);
    }
}
