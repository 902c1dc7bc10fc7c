//! Clipboard integration for copying passwords.
//!
//! Writes go to the operating system clipboard through `arboard`:
//! - macOS: NSPasteboard
//! - Windows: the Win32 clipboard
//! - Linux: X11 / Wayland selections
//!
//! Copying is fire-and-forget from the vault's point of view: a failure
//! is returned to the caller and has no effect on the session.

use crate::errors::{LockboxError, Result};

/// Destination for copied text.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| LockboxError::ClipboardError(format!("clipboard unavailable: {e}")))?;

        clipboard
            .set_text(text)
            .map_err(|e| LockboxError::ClipboardError(format!("failed to copy: {e}")))?;

        Ok(())
    }
}

/// Copy a secret's password to `clipboard`.
pub fn copy_password(clipboard: &mut impl Clipboard, record: &crate::vault::SecretRecord) -> Result<()> {
    clipboard.write_text(&record.password)?;
    tracing::debug!(id = %record.id, "password copied to clipboard");
    Ok(())
}
