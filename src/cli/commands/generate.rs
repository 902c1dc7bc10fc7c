//! `lockbox generate`: print a random password.

use std::path::Path;

use crate::config::Settings;
use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(length: Option<usize>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let length = resolve_length(&cwd, length)?;

    let password = generate_password(length)?;
    println!("{}", password.as_str());
    Ok(())
}

/// An explicit length wins over the configured one.
pub(crate) fn resolve_length(project_dir: &Path, length: Option<usize>) -> Result<usize> {
    match length {
        Some(n) => Ok(n),
        None => Ok(Settings::load(project_dir)?.generated_password_length),
    }
}
