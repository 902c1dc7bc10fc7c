//! `lockbox status`: show vault metadata without unlocking.

use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, session) = open_session(cli)?;
    let path = session.store().path_for(session.storage_key())?;

    match session.container_info()? {
        Some(info) => {
            output::info(&format!("Vault at {}", path.display()));
            println!("  format version: {}", info.version);
            println!("  created:        {}", output::format_millis(info.created_at));
            println!("  last saved:     {}", output::format_millis(info.updated_at));
        }
        None => {
            output::info(&format!("No vault at {}", path.display()));
            output::tip("Run `lockbox init` to create one.");
        }
    }

    Ok(())
}
