//! `lockbox list`: display stored secrets in a table.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, search: Option<&str>) -> Result<()> {
    let (_settings, session) = unlock_session(cli)?;

    let total = session.list_secrets()?.len();
    let secrets = session.search_secrets(search.unwrap_or_default())?;

    match search {
        Some(q) => output::info(&format!(
            "{} of {total} secret(s) match '{q}'",
            secrets.len()
        )),
        None => output::info(&format!("{total} secret(s)")),
    }

    output::print_secrets_table(&secrets);

    Ok(())
}
