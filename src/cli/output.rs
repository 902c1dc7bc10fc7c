//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::DateTime;
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::SecretRecord;

/// How many characters of an id to show in tables.
const SHORT_ID_LEN: usize = 8;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Format an epoch-millisecond timestamp for display (UTC).
pub fn format_millis(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// First few characters of an id, enough to pass back as a query.
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Print a table of secrets (ID, Name, Username, Created). Passwords
/// are never shown here.
pub fn print_secrets_table(secrets: &[&SecretRecord]) {
    if secrets.is_empty() {
        info("No secrets found.");
        tip("Run `lockbox add --name <NAME> --username <USER>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Username", "Created"]);

    for s in secrets {
        table.add_row(vec![
            short_id(&s.id).to_string(),
            s.name.clone(),
            s.username.clone(),
            format_millis(s.created_at),
        ]);
    }

    println!("{table}");
}
