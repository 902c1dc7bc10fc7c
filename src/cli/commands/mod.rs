//! One module per subcommand.

pub mod add;
pub mod completions;
pub mod copy;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod get;
pub mod init;
pub mod list;
pub mod shell;
pub mod status;
