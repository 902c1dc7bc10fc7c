use clap::Parser;
use lockbox::cli::commands::edit::EditArgs;
use lockbox::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging on stderr so stdout stays clean for command output.
///
/// `RUST_LOG` wins; otherwise only errors are shown unless `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "lockbox=debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => lockbox::cli::commands::init::execute(&cli),
        Commands::Status => lockbox::cli::commands::status::execute(&cli),
        Commands::List { ref search } => {
            lockbox::cli::commands::list::execute(&cli, search.as_deref())
        }
        Commands::Add {
            ref name,
            ref username,
            ref password,
            generate,
            ref notes,
        } => lockbox::cli::commands::add::execute(
            &cli,
            name,
            username,
            password.as_deref(),
            generate,
            notes.as_deref(),
        ),
        Commands::Get { ref query } => lockbox::cli::commands::get::execute(&cli, query),
        Commands::Edit {
            ref query,
            ref name,
            ref username,
            ref password,
            generate,
            ref notes,
        } => {
            let args = EditArgs {
                name: name.as_deref(),
                username: username.as_deref(),
                password: password.as_deref(),
                generate,
                notes: notes.as_deref(),
            };
            lockbox::cli::commands::edit::execute(&cli, query, &args)
        }
        Commands::Delete { ref query, force } => {
            lockbox::cli::commands::delete::execute(&cli, query, force)
        }
        Commands::Copy { ref query } => lockbox::cli::commands::copy::execute(&cli, query),
        Commands::Generate { length } => lockbox::cli::commands::generate::execute(length),
        Commands::Shell => lockbox::cli::commands::shell::execute(&cli),
        Commands::Completions { shell } => lockbox::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        lockbox::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
