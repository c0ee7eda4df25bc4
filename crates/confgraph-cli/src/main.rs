//! confgraph CLI
//!
//! Parses, checks and builds config trees from the command line.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialise logging: {e}")))?;
    tracing::debug!(command = ?cli.command, "starting");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Parse {
            config,
            macros,
            output,
            deny_warnings,
        } => commands::run_parse(&config, macros.as_deref(), output.as_deref(), deny_warnings),
        Commands::Macros { macros } => commands::run_macros(&macros),
        Commands::Check {
            config,
            macros,
            deny_warnings,
        } => commands::run_check(&config, macros.as_deref(), deny_warnings),
        Commands::Build { config, macros } => commands::run_build(&config, macros.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }
}
