//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// confgraph - Resolve macro references and build object graphs from config trees
#[derive(Parser, Debug)]
#[command(name = "confgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Substitute macro and self references, printing the parsed tree
    ///
    /// Examples:
    ///   confgraph parse pipeline.yaml -m macros.yaml
    ///   confgraph parse pipeline.json -m macros.toml -o parsed.json
    Parse {
        /// Config file (.json, .yaml, .yml or .toml)
        config: PathBuf,

        /// Macro table file
        #[arg(short, long, env = "CONFGRAPH_MACROS")]
        macros: Option<PathBuf>,

        /// Write the parsed tree here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail when a macro parameter goes unused
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Evaluate a macro table and print every parameter
    Macros {
        /// Macro table file
        macros: PathBuf,
    },

    /// Parse a config and validate its object specs without constructing them
    Check {
        /// Config file
        config: PathBuf,

        /// Macro table file
        #[arg(short, long, env = "CONFGRAPH_MACROS")]
        macros: Option<PathBuf>,

        /// Fail when a macro parameter goes unused
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Parse and instantiate a config with the builtin types
    Build {
        /// Config file
        config: PathBuf,

        /// Macro table file
        #[arg(short, long, env = "CONFGRAPH_MACROS")]
        macros: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommand_flags() {
        let cli = Cli::parse_from([
            "confgraph",
            "parse",
            "config.yaml",
            "-m",
            "macros.yaml",
            "-o",
            "out.json",
            "--deny-warnings",
        ]);
        assert_eq!(
            cli.command,
            Commands::Parse {
                config: PathBuf::from("config.yaml"),
                macros: Some(PathBuf::from("macros.yaml")),
                output: Some(PathBuf::from("out.json")),
                deny_warnings: true,
            }
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["confgraph", "macros", "m.json", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Macros {
                macros: PathBuf::from("m.json")
            }
        );
    }
}
