//! Command implementations for confgraph-cli

pub mod build;
pub mod check;
pub mod macros;
pub mod parse;

pub use build::run_build;
pub use check::run_check;
pub use macros::run_macros;
pub use parse::run_parse;

use std::path::Path;

use colored::Colorize;
use confgraph_core::{ConfigMap, ConfigValue, Diagnostic};
use confgraph_fs::ConfigStore;

use crate::error::{CliError, Result};

/// Load a config tree and its optional macro table.
pub(crate) fn load_inputs(config: &Path, macros: Option<&Path>) -> Result<(ConfigValue, ConfigMap)> {
    let store = ConfigStore::new();
    let tree = store.load_value(config)?;
    let table = match macros {
        Some(path) => store.load_macros(path)?,
        None => ConfigMap::new(),
    };
    Ok((tree, table))
}

pub(crate) fn print_json(value: &ConfigValue) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turn diagnostics into a failure when warnings are denied.
pub(crate) fn enforce_warnings(diagnostics: &[Diagnostic], deny_warnings: bool) -> Result<()> {
    if !deny_warnings || diagnostics.is_empty() {
        return Ok(());
    }
    for diagnostic in diagnostics {
        eprintln!("{}: {}", "warning".yellow().bold(), diagnostic);
    }
    Err(CliError::user(format!(
        "{} unused macro parameter(s) with --deny-warnings",
        diagnostics.len()
    )))
}
