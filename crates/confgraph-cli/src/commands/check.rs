//! The `check` command

use std::path::Path;

use colored::Colorize;
use confgraph_core::Engine;

use super::{enforce_warnings, load_inputs};
use crate::error::Result;

/// Parse and validate a config against the builtin registry.
pub fn run_check(config: &Path, macros: Option<&Path>, deny_warnings: bool) -> Result<()> {
    let (tree, table) = load_inputs(config, macros)?;
    let engine = Engine::with_builtins();
    let parsed = engine.parse(&tree, &table)?;
    engine.validate(&parsed.config)?;
    enforce_warnings(&parsed.diagnostics, deny_warnings)?;

    println!("{} {}", "OK".green().bold(), config.display());
    Ok(())
}
