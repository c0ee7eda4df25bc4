//! The `parse` command

use std::path::Path;

use colored::Colorize;
use confgraph_core::Engine;
use confgraph_fs::ConfigStore;

use super::{enforce_warnings, load_inputs, print_json};
use crate::error::Result;

/// Parse a config, printing the tree or writing it to `output`.
///
/// Output is emitted before `deny_warnings` is enforced.
pub fn run_parse(
    config: &Path,
    macros: Option<&Path>,
    output: Option<&Path>,
    deny_warnings: bool,
) -> Result<()> {
    let (tree, table) = load_inputs(config, macros)?;
    let parsed = Engine::with_builtins().parse(&tree, &table)?;

    match output {
        Some(path) => {
            ConfigStore::new().save(path, &parsed.config)?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => print_json(&parsed.config)?,
    }

    enforce_warnings(&parsed.diagnostics, deny_warnings)
}
