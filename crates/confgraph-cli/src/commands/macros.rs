//! The `macros` command

use std::path::Path;

use confgraph_core::Engine;
use confgraph_fs::ConfigStore;

use super::print_json;
use crate::error::Result;

pub fn run_macros(macros: &Path) -> Result<()> {
    let table = ConfigStore::new().load_macros(macros)?;
    let evaluated = Engine::with_builtins().evaluate_macros(&table)?;
    print_json(&evaluated.to_config_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_macros_accepts_dynamic_providers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("macros.toml");
        fs::write(&path, "[params]\nlr = 0.1\n\n[run]\ntype = \"run\"\n").unwrap();

        assert!(run_macros(&path).is_ok());
    }

    #[test]
    fn test_macros_rejects_scalar_definition() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("macros.json");
        fs::write(&path, r#"{"params": 3}"#).unwrap();

        let err = run_macros(&path).unwrap_err();
        assert!(matches!(
            err,
            CliError::Core(confgraph_core::Error::InvalidMacro { .. })
        ));
    }
}
