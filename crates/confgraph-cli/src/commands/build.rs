//! The `build` command

use std::path::Path;

use colored::Colorize;
use confgraph_core::{Engine, Value};

use super::{load_inputs, print_json};
use crate::error::Result;

/// Build a config with the builtin types.
///
/// A result made only of literals is printed as JSON; anything holding
/// live objects gets a summary line instead.
pub fn run_build(config: &Path, macros: Option<&Path>) -> Result<()> {
    let (tree, table) = load_inputs(config, macros)?;
    let built = Engine::with_builtins().build(&tree, &table)?;

    match built.value.to_config() {
        Some(literal) => print_json(&literal),
        None => {
            println!("{} {}", "Built".green().bold(), describe(&built.value));
            Ok(())
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Literal(literal) => literal.to_string(),
        Value::List(items) => format!(
            "[{}]",
            items.iter().map(describe).collect::<Vec<_>>().join(", ")
        ),
        Value::Map(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(key, value)| format!("{key}: {}", describe(value)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Object(object) => format!("<{}>", object.type_name()),
        Value::Partial(partial) => format!("<partial {}>", partial.identifier()),
        Value::Deferred(map) => format!("<deferred {}>", serde_json::Value::Object(map.clone())),
    }
}
