//! Facade tying parsing and instantiation to one resolver.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::Result;
use crate::instantiate::{Instantiator, validate};
use crate::macros::{EvaluatedMacros, evaluate_macros};
use crate::parser::{Parsed, parse, parse_with_sink};
use crate::registry::{TypeRegistry, TypeResolver};
use crate::value::Value;
use crate::{ConfigMap, ConfigValue};

/// Result of [`Engine::build`].
#[derive(Debug, Clone)]
pub struct Built {
    pub value: Value,
    pub diagnostics: Vec<Diagnostic>,
}

/// Config engine bound to a type resolver.
///
/// # Example
///
/// ```
/// use confgraph_core::{ConfigMap, Engine};
/// use serde_json::json;
///
/// let engine = Engine::with_builtins();
/// let macros: ConfigMap = serde_json::from_value(json!({"params": {"n": 3}})).unwrap();
/// let config = json!({"type": "list", "*": ["$params:n", "$params:n"]});
///
/// let built = engine.build(&config, &macros).unwrap();
/// assert_eq!(built.value.to_config(), Some(json!([3, 3])));
/// assert!(built.diagnostics.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine<R = TypeRegistry> {
    resolver: R,
}

impl Engine<TypeRegistry> {
    /// Engine over a registry holding only the builtin constructors.
    pub fn with_builtins() -> Self {
        Self::new(TypeRegistry::with_builtins())
    }
}

impl<R: TypeResolver> Engine<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn into_resolver(self) -> R {
        self.resolver
    }

    pub fn evaluate_macros(&self, macros: &ConfigMap) -> Result<EvaluatedMacros> {
        evaluate_macros(macros, &self.resolver)
    }

    pub fn parse(&self, config: &ConfigValue, macros: &ConfigMap) -> Result<Parsed> {
        parse(config, macros, &self.resolver)
    }

    pub fn parse_with_sink(
        &self,
        config: &ConfigValue,
        macros: &ConfigMap,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ConfigValue> {
        parse_with_sink(config, macros, &self.resolver, sink)
    }

    pub fn instantiate(&self, parsed: ConfigValue) -> Result<Value> {
        Instantiator::new(&self.resolver).instantiate(parsed)
    }

    pub fn validate(&self, parsed: &ConfigValue) -> Result<()> {
        validate(parsed, &self.resolver)
    }

    /// Parse then instantiate.
    pub fn build(&self, config: &ConfigValue, macros: &ConfigMap) -> Result<Built> {
        let parsed = self.parse(config, macros)?;
        let value = self.instantiate(parsed.config)?;
        Ok(Built {
            value,
            diagnostics: parsed.diagnostics,
        })
    }
}
