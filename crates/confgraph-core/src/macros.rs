//! Macro evaluation and usage tracking
//!
//! A macro table maps macro names to definitions. A definition is either a
//! literal mapping of parameter values, or an object spec whose instance
//! provides the parameters (a dynamic macro). Dynamic macros are always
//! invoked, whatever `eval` they carry, and are read exactly once per
//! evaluation.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::instantiate::Instantiator;
use crate::path::NodePath;
use crate::registry::TypeResolver;
use crate::spec::{self, EVAL_KEY};
use crate::value::Value;
use crate::{ConfigMap, ConfigValue};

/// Parameters of one evaluated macro.
pub type MacroParams = BTreeMap<String, ConfigValue>;

/// Snapshot of every macro's parameters for one parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluatedMacros {
    table: BTreeMap<String, MacroParams>,
}

impl EvaluatedMacros {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, params: MacroParams) {
        self.table.insert(name.into(), params);
    }

    pub fn get(&self, name: &str, param: &str) -> Option<&ConfigValue> {
        self.table.get(name).and_then(|params| params.get(param))
    }

    pub fn params(&self, name: &str) -> Option<&MacroParams> {
        self.table.get(name)
    }

    /// Macro names (sorted).
    pub fn names(&self) -> Vec<&str> {
        self.table.keys().map(String::as_str).collect()
    }

    /// Every `(macro, param, value)` triple, sorted by macro then param.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &ConfigValue)> {
        self.table.iter().flat_map(|(name, params)| {
            params
                .iter()
                .map(move |(param, value)| (name.as_str(), param.as_str(), value))
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The table as a nested config mapping.
    pub fn to_config_value(&self) -> ConfigValue {
        ConfigValue::Object(
            self.table
                .iter()
                .map(|(name, params)| {
                    let params = params
                        .iter()
                        .map(|(param, value)| (param.clone(), value.clone()))
                        .collect::<ConfigMap>();
                    (name.clone(), ConfigValue::Object(params))
                })
                .collect(),
        )
    }
}

/// Evaluate a raw macro table.
pub fn evaluate_macros(macros: &ConfigMap, resolver: &dyn TypeResolver) -> Result<EvaluatedMacros> {
    let instantiator = Instantiator::new(resolver);
    let mut evaluated = EvaluatedMacros::new();
    for (name, definition) in macros {
        let params = evaluate_macro(name, definition, &instantiator)?;
        tracing::debug!(macro_name = %name, params = params.len(), "evaluated macro");
        evaluated.insert(name.clone(), params);
    }
    Ok(evaluated)
}

fn evaluate_macro(
    name: &str,
    definition: &ConfigValue,
    instantiator: &Instantiator<'_>,
) -> Result<MacroParams> {
    let ConfigValue::Object(map) = definition else {
        return Err(Error::invalid_macro(
            name,
            format!("expected a mapping, got {}", spec::kind_name(definition)),
        ));
    };

    if !spec::is_object_spec(definition) {
        return Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
    }

    let mut map = map.clone();
    map.remove(EVAL_KEY);
    let provider = instantiator
        .instantiate_at(ConfigValue::Object(map), &NodePath::root().key(name))
        .map_err(|source| Error::MacroEvaluation {
            macro_name: name.to_string(),
            source: Box::new(source),
        })?;

    provider_params(name, &provider)
}

fn provider_params(name: &str, provider: &Value) -> Result<MacroParams> {
    match provider {
        Value::Object(object) => {
            let source = object.params().ok_or_else(|| {
                Error::invalid_macro(
                    name,
                    format!("{} does not expose parameter lookup", object.type_name()),
                )
            })?;
            source
                .keys()
                .into_iter()
                .map(|key| match source.get(&key) {
                    Some(value) => Ok((key, value)),
                    None => Err(Error::invalid_macro(
                        name,
                        format!("provider lists parameter {key} but has no value for it"),
                    )),
                })
                .collect()
        }
        Value::Map(values) => values
            .iter()
            .map(|(key, value)| match value.to_config() {
                Some(value) => Ok((key.clone(), value)),
                None => Err(Error::invalid_macro(
                    name,
                    format!("parameter {key} is not a literal value"),
                )),
            })
            .collect(),
        _ => Err(Error::invalid_macro(name, "provider result is not a mapping")),
    }
}

/// The `(macro, param)` pairs substituted during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageLedger {
    used: BTreeSet<(String, String)>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, param: &str) {
        self.used.insert((name.to_string(), param.to_string()));
    }

    pub fn contains(&self, name: &str, param: &str) -> bool {
        self.used.contains(&(name.to_string(), param.to_string()))
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Parameters of `macros` never recorded here, sorted.
    pub fn unused<'m>(&self, macros: &'m EvaluatedMacros) -> Vec<(&'m str, &'m str)> {
        macros
            .iter()
            .filter(|(name, param, _)| !self.contains(name, param))
            .map(|(name, param, _)| (name, param))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table(value: ConfigValue) -> ConfigMap {
        match value {
            ConfigValue::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_static_macros_taken_at_face_value() {
        let macros = table(json!({"params": {"lr": 0.1, "ref": "$other:x"}}));
        let evaluated = evaluate_macros(&macros, &TypeRegistry::new()).unwrap();
        assert_eq!(evaluated.get("params", "lr"), Some(&json!(0.1)));
        assert_eq!(evaluated.get("params", "ref"), Some(&json!("$other:x")));
    }

    #[test]
    fn test_dynamic_macro_ignores_eval() {
        let macros = table(json!({
            "paths": {"type": "dict", "eval": "none", "root": "/data"}
        }));
        let evaluated = evaluate_macros(&macros, &TypeRegistry::with_builtins()).unwrap();
        assert_eq!(evaluated.get("paths", "root"), Some(&json!("/data")));
    }

    #[test]
    fn test_non_mapping_definition_rejected() {
        let macros = table(json!({"params": 3}));
        let err = evaluate_macros(&macros, &TypeRegistry::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidMacro { macro_name, .. } if macro_name == "params"));
    }

    #[test]
    fn test_failed_provider_tagged_with_macro_name() {
        let macros = table(json!({"clock": {"type": "Missing"}}));
        let err = evaluate_macros(&macros, &TypeRegistry::new()).unwrap_err();
        match err {
            Error::MacroEvaluation { macro_name, source } => {
                assert_eq!(macro_name, "clock");
                assert!(matches!(*source, Error::TypeResolution { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_provider_without_lookup_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register("Opaque", |_| Ok(Value::object(5_u32)));
        let macros = table(json!({"m": {"type": "Opaque"}}));
        let err = evaluate_macros(&macros, &registry).unwrap_err();
        assert!(err.to_string().contains("does not expose parameter lookup"));
    }

    #[test]
    fn test_to_config_value() {
        let mut evaluated = EvaluatedMacros::new();
        evaluated.insert("params", MacroParams::from([("lr".to_string(), json!(0.1))]));
        assert_eq!(evaluated.to_config_value(), json!({"params": {"lr": 0.1}}));
    }

    #[test]
    fn test_ledger_unused() {
        let mut evaluated = EvaluatedMacros::new();
        evaluated.insert(
            "params",
            MacroParams::from([("a".to_string(), json!(1)), ("b".to_string(), json!(2))]),
        );
        let mut ledger = UsageLedger::new();
        ledger.record("params", "a");
        ledger.record("params", "a");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.unused(&evaluated), vec![("params", "b")]);
    }
}
