//! Object spec recognition and reserved-key validation.
//!
//! An object spec is a mapping carrying the reserved `type` key. The
//! optional `*` key holds positional arguments and `eval` selects how the
//! node is realized. Every other key is a keyword argument.
//!
//! Recognition is structural: any mapping with a `type` key is a spec, even
//! one whose author meant `type` as an ordinary field. [`classify`] makes the
//! decision explicit so callers never re-derive it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::NodePath;
use crate::{ConfigMap, ConfigValue};

/// Reserved key naming the constructible entity.
pub const TYPE_KEY: &str = "type";
/// Reserved key holding positional arguments.
pub const ARGS_KEY: &str = "*";
/// Reserved key selecting the evaluation mode.
pub const EVAL_KEY: &str = "eval";

/// Whether `key` is one of the reserved spec keys.
pub fn is_reserved(key: &str) -> bool {
    matches!(key, TYPE_KEY | ARGS_KEY | EVAL_KEY)
}

/// How an object spec node is realized by the instantiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// Build the arguments and invoke the constructor.
    #[default]
    Call,

    /// Build the arguments and bind them, deferring invocation.
    Partial,

    /// Leave the node as a literal mapping.
    None,
}

impl FromStr for EvalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "call" => Ok(EvalMode::Call),
            "partial" => Ok(EvalMode::Partial),
            "none" => Ok(EvalMode::None),
            _ => Err(format!(
                "`{EVAL_KEY}` must be one of \"call\", \"partial\", \"none\", got {s:?}"
            )),
        }
    }
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalMode::Call => write!(f, "call"),
            EvalMode::Partial => write!(f, "partial"),
            EvalMode::None => write!(f, "none"),
        }
    }
}

/// Structural role of a node in a config tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Spec(&'a ConfigMap),
    Mapping(&'a ConfigMap),
    Sequence(&'a [ConfigValue]),
    Scalar(&'a ConfigValue),
}

pub fn classify(value: &ConfigValue) -> NodeKind<'_> {
    match value {
        ConfigValue::Object(map) if map.contains_key(TYPE_KEY) => NodeKind::Spec(map),
        ConfigValue::Object(map) => NodeKind::Mapping(map),
        ConfigValue::Array(items) => NodeKind::Sequence(items),
        other => NodeKind::Scalar(other),
    }
}

pub fn is_object_spec(value: &ConfigValue) -> bool {
    matches!(classify(value), NodeKind::Spec(_))
}

/// Check the reserved keys of a spec node and return its evaluation mode.
pub fn validate_spec(map: &ConfigMap, path: &NodePath) -> Result<EvalMode> {
    match map.get(TYPE_KEY) {
        Some(ConfigValue::String(_)) => {}
        Some(other) => {
            return Err(Error::spec(
                path,
                format!("`{TYPE_KEY}` must be a string, got {}", kind_name(other)),
            ));
        }
        None => return Err(Error::spec(path, format!("missing `{TYPE_KEY}` key"))),
    }

    match map.get(ARGS_KEY) {
        Some(args) if !args.is_array() => {
            return Err(Error::spec(
                path,
                format!("`{ARGS_KEY}` must be a sequence, got {}", kind_name(args)),
            ));
        }
        _ => {}
    }

    eval_mode(map, path)
}

/// Read the evaluation mode of a spec node, defaulting to `call`.
pub fn eval_mode(map: &ConfigMap, path: &NodePath) -> Result<EvalMode> {
    match map.get(EVAL_KEY) {
        None => Ok(EvalMode::default()),
        Some(ConfigValue::String(mode)) => mode.parse().map_err(|reason| Error::spec(path, reason)),
        Some(other) => Err(Error::spec(
            path,
            format!("`{EVAL_KEY}` must be a string, got {}", kind_name(other)),
        )),
    }
}

/// A validated object spec, split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub identifier: String,
    pub mode: EvalMode,
    pub positional: Vec<ConfigValue>,
    pub keyword: ConfigMap,
}

impl ObjectSpec {
    pub fn from_map(mut map: ConfigMap, path: &NodePath) -> Result<Self> {
        let mode = validate_spec(&map, path)?;

        let identifier = match map.remove(TYPE_KEY) {
            Some(ConfigValue::String(identifier)) => identifier,
            _ => return Err(Error::spec(path, format!("missing `{TYPE_KEY}` key"))),
        };
        let positional = match map.remove(ARGS_KEY) {
            Some(ConfigValue::Array(items)) => items,
            _ => Vec::new(),
        };
        map.remove(EVAL_KEY);

        Ok(Self {
            identifier,
            mode,
            positional,
            keyword: map,
        })
    }
}

pub(crate) fn kind_name(value: &ConfigValue) -> &'static str {
    match value {
        ConfigValue::Null => "null",
        ConfigValue::Bool(_) => "bool",
        ConfigValue::Number(_) => "number",
        ConfigValue::String(_) => "string",
        ConfigValue::Array(_) => "sequence",
        ConfigValue::Object(_) => "mapping",
    }
}
