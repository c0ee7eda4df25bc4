//! Macro and special-reference substitution.
//!
//! Parsing walks a raw config tree depth-first and rebuilds it, replacing
//! every string that is exactly a reference:
//!
//! ```text
//! "$<macro>:<param>"  value of param in the evaluated macro table
//! "@self"             the raw config given to this parse
//! "@macros"           the raw macro table given to this parse
//! "@macros_eval"      the evaluated macro table of this parse
//! ```
//!
//! The macro name runs up to the first `:` and the param is the rest, so
//! names may hold any character except that the macro name has no `:`.
//! Strings that merely contain a reference are left alone. The macro
//! table is evaluated once, before the walk, so every reference observes
//! the same snapshot.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Error, Result};
use crate::macros::{EvaluatedMacros, UsageLedger, evaluate_macros};
use crate::registry::TypeResolver;
use crate::{ConfigMap, ConfigValue};

pub const SELF_REFERENCE: &str = "@self";
pub const MACROS_REFERENCE: &str = "@macros";
pub const MACROS_EVAL_REFERENCE: &str = "@macros_eval";

static MACRO_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\$([^:]+):(.+)$")
        .expect("Invalid macro reference regex")
});

/// A string value recognized as a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    Macro { name: &'a str, param: &'a str },
    SelfConfig,
    Macros,
    MacrosEval,
}

impl<'a> Reference<'a> {
    /// Recognize a whole string as a reference.
    ///
    /// # Example
    ///
    /// ```
    /// use confgraph_core::parser::Reference;
    ///
    /// assert_eq!(
    ///     Reference::parse("$params:lr"),
    ///     Some(Reference::Macro { name: "params", param: "lr" })
    /// );
    /// assert_eq!(Reference::parse("@self"), Some(Reference::SelfConfig));
    /// assert_eq!(Reference::parse("lr=$params:lr"), None);
    /// ```
    pub fn parse(value: &'a str) -> Option<Self> {
        match value {
            SELF_REFERENCE => Some(Reference::SelfConfig),
            MACROS_REFERENCE => Some(Reference::Macros),
            MACROS_EVAL_REFERENCE => Some(Reference::MacrosEval),
            _ => {
                let caps = MACRO_REFERENCE_REGEX.captures(value)?;
                Some(Reference::Macro {
                    name: caps.get(1)?.as_str(),
                    param: caps.get(2)?.as_str(),
                })
            }
        }
    }
}

/// Output of one parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The config with every reference replaced.
    pub config: ConfigValue,
    /// The macro snapshot used for substitution.
    pub macros_eval: EvaluatedMacros,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse a config tree against a macro table, collecting diagnostics.
pub fn parse(
    config: &ConfigValue,
    macros: &ConfigMap,
    resolver: &dyn TypeResolver,
) -> Result<Parsed> {
    let mut diagnostics = Vec::new();
    let (config, macros_eval) = resolve(config, macros, resolver, &mut diagnostics)?;
    Ok(Parsed {
        config,
        macros_eval,
        diagnostics,
    })
}

/// Parse a config tree, sending diagnostics to `sink`.
pub fn parse_with_sink(
    config: &ConfigValue,
    macros: &ConfigMap,
    resolver: &dyn TypeResolver,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConfigValue> {
    resolve(config, macros, resolver, sink).map(|(config, _)| config)
}

fn resolve(
    config: &ConfigValue,
    macros: &ConfigMap,
    resolver: &dyn TypeResolver,
    sink: &mut dyn DiagnosticSink,
) -> Result<(ConfigValue, EvaluatedMacros)> {
    let macros_eval = evaluate_macros(macros, resolver)?;

    let mut walker = Walker {
        config,
        macros,
        macros_eval: &macros_eval,
        macros_eval_value: macros_eval.to_config_value(),
        ledger: UsageLedger::new(),
    };
    let parsed = walker.walk(config)?;
    let ledger = walker.ledger;

    for (macro_name, param) in ledger.unused(&macros_eval) {
        tracing::warn!(macro_name, param, "macro param not used");
        sink.emit(Diagnostic::unused_macro_param(macro_name, param));
    }
    tracing::debug!(
        macros = macros_eval.len(),
        substituted = ledger.len(),
        "parsed config"
    );

    Ok((parsed, macros_eval))
}

struct Walker<'a> {
    config: &'a ConfigValue,
    macros: &'a ConfigMap,
    macros_eval: &'a EvaluatedMacros,
    macros_eval_value: ConfigValue,
    ledger: UsageLedger,
}

impl Walker<'_> {
    fn walk(&mut self, node: &ConfigValue) -> Result<ConfigValue> {
        match node {
            ConfigValue::String(value) => self.substitute(value),
            ConfigValue::Array(items) => items
                .iter()
                .map(|item| self.walk(item))
                .collect::<Result<Vec<_>>>()
                .map(ConfigValue::Array),
            ConfigValue::Object(map) => map
                .iter()
                .map(|(key, value)| -> Result<(String, ConfigValue)> {
                    Ok((key.clone(), self.walk(value)?))
                })
                .collect::<Result<ConfigMap>>()
                .map(ConfigValue::Object),
            scalar => Ok(scalar.clone()),
        }
    }

    fn substitute(&mut self, value: &str) -> Result<ConfigValue> {
        match Reference::parse(value) {
            None => Ok(ConfigValue::String(value.to_string())),
            Some(Reference::Macro { name, param }) => {
                let resolved = self
                    .macros_eval
                    .get(name, param)
                    .cloned()
                    .ok_or_else(|| Error::MacroResolution {
                        macro_name: name.to_string(),
                        param: param.to_string(),
                    })?;
                tracing::trace!(macro_name = name, param, "substituted macro reference");
                self.ledger.record(name, param);
                Ok(resolved)
            }
            Some(Reference::SelfConfig) => Ok(self.config.clone()),
            Some(Reference::Macros) => Ok(ConfigValue::Object(self.macros.clone())),
            Some(Reference::MacrosEval) => Ok(self.macros_eval_value.clone()),
        }
    }
}
