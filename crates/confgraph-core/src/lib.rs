//! Config resolution and instantiation engine for confgraph.
//!
//! Turns a JSON-shaped config tree into a graph of live objects in two
//! passes:
//!
//! 1. [`parse`] evaluates the macro table once and substitutes every
//!    `"$macro:param"`, `"@self"`, `"@macros"` and `"@macros_eval"` string,
//!    reporting unused macro parameters as [`Diagnostic`]s.
//! 2. [`instantiate`] builds every object spec (a mapping with a `type`
//!    key) bottom-up through an injected [`TypeResolver`], honoring each
//!    node's `eval` mode.
//!
//! [`Engine`] bundles both passes with a resolver.

pub mod args;
pub mod builtins;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod instantiate;
pub mod macros;
pub mod parser;
pub mod path;
pub mod registry;
pub mod spec;
pub mod value;

/// The JSON data model every config tree is made of.
pub type ConfigValue = serde_json::Value;
/// A config mapping.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

pub use args::Args;
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use engine::{Built, Engine};
pub use error::{ArgError, BoxError, Error, Result};
pub use instantiate::{Instantiator, instantiate, validate};
pub use macros::{EvaluatedMacros, MacroParams, UsageLedger, evaluate_macros};
pub use parser::{Parsed, Reference, parse, parse_with_sink};
pub use path::NodePath;
pub use registry::{ConstructResult, Constructor, TypeRegistry, TypeResolver};
pub use spec::{EvalMode, ObjectSpec};
pub use value::{Object, ParamSource, Partial, Value};
