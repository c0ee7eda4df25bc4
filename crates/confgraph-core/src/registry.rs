//! Type resolution for object specs
//!
//! The engine never looks up types on its own. Hosts supply a
//! [`TypeResolver`], usually a [`TypeRegistry`] populated at startup with
//! one constructor per `type` identifier.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::error::{BoxError, Error, Result};
use crate::value::Value;

/// Outcome of a constructor call.
pub type ConstructResult = std::result::Result<Value, BoxError>;

type ConstructFn = dyn Fn(Args) -> ConstructResult + Send + Sync;

/// A callable producing a [`Value`] from arguments.
#[derive(Clone)]
pub struct Constructor {
    func: Arc<ConstructFn>,
}

impl Constructor {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Args) -> ConstructResult + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    pub fn invoke(&self, args: Args) -> ConstructResult {
        (self.func)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constructor(..)")
    }
}

/// Maps a `type` identifier to a constructor.
pub trait TypeResolver {
    /// Fails with [`Error::TypeResolution`] for unknown identifiers.
    fn resolve_type(&self, identifier: &str) -> Result<Constructor>;
}

impl<T: TypeResolver + ?Sized> TypeResolver for &T {
    fn resolve_type(&self, identifier: &str) -> Result<Constructor> {
        (**self).resolve_type(identifier)
    }
}

impl<T: TypeResolver + ?Sized> TypeResolver for Arc<T> {
    fn resolve_type(&self, identifier: &str) -> Result<Constructor> {
        (**self).resolve_type(identifier)
    }
}

/// Name to constructor registry.
///
/// # Example
///
/// ```
/// use confgraph_core::{TypeRegistry, TypeResolver, Value};
///
/// let mut registry = TypeRegistry::new();
/// registry.register("zero", |_args| Ok(Value::Literal(0.into())));
/// assert!(registry.resolve_type("zero").is_ok());
/// assert!(registry.resolve_type("one").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    constructors: HashMap<String, Constructor>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry with the builtin constructors registered.
    ///
    /// See [`crate::builtins`] for the list.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register_builtins(&mut registry);
        registry
    }

    /// Register a constructor for an identifier.
    ///
    /// If the identifier was already registered, the previous constructor
    /// is replaced.
    pub fn register<F>(&mut self, identifier: impl Into<String>, func: F)
    where
        F: Fn(Args) -> ConstructResult + Send + Sync + 'static,
    {
        self.register_constructor(identifier, Constructor::new(func));
    }

    pub fn register_constructor(&mut self, identifier: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(identifier.into(), constructor);
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.constructors.contains_key(identifier)
    }

    /// List all registered identifiers (sorted).
    pub fn list(&self) -> Vec<&str> {
        let mut identifiers: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        identifiers.sort();
        identifiers
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve_type(&self, identifier: &str) -> Result<Constructor> {
        self.constructors
            .get(identifier)
            .cloned()
            .ok_or_else(|| Error::TypeResolution {
                identifier: identifier.to_string(),
            })
    }
}
