//! Values produced by instantiation.
//!
//! A parsed config tree instantiates into a [`Value`]: a mix of literal
//! scalars, containers, live objects, partial invocations and deferred
//! specs that were left alone.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::error::{Error, Result};
use crate::registry::Constructor;
use crate::{ConfigMap, ConfigValue};

/// Key lookup exposed by dynamic macro providers.
///
/// A provider object is snapshotted once per parse: every key returned by
/// [`keys`](ParamSource::keys) is read through [`get`](ParamSource::get)
/// and the results become that macro's parameters.
pub trait ParamSource: Send + Sync {
    /// Parameter names this source provides.
    fn keys(&self) -> Vec<String>;

    /// Value of one parameter.
    fn get(&self, key: &str) -> Option<ConfigValue>;
}

impl ParamSource for ConfigMap {
    fn keys(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        serde_json::Map::get(self, key).cloned()
    }
}

/// A live, type-erased object returned by a constructor.
#[derive(Clone)]
pub struct Object {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
    params: Option<Arc<dyn ParamSource>>,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
            params: None,
        }
    }

    /// Wrap a value that also serves as a macro parameter source.
    pub fn with_params<T: ParamSource + Any>(value: T) -> Self {
        let inner = Arc::new(value);
        let params: Arc<dyn ParamSource> = inner.clone();
        Self {
            type_name: std::any::type_name::<T>(),
            inner,
            params: Some(params),
        }
    }

    /// Rust type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn params(&self) -> Option<&dyn ParamSource> {
        self.params.as_deref()
    }

    /// Whether both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type_name", &self.type_name)
            .field("params", &self.params.is_some())
            .finish()
    }
}

/// A constructor with arguments bound ahead of invocation.
#[derive(Clone)]
pub struct Partial {
    identifier: String,
    constructor: Constructor,
    args: Args,
}

impl Partial {
    pub fn new(identifier: impl Into<String>, constructor: Constructor, args: Args) -> Self {
        Self {
            identifier: identifier.into(),
            constructor,
            args,
        }
    }

    /// The `type` identifier this partial was built from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Invoke with the bound arguments only.
    pub fn call(&self) -> Result<Value> {
        self.constructor
            .invoke(self.args.clone())
            .map_err(Error::Construction)
    }

    /// Invoke with extra arguments.
    ///
    /// Extra positional arguments follow the bound ones. Extra keyword
    /// arguments override bound keywords of the same name.
    pub fn call_with(&self, extra: Args) -> Result<Value> {
        let mut args = self.args.clone();
        args.positional.extend(extra.positional);
        args.keyword.extend(extra.keyword);
        self.constructor.invoke(args).map_err(Error::Construction)
    }
}

impl fmt::Debug for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partial")
            .field("identifier", &self.identifier)
            .field("args", &self.args)
            .finish()
    }
}

/// Result of instantiating a parsed config node.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null, bool, number or string.
    Literal(ConfigValue),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Object),
    Partial(Partial),
    /// An `eval: "none"` spec, returned untouched.
    Deferred(ConfigMap),
}

impl Value {
    pub fn null() -> Self {
        Value::Literal(ConfigValue::Null)
    }

    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Object::new(value))
    }

    pub fn as_literal(&self) -> Option<&ConfigValue> {
        match self {
            Value::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(ConfigValue::as_str)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_literal().and_then(ConfigValue::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_literal().and_then(ConfigValue::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(ConfigValue::as_bool)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_partial(&self) -> Option<&Partial> {
        match self {
            Value::Partial(partial) => Some(partial),
            _ => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&ConfigMap> {
        match self {
            Value::Deferred(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the wrapped object as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(Object::downcast_ref::<T>)
    }

    /// Look up a key of a `Map` value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Convert back to a config tree.
    ///
    /// Returns `None` when the value contains a live object or a partial.
    pub fn to_config(&self) -> Option<ConfigValue> {
        match self {
            Value::Literal(value) => Some(value.clone()),
            Value::List(items) => items
                .iter()
                .map(Value::to_config)
                .collect::<Option<Vec<_>>>()
                .map(ConfigValue::Array),
            Value::Map(map) => map
                .iter()
                .map(|(key, value)| value.to_config().map(|v| (key.clone(), v)))
                .collect::<Option<ConfigMap>>()
                .map(ConfigValue::Object),
            Value::Deferred(map) => Some(ConfigValue::Object(map.clone())),
            Value::Object(_) | Value::Partial(_) => None,
        }
    }
}

impl From<ConfigValue> for Value {
    /// Lift a config tree without instantiating anything.
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            ConfigValue::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
            scalar => Value::Literal(scalar),
        }
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Partial> for Value {
    fn from(partial: Partial) -> Self {
        Value::Partial(partial)
    }
}
