//! Constructor arguments.

use std::collections::BTreeMap;

use crate::error::ArgError;
use crate::value::Value;

/// Positional and keyword arguments passed to a constructor.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keyword: BTreeMap<String, Value>,
}

impl Args {
    pub fn new(positional: Vec<Value>, keyword: BTreeMap<String, Value>) -> Self {
        Self {
            positional,
            keyword,
        }
    }

    pub fn positional(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keyword: BTreeMap::new(),
        }
    }

    /// Add a keyword argument, builder style.
    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Add a positional argument, builder style.
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    pub fn take_kwarg(&mut self, name: &str) -> Option<Value> {
        self.keyword.remove(name)
    }

    pub fn require_kwarg(&self, name: &str) -> Result<&Value, ArgError> {
        self.kwarg(name).ok_or_else(|| ArgError::missing(name))
    }

    /// Read an optional string keyword; present but not a string is an error.
    pub fn str_kwarg(&self, name: &str) -> Result<Option<&str>, ArgError> {
        self.typed_kwarg(name, "string", Value::as_str)
    }

    pub fn f64_kwarg(&self, name: &str) -> Result<Option<f64>, ArgError> {
        self.typed_kwarg(name, "number", Value::as_f64)
    }

    pub fn i64_kwarg(&self, name: &str) -> Result<Option<i64>, ArgError> {
        self.typed_kwarg(name, "integer", Value::as_i64)
    }

    pub fn bool_kwarg(&self, name: &str) -> Result<Option<bool>, ArgError> {
        self.typed_kwarg(name, "bool", Value::as_bool)
    }

    pub fn require_str(&self, name: &str) -> Result<&str, ArgError> {
        self.str_kwarg(name)?.ok_or_else(|| ArgError::missing(name))
    }

    pub fn require_f64(&self, name: &str) -> Result<f64, ArgError> {
        self.f64_kwarg(name)?.ok_or_else(|| ArgError::missing(name))
    }

    pub fn require_i64(&self, name: &str) -> Result<i64, ArgError> {
        self.i64_kwarg(name)?.ok_or_else(|| ArgError::missing(name))
    }

    fn typed_kwarg<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        read: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, ArgError> {
        match self.kwarg(name) {
            None => Ok(None),
            Some(value) => read(value)
                .map(Some)
                .ok_or_else(|| ArgError::wrong_type(name, expected)),
        }
    }
}
