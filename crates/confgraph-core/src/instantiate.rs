//! Bottom-up construction of a parsed config tree.
//!
//! Sequences and plain mappings are rebuilt element by element. Object
//! spec nodes have their arguments instantiated first, then their `type`
//! resolved, then their `eval` mode applied:
//!
//! - `call` invokes the constructor and returns its result.
//! - `partial` binds the arguments into a [`Partial`].
//! - `none` returns the node untouched as [`Value::Deferred`], without
//!   looking at its children.

use std::collections::BTreeMap;

use crate::args::Args;
use crate::error::{Error, Result};
use crate::path::NodePath;
use crate::registry::TypeResolver;
use crate::spec::{self, ARGS_KEY, EvalMode, NodeKind, ObjectSpec, TYPE_KEY};
use crate::value::{Partial, Value};
use crate::{ConfigMap, ConfigValue};

/// Instantiate a parsed config tree.
pub fn instantiate(node: ConfigValue, resolver: &dyn TypeResolver) -> Result<Value> {
    Instantiator::new(resolver).instantiate(node)
}

/// Check a parsed tree without invoking any constructor.
///
/// Reserved keys are validated and every `type` outside a deferred node
/// must resolve.
pub fn validate(node: &ConfigValue, resolver: &dyn TypeResolver) -> Result<()> {
    Instantiator::new(resolver).validate_at(node, &NodePath::root())
}

/// Walks parsed trees against one type resolver.
pub struct Instantiator<'r> {
    resolver: &'r dyn TypeResolver,
}

impl<'r> Instantiator<'r> {
    pub fn new(resolver: &'r dyn TypeResolver) -> Self {
        Self { resolver }
    }

    pub fn instantiate(&self, node: ConfigValue) -> Result<Value> {
        self.instantiate_at(node, &NodePath::root())
    }

    /// Instantiate a node located at `path`; the path only feeds diagnostics.
    pub fn instantiate_at(&self, node: ConfigValue, path: &NodePath) -> Result<Value> {
        match node {
            ConfigValue::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| self.instantiate_at(item, &path.index(index)))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            ConfigValue::Object(map) if map.contains_key(TYPE_KEY) => self.object(map, path),
            ConfigValue::Object(map) => self.keyword(map, path).map(Value::Map),
            scalar => Ok(Value::Literal(scalar)),
        }
    }

    fn object(&self, map: ConfigMap, path: &NodePath) -> Result<Value> {
        let bind_only = match spec::validate_spec(&map, path)? {
            EvalMode::None => {
                tracing::trace!(%path, "deferring object spec");
                return Ok(Value::Deferred(map));
            }
            EvalMode::Call => false,
            EvalMode::Partial => true,
        };

        let spec = ObjectSpec::from_map(map, path)?;
        let args_path = path.key(ARGS_KEY);
        let positional = spec
            .positional
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.instantiate_at(item, &args_path.index(index)))
            .collect::<Result<Vec<_>>>()?;
        let keyword = self.keyword(spec.keyword, path)?;

        let constructor = self.resolver.resolve_type(&spec.identifier)?;
        tracing::debug!(identifier = %spec.identifier, mode = %spec.mode, %path, "resolved type");

        let args = Args::new(positional, keyword);
        if bind_only {
            Ok(Value::Partial(Partial::new(spec.identifier, constructor, args)))
        } else {
            constructor.invoke(args).map_err(Error::Construction)
        }
    }

    fn keyword(&self, map: ConfigMap, path: &NodePath) -> Result<BTreeMap<String, Value>> {
        map.into_iter()
            .map(|(key, value)| -> Result<(String, Value)> {
                let value = self.instantiate_at(value, &path.key(key.as_str()))?;
                Ok((key, value))
            })
            .collect()
    }

    pub fn validate_at(&self, node: &ConfigValue, path: &NodePath) -> Result<()> {
        match spec::classify(node) {
            NodeKind::Scalar(_) => Ok(()),
            NodeKind::Sequence(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| self.validate_at(item, &path.index(index))),
            NodeKind::Mapping(map) => map
                .iter()
                .try_for_each(|(key, value)| self.validate_at(value, &path.key(key.as_str()))),
            NodeKind::Spec(map) => {
                if spec::validate_spec(map, path)? == EvalMode::None {
                    return Ok(());
                }
                if let Some(ConfigValue::Array(items)) = map.get(ARGS_KEY) {
                    let args_path = path.key(ARGS_KEY);
                    for (index, item) in items.iter().enumerate() {
                        self.validate_at(item, &args_path.index(index))?;
                    }
                }
                for (key, value) in map.iter().filter(|(key, _)| !spec::is_reserved(key)) {
                    self.validate_at(value, &path.key(key.as_str()))?;
                }
                if let Some(identifier) = map.get(TYPE_KEY).and_then(ConfigValue::as_str) {
                    self.resolver.resolve_type(identifier)?;
                }
                Ok(())
            }
        }
    }
}
