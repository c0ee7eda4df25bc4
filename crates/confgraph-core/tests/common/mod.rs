//! Shared host types for confgraph-core integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use confgraph_core::{
    Args, ConfigMap, ConfigValue, ConstructResult, Object, ParamSource, TypeRegistry, Value,
};

/// A constructed model: keeps positional args as literals.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub positional: Vec<ConfigValue>,
    pub learning_rate: Option<f64>,
}

/// A job holding whatever was passed as `model_config`.
#[derive(Debug, Clone)]
pub struct Job {
    pub model_config: Value,
}

/// Provider whose value changes on every construction.
#[derive(Debug)]
pub struct Ticker {
    pub tick: usize,
}

impl ParamSource for Ticker {
    fn keys(&self) -> Vec<String> {
        vec!["tick".to_string()]
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        (key == "tick").then(|| ConfigValue::from(self.tick))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("model exploded: {0}")]
pub struct ModelError(pub String);

fn model(args: Args) -> ConstructResult {
    let positional = args
        .positional
        .iter()
        .map(|value| {
            value
                .to_config()
                .ok_or_else(|| ModelError("positional args must be literals".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::object(Model {
        positional,
        learning_rate: args.f64_kwarg("learning_rate")?,
    }))
}

fn job(mut args: Args) -> ConstructResult {
    let model_config = args
        .take_kwarg("model_config")
        .ok_or_else(|| ModelError("job needs a model_config".into()))?;
    Ok(Value::object(Job { model_config }))
}

fn failing(args: Args) -> ConstructResult {
    let reason = args.str_kwarg("reason")?.unwrap_or("no reason");
    Err(ModelError(reason.to_string()).into())
}

/// Registry with builtins plus the test types, and the ticker's counter.
pub struct TestHost {
    pub registry: TypeRegistry,
    pub ticks: Arc<AtomicUsize>,
}

impl TestHost {
    pub fn new() -> Self {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut registry = TypeRegistry::with_builtins();
        registry.register("Model", model);
        registry.register("Job", job);
        registry.register("Failing", failing);

        let counter = ticks.clone();
        registry.register("Ticker", move |_| {
            let tick = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Value::Object(Object::with_params(Ticker { tick })))
        });

        Self { registry, ticks }
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }
}

/// Unwrap a JSON object literal into a macro table.
pub fn table(value: ConfigValue) -> ConfigMap {
    match value {
        ConfigValue::Object(map) => map,
        other => panic!("expected a mapping, got {other}"),
    }
}
