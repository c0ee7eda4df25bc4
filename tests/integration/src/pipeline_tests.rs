//! End-to-end tests: fixture files on disk -> load -> parse -> instantiate
//!
//! The host registry here stands in for an application registering its own
//! types next to the builtins.

use confgraph_core::{
    Args, ConfigValue, ConstructResult, Diagnostic, Engine, Error, Partial, TypeRegistry, Value,
};
use confgraph_fs::ConfigStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/configs")
        .join(name)
}

#[derive(Debug, Clone, PartialEq)]
struct Optimizer {
    lr: f64,
    steps: Vec<ConfigValue>,
}

#[derive(Debug, Clone)]
struct Trainer {
    name: String,
    epochs: i64,
    optimizer: Option<Optimizer>,
    scheduler: Option<Partial>,
    sweep: Option<ConfigValue>,
    tags: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("trainer argument {0} has the wrong shape")]
struct TrainerError(&'static str);

fn optimizer(args: Args) -> ConstructResult {
    let steps = args
        .positional
        .iter()
        .map(|value| value.to_config().ok_or(TrainerError("*")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::object(Optimizer {
        lr: args.require_f64("lr")?,
        steps,
    }))
}

fn trainer(mut args: Args) -> ConstructResult {
    let optimizer = match args.take_kwarg("optimizer") {
        Some(value) => Some(
            value
                .downcast_ref::<Optimizer>()
                .cloned()
                .ok_or(TrainerError("optimizer"))?,
        ),
        None => None,
    };
    let scheduler = args
        .take_kwarg("scheduler")
        .map(|value| value.as_partial().cloned().ok_or(TrainerError("scheduler")))
        .transpose()?;
    let sweep = args
        .take_kwarg("sweep")
        .map(|value| {
            value
                .as_deferred()
                .map(|map| ConfigValue::Object(map.clone()))
                .ok_or(TrainerError("sweep"))
        })
        .transpose()?;
    let tags = match args.kwarg("tags") {
        Some(value) => value
            .to_config()
            .and_then(|tags| serde_json::from_value(tags).ok())
            .ok_or(TrainerError("tags"))?,
        None => Vec::new(),
    };
    Ok(Value::object(Trainer {
        name: args.require_str("name")?.to_string(),
        epochs: args.require_i64("epochs")?,
        optimizer,
        scheduler,
        sweep,
        tags,
    }))
}

fn engine() -> Engine {
    let mut registry = TypeRegistry::with_builtins();
    registry.register("Optimizer", optimizer);
    registry.register("Trainer", trainer);
    Engine::new(registry)
}

#[test]
fn test_pipeline_builds_from_yaml() {
    let store = ConfigStore::new();
    let config = store.load_value(&fixture("pipeline.yaml")).unwrap();
    let macros = store.load_macros(&fixture("macros.yaml")).unwrap();

    let built = engine().build(&config, &macros).unwrap();
    let trainer = built
        .value
        .get("experiment")
        .and_then(|value| value.downcast_ref::<Trainer>())
        .unwrap();

    assert_eq!(trainer.name, "resnet-sweep");
    assert_eq!(trainer.epochs, 3);
    assert_eq!(
        trainer.optimizer,
        Some(Optimizer {
            lr: 0.1,
            steps: vec![]
        })
    );

    // Both tags read the same provider snapshot
    assert_eq!(trainer.tags.len(), 3);
    assert_eq!(trainer.tags[0], "resnet-sweep");
    assert_eq!(trainer.tags[1].len(), 8);
    assert_eq!(trainer.tags[1], trainer.tags[2]);

    let scheduler = trainer.scheduler.as_ref().unwrap();
    assert_eq!(scheduler.identifier(), "Optimizer");
    let called = scheduler.call().unwrap();
    assert_eq!(called.downcast_ref::<Optimizer>().unwrap().lr, 0.01);

    assert_eq!(
        trainer.sweep,
        Some(json!({
            "type": "Trainer",
            "eval": "none",
            "name": "resnet-sweep",
            "epochs": 10
        }))
    );

    assert_eq!(
        built.diagnostics,
        vec![
            Diagnostic::unused_macro_param("params", "momentum"),
            Diagnostic::unused_macro_param("run", "id"),
        ]
    );
}

#[test]
fn test_deferred_sweep_builds_later() {
    let store = ConfigStore::new();
    let config = store.load_value(&fixture("pipeline.yaml")).unwrap();
    let macros = store.load_macros(&fixture("macros.yaml")).unwrap();
    let engine = engine();

    let built = engine.build(&config, &macros).unwrap();
    let trainer = built
        .value
        .get("experiment")
        .and_then(|value| value.downcast_ref::<Trainer>())
        .unwrap();
    let mut sweep = trainer.sweep.clone().unwrap();
    sweep.as_object_mut().unwrap().remove("eval");

    let later = engine.instantiate(sweep).unwrap();
    let later = later.downcast_ref::<Trainer>().unwrap();
    assert_eq!(later.name, "resnet-sweep");
    assert_eq!(later.epochs, 10);
}

#[test]
fn test_json_and_toml_fixtures_agree() {
    let store = ConfigStore::new();
    let macros = store.load_macros(&fixture("params.toml")).unwrap();
    let engine = engine();

    let from_json = engine
        .parse(&store.load_value(&fixture("training.json")).unwrap(), &macros)
        .unwrap();
    let from_toml = engine
        .parse(&store.load_value(&fixture("training.toml")).unwrap(), &macros)
        .unwrap();

    assert_eq!(from_json.config, from_toml.config);
    assert_eq!(
        from_json.config,
        json!({
            "model": {"type": "Optimizer", "lr": 0.1, "*": [3, "literal"]},
            "inputs": {"params": {"lr": 0.1, "epochs": 3}},
            "notes": "uses $params:lr inline"
        })
    );
    assert!(from_json.diagnostics.is_empty());

    let built = engine.instantiate(from_json.config).unwrap();
    let model = built.get("model").and_then(|v| v.downcast_ref::<Optimizer>());
    assert_eq!(
        model,
        Some(&Optimizer {
            lr: 0.1,
            steps: vec![json!(3), json!("literal")]
        })
    );
}

#[test]
fn test_parsed_tree_saved_and_reloaded() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();
    let macros = store.load_macros(&fixture("params.toml")).unwrap();
    let config = store.load_value(&fixture("training.json")).unwrap();
    let engine = engine();

    let parsed = engine.parse(&config, &macros).unwrap();
    let out = temp.path().join("parsed.yaml");
    store.save(&out, &parsed.config).unwrap();

    let reloaded = store.load_value(&out).unwrap();
    assert_eq!(reloaded, parsed.config);

    // A parsed tree has no references left, so parsing again is a no-op
    let reparsed = engine.parse(&reloaded, &macros).unwrap();
    assert_eq!(reparsed.config, reloaded);
}

#[test]
fn test_missing_fixture_macro() {
    let store = ConfigStore::new();
    let config = store.load_value(&fixture("pipeline.yaml")).unwrap();
    let macros = store.load_macros(&fixture("params.toml")).unwrap();

    let err = engine().parse(&config, &macros).unwrap_err();
    assert!(matches!(err, Error::MacroResolution { .. }));
}

#[test]
fn test_trainer_error_passes_through() {
    let config = json!({"type": "Trainer", "name": "x", "epochs": 1, "optimizer": 5});
    let err = engine().instantiate(config).unwrap_err();
    assert_eq!(err.to_string(), "trainer argument optimizer has the wrong shape");
    assert!(err.construction_source::<TrainerError>().is_some());
}
