//! Builtin constructors and macro providers
//!
//! Registered by [`TypeRegistry::with_builtins`](crate::TypeRegistry::with_builtins):
//!
//! | identifier | result |
//! |------------|--------|
//! | `dict`     | keyword args as a mapping |
//! | `list`     | positional args as a sequence |
//! | `env`      | [`EnvSnapshot`] provider, optional `prefix` filter |
//! | `clock`    | [`Clock`] provider, optional `format` |
//! | `run`      | [`RunInfo`] provider with a fresh run id |

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::ConfigValue;
use crate::args::Args;
use crate::error::ArgError;
use crate::registry::{ConstructResult, TypeRegistry};
use crate::value::{Object, ParamSource, Value};

pub fn register_builtins(registry: &mut TypeRegistry) {
    registry.register("dict", dict);
    registry.register("list", list);
    registry.register("env", env);
    registry.register("clock", clock);
    registry.register("run", run);
}

fn dict(args: Args) -> ConstructResult {
    if !args.positional.is_empty() {
        return Err(ArgError::UnexpectedPositional {
            count: args.positional.len(),
        }
        .into());
    }
    Ok(Value::Map(args.keyword))
}

fn list(args: Args) -> ConstructResult {
    Ok(Value::List(args.positional))
}

fn env(args: Args) -> ConstructResult {
    let snapshot = EnvSnapshot::capture(args.str_kwarg("prefix")?);
    Ok(Value::Object(Object::with_params(snapshot)))
}

fn clock(args: Args) -> ConstructResult {
    let clock = Clock::new(Local::now(), args.str_kwarg("format")?.map(str::to_string))?;
    Ok(Value::Object(Object::with_params(clock)))
}

fn run(_args: Args) -> ConstructResult {
    Ok(Value::Object(Object::with_params(RunInfo::new())))
}

/// Environment variables captured at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the process environment, keeping names starting with `prefix`.
    pub fn capture(prefix: Option<&str>) -> Self {
        Self::from_vars(std::env::vars(), prefix)
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>, prefix: Option<&str>) -> Self {
        let vars = vars
            .into_iter()
            .filter(|(name, _)| prefix.is_none_or(|prefix| name.starts_with(prefix)))
            .collect();
        Self { vars }
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl ParamSource for EnvSnapshot {
    fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.vars.get(key).cloned().map(ConfigValue::String)
    }
}

/// Local time read once at construction.
///
/// Parameters: `date` (`%Y-%m-%d`), `time` (`%H-%M-%S`), `timestamp`
/// (RFC 3339), `unix` (seconds), and `formatted` when a format was given.
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    now: DateTime<Local>,
    format: Option<String>,
}

impl Clock {
    pub fn new(now: DateTime<Local>, format: Option<String>) -> Result<Self, ArgError> {
        if let Some(format) = &format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(ArgError::invalid("format", format!("bad strftime pattern {format:?}")));
            }
        }
        Ok(Self { now, format })
    }

    pub fn now(&self) -> DateTime<Local> {
        self.now
    }

    fn render(&self, pattern: &str) -> Option<String> {
        let mut out = String::new();
        write!(out, "{}", self.now.format(pattern)).ok()?;
        Some(out)
    }
}

impl ParamSource for Clock {
    fn keys(&self) -> Vec<String> {
        let mut keys = vec![
            "date".to_string(),
            "time".to_string(),
            "timestamp".to_string(),
            "unix".to_string(),
        ];
        if self.format.is_some() {
            keys.push("formatted".to_string());
        }
        keys
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        match key {
            "date" => self.render("%Y-%m-%d").map(ConfigValue::String),
            "time" => self.render("%H-%M-%S").map(ConfigValue::String),
            "timestamp" => Some(ConfigValue::String(self.now.to_rfc3339())),
            "unix" => Some(ConfigValue::from(self.now.timestamp())),
            "formatted" => self
                .format
                .as_deref()
                .and_then(|pattern| self.render(pattern))
                .map(ConfigValue::String),
            _ => None,
        }
    }
}

/// Identity of one run, for provenance tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInfo {
    id: Uuid,
}

impl RunInfo {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// First eight hex digits of the id.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string().chars().take(8).collect()
    }
}

impl Default for RunInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSource for RunInfo {
    fn keys(&self) -> Vec<String> {
        vec!["id".to_string(), "short_id".to_string()]
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        match key {
            "id" => Some(ConfigValue::String(self.id.to_string())),
            "short_id" => Some(ConfigValue::String(self.short_id())),
            _ => None,
        }
    }
}
