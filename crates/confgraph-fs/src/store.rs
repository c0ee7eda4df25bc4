//! Format-agnostic loading and saving of config trees

use std::path::Path;

use confgraph_core::{ConfigMap, ConfigValue};
use serde::{Serialize, de::DeserializeOwned};

use crate::format::Format;
use crate::{Error, Result, io};

/// Format-agnostic configuration store.
///
/// Detects format from file extension and handles
/// serialization/deserialization transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize a file.
    ///
    /// Format is detected from file extension:
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = Format::from_path(path)?;
        let content = io::read_text(path)?;
        tracing::debug!(path = %path.display(), %format, "loading config");
        self.parse_str(&content, format, path)
    }

    /// Load any config tree.
    pub fn load_value(&self, path: &Path) -> Result<ConfigValue> {
        self.load(path)
    }

    /// Load a macro table; the root must be a mapping.
    pub fn load_macros(&self, path: &Path) -> Result<ConfigMap> {
        match self.load_value(path)? {
            ConfigValue::Object(map) => Ok(map),
            _ => Err(Error::InvalidRoot {
                path: path.to_path_buf(),
                expected: "mapping".into(),
            }),
        }
    }

    /// Deserialize text in a known format; `path` only labels errors.
    pub fn parse_str<T: DeserializeOwned>(
        &self,
        content: &str,
        format: Format,
        path: &Path,
    ) -> Result<T> {
        let parsed = match format {
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        })
    }

    /// Serialize a value in a known format.
    pub fn to_string<T: Serialize>(&self, value: &T, format: Format, path: &Path) -> Result<String> {
        let rendered = match format {
            Format::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
            Format::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| Error::ConfigSerialize {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        })
    }

    /// Save a value to a file.
    ///
    /// Format is determined from file extension.
    /// Uses atomic write to prevent corruption.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let format = Format::from_path(path)?;
        let content = self.to_string(value, format, path)?;
        io::write_atomic(path, content.as_bytes())
    }
}
