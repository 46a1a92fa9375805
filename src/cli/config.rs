//! Configuration file
//!
//! A JSON file, `./pokedex.json` by default. Every field is optional; a
//! missing default file means all defaults. `POKEDEX_URI`,
//! `POKEDEX_DATABASE` and `POKEDEX_COLLECTION` override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{CliError, CliResult};
use crate::ops::DEFAULT_SAMPLE_LIMIT;
use crate::schema::{Definition, Strictness};
use crate::store::StoreConfig;

/// Config file read when none is given
pub const DEFAULT_CONFIG_PATH: &str = "./pokedex.json";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store connection string
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding the records
    #[serde(default = "default_collection")]
    pub collection: String,

    /// JSON file with the records to load
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Records printed by `list` when no limit is given
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,

    /// Reject undeclared top-level fields
    #[serde(default)]
    pub strict: bool,

    /// Element types accepted on top of the built-in ones
    #[serde(default)]
    pub extra_elements: Vec<String>,
}

fn default_uri() -> String {
    StoreConfig::default().uri
}
fn default_database() -> String {
    StoreConfig::default().database
}
fn default_collection() -> String {
    StoreConfig::default().collection
}
fn default_data_file() -> PathBuf {
    PathBuf::from("pokemon.json")
}
fn default_sample_limit() -> usize {
    DEFAULT_SAMPLE_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            data_file: default_data_file(),
            sample_limit: default_sample_limit(),
            strict: false,
            extra_elements: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let mut config = Config::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `POKEDEX_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = lookup("POKEDEX_URI") {
            self.uri = uri;
        }
        if let Some(database) = lookup("POKEDEX_DATABASE") {
            self.database = database;
        }
        if let Some(collection) = lookup("POKEDEX_COLLECTION") {
            self.collection = collection;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if !(self.uri.starts_with("mongodb://") || self.uri.starts_with("mongodb+srv://")) {
            return Err(CliError::config_error(format!(
                "Invalid uri: '{}'. Must start with 'mongodb://' or 'mongodb+srv://'.",
                self.uri
            )));
        }

        if self.database.trim().is_empty() {
            return Err(CliError::config_error("database must not be empty"));
        }

        if self.collection.trim().is_empty() {
            return Err(CliError::config_error("collection must not be empty"));
        }

        if self.sample_limit == 0 {
            return Err(CliError::config_error("sample_limit must be > 0"));
        }

        if self.extra_elements.iter().any(|e| e.trim().is_empty()) {
            return Err(CliError::config_error("extra_elements must not contain empty names"));
        }

        Ok(())
    }

    /// Connection settings for the store
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            uri: self.uri.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
        }
    }

    /// Schema parameters: built-in elements plus `extra_elements`
    pub fn definition(&self) -> Definition {
        let strictness = if self.strict {
            Strictness::Strict
        } else {
            Strictness::Permissive
        };
        let mut definition = Definition::default().with_strictness(strictness);
        for element in &self.extra_elements {
            definition.allow_element(element.clone());
        }
        definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(config.database, "pokedex");
        assert_eq!(config.collection, "pokemon");
        assert_eq!(config.sample_limit, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pokedex.json");
        fs::write(&path, r#"{ "collection": "kanto", "strict": true }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.collection, "kanto");
        assert!(config.strict);
        assert_eq!(config.definition().strictness(), Strictness::Strict);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pokedex.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "POKEDEX_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_zero_sample_limit_rejected() {
        let config = Config {
            sample_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_uri_rejected() {
        let config = Config {
            uri: "http://localhost:27017".into(),
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().message().contains("mongodb://"));
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "POKEDEX_URI" => Some("mongodb://db.internal:27017".into()),
            "POKEDEX_COLLECTION" => Some("johto".into()),
            _ => None,
        });
        assert_eq!(config.uri, "mongodb://db.internal:27017");
        assert_eq!(config.collection, "johto");
        assert_eq!(config.database, "pokedex");
    }

    #[test]
    fn test_extra_elements_extend_definition() {
        let config = Config {
            extra_elements: vec!["Electric".into()],
            ..Config::default()
        };
        assert!(config.definition().elements().iter().any(|e| e == "Electric"));
    }
}
