//! Configuration file support for wkt.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wkt/config.toml`.

use crate::{Error, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub units: UnitsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn store_path(&self) -> PathBuf {
        store_path(&self.data_dir)
    }
}

/// Unit defaults for user input
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UnitsConfig {
    /// Unit assumed for weights given without a suffix
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

/// Path of the aggregate store inside a data directory
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("store.json")
}

/// Path of the finished-session journal inside a data directory
pub fn journal_path(data_dir: &Path) -> PathBuf {
    data_dir.join("journal").join("sessions.jsonl")
}

/// Path of the CSV rollup inside a data directory
pub fn csv_path(data_dir: &Path) -> PathBuf {
    data_dir.join("sessions.csv")
}

fn home_fallback(suffix: &str) -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(suffix))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| home_fallback(".local/share"))
        .join("wkt")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_fallback(".config"))
            .join("wkt")
            .join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.units.weight_unit, WeightUnit::Kilograms);
        assert!(config.data.data_dir.ends_with("wkt"));
        assert!(config.data.store_path().ends_with("wkt/store.json"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.units.weight_unit = WeightUnit::Pounds;
        config.data.data_dir = temp_dir.path().join("data");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.units.weight_unit, WeightUnit::Pounds);
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[units]
weight_unit = "lb"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.units.weight_unit, WeightUnit::Pounds);
        assert!(config.data.data_dir.ends_with("wkt")); // default
    }

    #[test]
    fn test_unit_alias_and_bad_unit() {
        let config: Config = toml::from_str("[units]\nweight_unit = \"kilograms\"\n").unwrap();
        assert_eq!(config.units.weight_unit, WeightUnit::Kilograms);

        assert!(toml::from_str::<Config>("[units]\nweight_unit = \"stone\"\n").is_err());
    }

    #[test]
    fn test_data_paths() {
        let dir = Path::new("/tmp/wkt-data");
        assert_eq!(store_path(dir), dir.join("store.json"));
        assert_eq!(journal_path(dir), dir.join("journal/sessions.jsonl"));
        assert_eq!(csv_path(dir), dir.join("sessions.csv"));
    }
}
