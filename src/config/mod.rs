//! Configuration management for Estuary.
//!
//! Configuration is read from `~/.config/estuary/config.toml` unless a path is
//! given explicitly. If the default file doesn't exist, a commented default
//! is created. Every value is handed to the components that need it; nothing
//! reads configuration from global state.

pub mod generator;
pub mod update;

pub use generator::{GeneratorConfig, SiteConfig};
pub use update::{UpdateConfig, DEFAULT_WORKERS};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::EstuaryError;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database path (default: `<data dir>/estuary/estuary.db`)
    pub database: Option<PathBuf>,
    pub site: SiteConfig,
    pub generator: GeneratorConfig,
    pub update: UpdateConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// An explicit path must exist. A missing default file is created with
    /// comments and defaults are returned. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the generator and updater cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.posts_per_page == 0 {
            return Err(ConfigError::Invalid(
                "generator.posts_per_page must be at least 1".into(),
            ));
        }
        if self.generator.feed_window == 0 {
            return Err(ConfigError::Invalid(
                "generator.feed_window must be at least 1".into(),
            ));
        }
        if self.update.workers == 0 {
            return Err(ConfigError::Invalid("update.workers must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config file path: `~/.config/estuary/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("estuary").join("config.toml"))
    }

    /// Database path from the config, or `<data dir>/estuary/estuary.db`.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.database {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        let estuary_dir = data_dir.join("estuary");
        fs::create_dir_all(&estuary_dir).map_err(|e| ConfigError::Io {
            path: estuary_dir.clone(),
            source: e,
        })?;
        Ok(estuary_dir.join("estuary.db"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_config_content() -> &'static str {
        r##"# Estuary Configuration

# SQLite database (default: platform data directory)
# database = "/var/lib/estuary/estuary.db"

[site]
title = "Estuary"
url = "http://localhost/"
description = "An aggregator of various blogs."
# analytics_id = "UA-000000-1"

[generator]
# Posts per HTML page
posts_per_page = 10

# Posts included in rss.xml
feed_window = 10

# Static assets are copied from <share_dir>/<assets_dir>/<asset_dirs...>
share_dir = "."
assets_dir = "www"
asset_dirs = ["js", "css", "img", "fonts"]

[update]
# Feeds fetched concurrently; 1 updates feeds one at a time
workers = 4

# HTTP timeout in seconds
timeout_secs = 10
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for EstuaryError {
    fn from(err: ConfigError) -> Self {
        EstuaryError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.generator.posts_per_page, 10);
        assert_eq!(config.generator.asset_dirs, vec!["js", "css", "img", "fonts"]);
        assert_eq!(config.update.workers, DEFAULT_WORKERS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
database = "/tmp/planet.db"

[generator]
posts_per_page = 25
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.database, Some(PathBuf::from("/tmp/planet.db")));
        assert_eq!(config.generator.posts_per_page, 25);
        assert_eq!(config.generator.feed_window, 10);
        assert_eq!(config.site.title, "Estuary");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.database, None);
        assert_eq!(config.update.timeout_secs, 10);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut config = Config::default();
        config.generator.posts_per_page = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[site]\ntitle = \"Planet Rust\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.site.title, "Planet Rust");

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
