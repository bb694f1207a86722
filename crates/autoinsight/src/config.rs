//! Configuration management for autoinsight.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::default_registration_patterns;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "autoinsight";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "journeys.db";

/// Default vault key file name.
const VAULT_KEY_FILE_NAME: &str = "vault.key";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `AUTOINSIGHT_`)
/// 2. TOML config file at `~/.config/autoinsight/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Ingest configuration.
    pub ingest: IngestConfig,
    /// Vault configuration.
    pub vault: VaultConfig,
    /// Profile configuration.
    pub profile: ProfileConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/autoinsight/journeys.db`
    pub database_path: Option<PathBuf>,
    /// Maximum number of journeys to retain.
    /// Set to 0 for unlimited.
    pub max_journeys: usize,
    /// Maximum age of journeys to retain in days.
    /// Set to 0 for unlimited.
    pub max_age_days: u32,
}

/// Ingest-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Default sample file scored when the CLI gets no explicit path.
    pub default_source: Option<PathBuf>,
}

/// Vault-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Path to the vault key file.
    /// Defaults to `~/.local/share/autoinsight/vault.key`
    pub key_path: Option<PathBuf>,
}

/// Profile-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Accepted vehicle registration formats (regex).
    /// An empty list disables the format check.
    pub registration_patterns: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            max_journeys: 10_000,
            max_age_days: 365,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            registration_patterns: default_registration_patterns(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `AUTOINSIGHT_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("AUTOINSIGHT_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        // Validate registration patterns
        for pattern in &self.profile.registration_patterns {
            if regex::Regex::new(pattern).is_err() {
                return Err(Error::ConfigValidation {
                    message: format!("invalid registration pattern: {pattern}"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the vault key path, resolving defaults if not set.
    #[must_use]
    pub fn vault_key_path(&self) -> PathBuf {
        self.vault
            .key_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(VAULT_KEY_FILE_NAME))
    }

    /// Get the journey retention age, `None` when unlimited.
    #[must_use]
    pub fn max_age(&self) -> Option<chrono::Duration> {
        if self.storage.max_age_days == 0 {
            None
        } else {
            Some(chrono::Duration::days(i64::from(self.storage.max_age_days)))
        }
    }
}
