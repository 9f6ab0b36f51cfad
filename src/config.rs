//! Configuration management for synthdata
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::api::ModelType;
use crate::error::{Result, SynthError};
use crate::workflow::{MAX_COLUMN_COUNT, MAX_ROW_COUNT, MIN_COLUMN_COUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Where local client state is kept
    #[serde(default)]
    pub storage: StorageConfig,
    /// Form defaults for generation requests
    #[serde(default)]
    pub defaults: GenerationDefaults,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the generation backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Generation can take minutes.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Local client state location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the credential and quota counter.
    /// `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Defaults used when a command or wizard prompt leaves a value unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationDefaults {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_column_count")]
    pub column_count: u32,

    #[serde(default = "default_row_count")]
    pub row_count: u32,
}

fn default_model() -> String {
    "claude".to_string()
}

fn default_column_count() -> u32 {
    5
}

fn default_row_count() -> u32 {
    10
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            model: default_model(),
            column_count: default_column_count(),
            row_count: default_row_count(),
        }
    }
}

impl GenerationDefaults {
    /// The configured default model
    pub fn model_type(&self) -> Result<ModelType> {
        Ok(self.model.parse()?)
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SynthError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SynthError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("SYNTHDATA_BACKEND_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("SYNTHDATA_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.api.timeout_seconds = value,
                Err(_) => {
                    tracing::warn!("Invalid SYNTHDATA_TIMEOUT_SECONDS: {}", timeout);
                }
            }
        }

        if let Ok(store) = std::env::var("SYNTHDATA_STORE") {
            self.storage.path = Some(PathBuf::from(store));
        }

        if let Ok(model) = std::env::var("SYNTHDATA_MODEL") {
            self.defaults.model = model;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.backend_url {
            self.api.base_url = url.clone();
        }
        if let Some(store) = &cli.store {
            self.storage.path = Some(store.clone());
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            SynthError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;

        if self.api.timeout_seconds == 0 {
            return Err(SynthError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !(MIN_COLUMN_COUNT..=MAX_COLUMN_COUNT).contains(&self.defaults.column_count) {
            return Err(SynthError::Config(format!(
                "defaults.column_count must be between {} and {}",
                MIN_COLUMN_COUNT, MAX_COLUMN_COUNT
            ))
            .into());
        }

        if self.defaults.row_count == 0 || self.defaults.row_count > MAX_ROW_COUNT {
            return Err(SynthError::Config(format!(
                "defaults.row_count must be between 1 and {}",
                MAX_ROW_COUNT
            ))
            .into());
        }

        self.defaults
            .model_type()
            .map_err(|e| SynthError::Config(format!("defaults.model: {}", e)))?;

        Ok(())
    }
}
