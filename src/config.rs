//! Configuration loading and management for studia.
//!
//! Loads settings from `studia.toml` with environment variable overrides for
//! sensitive data. A missing config file falls back to defaults, so the CLI
//! works out of the box with keys supplied through the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key: {0}")]
    MissingApiKey(String),
}

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model identifier (e.g., "gemini-2.0-flash")
    pub model: String,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
    #[serde(default)]
    pub youtube_key: Option<String>,
}

/// Local storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base path for the local history database
    pub path: PathBuf,
}

/// Remote record-store configuration for best-effort result persistence.
///
/// With no endpoint configured the persistence step is skipped entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Base URL of the record store (e.g. a Supabase project URL)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Table receiving one row per processed result
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Optional identity to associate with stored records
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_table() -> String {
    "processing_results".to_string()
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Load configuration from the default location (studia.toml in cwd or
    /// home), falling back to defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            None => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("studia.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config").join("studia").join("studia.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }

    /// Override sensitive values from environment variables
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api.gemini_key = Some(key);
        }
        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            self.api.youtube_key = Some(key);
        }
        if let Ok(key) = std::env::var("STUDIA_STORE_KEY") {
            self.persistence.api_key = Some(key);
        }
    }

    /// Get the Gemini API key, required for every summarisation action
    pub fn gemini_key(&self) -> Result<&str, ConfigError> {
        self.api
            .gemini_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string()))
    }

    /// Get the YouTube Data API key, required for video summarisation
    pub fn youtube_key(&self) -> Result<&str, ConfigError> {
        self.api
            .youtube_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey("youtube".to_string()))
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data"),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            table: default_table(),
            api_key: None,
            user_id: None,
        }
    }
}
