//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::analysis::client::{
    GeminiConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_API_KEY_ENV, DEFAULT_NUTRITION_MODEL,
    GEMINI_API_BASE,
};
use crate::storage::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where collections live on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Start a missing collection with the starter entries instead of empty
    #[serde(default = "default_seed_on_empty")]
    pub seed_on_empty: bool,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("growth-tracker").to_string_lossy().to_string())
        .unwrap_or_else(|| "./growth_data".to_string())
}

fn default_seed_on_empty() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed_on_empty: default_seed_on_empty(),
        }
    }
}

impl StorageConfig {
    /// `data_dir` with a leading `~/` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            seed_on_empty: self.seed_on_empty,
        }
    }
}

/// Analysis service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the environment variable holding the API key (never the key itself)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_nutrition_model")]
    pub nutrition_model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_model() -> String {
    DEFAULT_ANALYSIS_MODEL.to_string()
}

fn default_nutrition_model() -> String {
    DEFAULT_NUTRITION_MODEL.to_string()
}

fn default_base_url() -> String {
    GEMINI_API_BASE.to_string()
}

fn default_request_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_max_retries() -> u32 {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            nutrition_model: default_nutrition_model(),
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl AnalysisConfig {
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key_env: self.api_key_env.clone(),
            model: self.model.clone(),
            nutrition_model: self.nutrition_model.clone(),
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
            max_retries: self.max_retries,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("growth-tracker").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = var("GROWTH_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(model) = var("GROWTH_MODEL") {
            self.analysis.model = model;
        }
        if let Some(key_env) = var("GROWTH_API_KEY_ENV") {
            self.analysis.api_key_env = key_env;
        }

        if let Some(level) = var("GROWTH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("GROWTH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Growth Tracker Configuration
#
# Environment variables override these settings:
# - GROWTH_DATA_DIR
# - GROWTH_MODEL
# - GROWTH_API_KEY_ENV
# - GROWTH_LOG_LEVEL
# - GROWTH_LOG_FORMAT

[storage]
# Directory holding fitTrackLogs.json, mindTrackerData.json and moneyTrackerData.json
data_dir = "~/.local/share/growth-tracker"

# Start with a few example entries when a collection has never been saved
seed_on_empty = true

[analysis]
# Environment variable that holds the Gemini API key
api_key_env = "GEMINI_API_KEY"

# Model for weekly analysis and free-text log parsing
model = "gemini-2.5-flash"

# Model for nutrition lookups
nutrition_model = "gemini-3-pro-preview"

# API base URL
base_url = "https://generativelanguage.googleapis.com/v1beta"

# Request timeout in milliseconds
request_timeout_ms = 30000

# Attempts per request (429 and 5xx are retried)
max_retries = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
