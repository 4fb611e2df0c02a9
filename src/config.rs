//! Configuration management for Scoremate
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Credentials are deliberately absent: the API key is resolved at runtime
//! from the environment or the OS keyring (see [`crate::credentials`]).

use crate::error::{Result, ScoremateError};
use crate::providers::SamplingParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for Scoremate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chat completion service settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Request shaping settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Customer dataset settings
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// Chat completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider flavour; both speak the OpenAI chat completions protocol
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Optional API base URL (useful for tests and self-hosted gateways)
    ///
    /// When unset, the well-known base for `provider_type` is used.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

/// Provider types understood by [`crate::providers::create_provider`]
pub const VALID_PROVIDERS: [&str; 2] = ["groq", "openai"];

fn default_provider_type() -> String {
    "groq".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_api_key_env() -> String {
    "SCOREMATE_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            api_base: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Base URL requests are sent to
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::config::ProviderConfig;
    ///
    /// let config = ProviderConfig::default();
    /// assert_eq!(config.base_url(), "https://api.groq.com/openai/v1");
    /// ```
    pub fn base_url(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => match self.provider_type.as_str() {
                "openai" => "https://api.openai.com/v1".to_string(),
                _ => "https://api.groq.com/openai/v1".to_string(),
            },
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Request shaping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Nucleus-sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Number of most recent turns sent with each request
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_top_p() -> f32 {
    1.0
}

fn default_history_window() -> usize {
    10
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            history_window: default_history_window(),
        }
    }
}

impl ChatConfig {
    /// Sampling settings for outbound requests
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
        }
    }
}

/// Customer dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// File path or http(s) URL of the dataset
    #[serde(default = "default_dataset_source")]
    pub source: String,

    /// Timeout for HTTP dataset sources (seconds)
    #[serde(default = "default_dataset_timeout")]
    pub timeout_seconds: u64,
}

fn default_dataset_source() -> String {
    "data/credit_score.csv".to_string()
}

fn default_dataset_timeout() -> u64 {
    30
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: default_dataset_source(),
            timeout_seconds: default_dataset_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file; when `None`, the local
    ///   `config/config.yaml` is tried, then the user config directory
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be read or parsed
    pub fn load(path: Option<&str>, cli: &crate::cli::Cli) -> Result<Self> {
        let resolved = match path {
            Some(p) => Some(PathBuf::from(p)),
            None => Self::default_locations().into_iter().find(|p| p.exists()),
        };

        let mut config = match resolved {
            Some(p) if p.exists() => Self::from_file(&p)?,
            Some(p) => {
                tracing::warn!("Config file not found at {}, using defaults", p.display());
                Self::default()
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Candidate config locations, in lookup order
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from("config/config.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "scoremate") {
            locations.push(dirs.config_dir().join("config.yaml"));
        }
        locations
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScoremateError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ScoremateError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("SCOREMATE_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(api_base) = std::env::var("SCOREMATE_API_BASE") {
            self.provider.api_base = Some(api_base);
        }

        if let Ok(model) = std::env::var("SCOREMATE_MODEL") {
            self.provider.model = model;
        }

        if let Ok(timeout) = std::env::var("SCOREMATE_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.provider.timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid SCOREMATE_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(temperature) = std::env::var("SCOREMATE_TEMPERATURE") {
            match temperature.parse() {
                Ok(value) => self.chat.temperature = value,
                Err(_) => tracing::warn!("Invalid SCOREMATE_TEMPERATURE: {}", temperature),
            }
        }

        if let Ok(max_tokens) = std::env::var("SCOREMATE_MAX_TOKENS") {
            match max_tokens.parse() {
                Ok(value) => self.chat.max_tokens = value,
                Err(_) => tracing::warn!("Invalid SCOREMATE_MAX_TOKENS: {}", max_tokens),
            }
        }

        if let Ok(window) = std::env::var("SCOREMATE_HISTORY_WINDOW") {
            match window.parse() {
                Ok(value) => self.chat.history_window = value,
                Err(_) => tracing::warn!("Invalid SCOREMATE_HISTORY_WINDOW: {}", window),
            }
        }

        if let Ok(source) = std::env::var("SCOREMATE_DATASET") {
            tracing::debug!(source = %source, "Env override: SCOREMATE_DATASET");
            self.dataset.source = source;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(dataset) = &cli.dataset {
            self.dataset.source = dataset.clone();
        }
        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range or a required field is empty
    pub fn validate(&self) -> Result<()> {
        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(ScoremateError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if let Some(base) = &self.provider.api_base {
            url::Url::parse(base).map_err(|e| {
                ScoremateError::Config(format!("Invalid provider.api_base '{}': {}", base, e))
            })?;
        }

        if self.provider.model.trim().is_empty() {
            return Err(ScoremateError::Config("provider.model cannot be empty".to_string()).into());
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(
                ScoremateError::Config("provider.api_key_env cannot be empty".to_string()).into(),
            );
        }

        if self.provider.timeout_seconds == 0 {
            return Err(ScoremateError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ScoremateError::Config(
                "chat.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.chat.top_p <= 0.0 || self.chat.top_p > 1.0 {
            return Err(
                ScoremateError::Config("chat.top_p must be in (0.0, 1.0]".to_string()).into(),
            );
        }

        if self.chat.max_tokens == 0 {
            return Err(ScoremateError::Config(
                "chat.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.history_window == 0 {
            return Err(ScoremateError::Config(
                "chat.history_window must be greater than 0".to_string(),
            )
            .into());
        }

        if self.dataset.source.trim().is_empty() {
            return Err(ScoremateError::Config("dataset.source cannot be empty".to_string()).into());
        }

        if self.dataset.timeout_seconds == 0 {
            return Err(ScoremateError::Config(
                "dataset.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            chat: ChatConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_file, temp_dir};
    use serial_test::serial;

    const ENV_VARS: [&str; 9] = [
        "SCOREMATE_PROVIDER",
        "SCOREMATE_API_BASE",
        "SCOREMATE_MODEL",
        "SCOREMATE_TIMEOUT_SECONDS",
        "SCOREMATE_TEMPERATURE",
        "SCOREMATE_MAX_TOKENS",
        "SCOREMATE_HISTORY_WINDOW",
        "SCOREMATE_DATASET",
        "SCOREMATE_API_KEY",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "groq");
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
        assert_eq!(config.chat.history_window, 10);
        assert_eq!(config.chat.max_tokens, 1024);
        assert_eq!(config.dataset.source, "data/credit_score.csv");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_provider_rejected() {
        let mut config = Config::default();
        config.provider.provider_type = "mistral".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut config = Config::default();
        config.chat.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chat.top_p = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chat.history_window = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.provider.api_base = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_defaults_and_override() {
        let mut provider = ProviderConfig::default();
        assert_eq!(provider.base_url(), "https://api.groq.com/openai/v1");
        provider.provider_type = "openai".to_string();
        assert_eq!(provider.base_url(), "https://api.openai.com/v1");
        provider.api_base = Some("http://127.0.0.1:9000/v1/".to_string());
        assert_eq!(provider.base_url(), "http://127.0.0.1:9000/v1");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let dir = temp_dir();
        let path = create_test_file(
            &dir,
            "config.yaml",
            "provider:\n  model: llama-3.3-70b-versatile\nchat:\n  history_window: 4\n",
        );
        let config = Config::load(path.to_str(), &crate::cli::Cli::default()).unwrap();
        assert_eq!(config.provider.model, "llama-3.3-70b-versatile");
        assert_eq!(config.chat.history_window, 4);
        assert_eq!(config.chat.max_tokens, 1024);
    }

    #[test]
    #[serial]
    fn test_api_key_in_file_is_rejected() {
        clear_env();
        let dir = temp_dir();
        let path = create_test_file(&dir, "config.yaml", "provider:\n  api_key: gsk_secret\n");
        assert!(Config::load(path.to_str(), &crate::cli::Cli::default()).is_err());
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        clear_env();
        let dir = temp_dir();
        let path = dir.path().join("absent.yaml");
        let config = Config::load(path.to_str(), &crate::cli::Cli::default()).unwrap();
        assert_eq!(config.provider.provider_type, "groq");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("SCOREMATE_MODEL", "mixtral-8x7b-32768");
        std::env::set_var("SCOREMATE_HISTORY_WINDOW", "6");
        std::env::set_var("SCOREMATE_MAX_TOKENS", "not-a-number");
        std::env::set_var("SCOREMATE_DATASET", "https://example.com/data.csv");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(config.provider.model, "mixtral-8x7b-32768");
        assert_eq!(config.chat.history_window, 6);
        assert_eq!(config.chat.max_tokens, 1024);
        assert_eq!(config.dataset.source, "https://example.com/data.csv");
    }

    #[test]
    #[serial]
    fn test_cli_overrides_win_over_env() {
        clear_env();
        std::env::set_var("SCOREMATE_DATASET", "env.csv");
        let cli = crate::cli::Cli {
            dataset: Some("cli.csv".to_string()),
            ..crate::cli::Cli::default()
        };
        let mut config = Config::default();
        config.apply_env_vars();
        config.apply_cli_overrides(&cli);
        clear_env();

        assert_eq!(config.dataset.source, "cli.csv");
    }
}
