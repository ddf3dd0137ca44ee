//! Runtime configuration for the synthesiser server.
//!
//! Values come from defaults, then environment variables, then CLI flags
//! (applied by the `serve` command).

use std::time::Duration;
use thiserror::Error;

use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::prompts::SYSTEM_ROLE;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the synthesiser server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server settings
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,

    // LLM settings
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Bearer token for the API.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// System role sent with every request.
    pub system_role: String,
    /// HTTP timeout for one completion call.
    pub request_timeout: Duration,

    // Session settings
    /// Idle time after which a session is discarded.
    pub session_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,

            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_role: SYSTEM_ROLE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),

            session_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl AppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY`: API key for the completion service
    /// - `BRAND_SYNTH_API_BASE`: API base URL (default: https://api.openai.com/v1)
    /// - `BRAND_SYNTH_MODEL`: Model identifier (default: gpt-4o)
    /// - `BRAND_SYNTH_SYSTEM_ROLE`: System role text
    /// - `BRAND_SYNTH_HOST`: Bind host (default: 127.0.0.1)
    /// - `BRAND_SYNTH_PORT`: Bind port (default: 8501)
    /// - `BRAND_SYNTH_TIMEOUT_SECS`: Completion timeout in seconds (default: 120)
    /// - `BRAND_SYNTH_SESSION_TTL_SECS`: Session idle TTL in seconds (default: 3600)
    ///
    /// The API key is not required here; [`AppConfig::require_api_key`]
    /// checks it once CLI overrides have been applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("OPENAI_API_KEY") {
            if !val.trim().is_empty() {
                config.api_key = Some(val);
            }
        }

        if let Some(val) = lookup("BRAND_SYNTH_API_BASE") {
            config.api_base = val;
        }

        if let Some(val) = lookup("BRAND_SYNTH_MODEL") {
            config.model = val;
        }

        if let Some(val) = lookup("BRAND_SYNTH_SYSTEM_ROLE") {
            config.system_role = val;
        }

        if let Some(val) = lookup("BRAND_SYNTH_HOST") {
            config.host = val;
        }

        if let Some(val) = lookup("BRAND_SYNTH_PORT") {
            config.port = parse_env_value(&val, "BRAND_SYNTH_PORT")?;
        }

        if let Some(val) = lookup("BRAND_SYNTH_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "BRAND_SYNTH_TIMEOUT_SECS")?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(val) = lookup("BRAND_SYNTH_SESSION_TTL_SECS") {
            let secs: u64 = parse_env_value(&val, "BRAND_SYNTH_SESSION_TTL_SECS")?;
            config.session_ttl = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "host cannot be empty".to_string(),
            ));
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::ValidationFailed(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(ConfigError::ValidationFailed(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.session_ttl.as_secs() == 0 {
            return Err(ConfigError::ValidationFailed(
                "session_ttl must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Fail unless an API key is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }

    /// Socket address string, e.g. `127.0.0.1:8501`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an environment variable value into the target type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}
