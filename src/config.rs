//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;

/// Default planning service base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default location of the stored token pair.
pub const DEFAULT_CREDENTIALS_PATH: &str = ".coach-credentials.json";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Planning service base URL, without trailing slash
    pub api_base_url: String,
    /// File holding the access/refresh token pair
    pub credentials_path: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("COACH_API_BASE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "COACH_API_BASE",
                value: api_base_url,
            });
        }

        let credentials_path = lookup("COACH_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

        let log_format = match lookup("COACH_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "COACH_LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            credentials_path,
            log_format,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
