//! Configuration management for newsletter research.
//!
//! Configuration can be set via environment variables:
//! - `EXA_API_KEY` - Required. API key for the Exa search provider.
//! - `EXA_BASE_URL` - Optional. Provider base URL. Defaults to `https://api.exa.ai`.
//! - `EXA_TIMEOUT_SECS` - Optional. Per-request timeout. Defaults to `30`.
//! - `RESEARCH_PACING_MS` - Optional. Pause after each successful call. Defaults to `1000`.
//! - `RESEARCH_LOG_DIR` - Optional. Where research briefs are written. Defaults to `logs`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::research::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Research client configuration.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Exa API key
    pub api_key: String,

    /// Provider base URL, without trailing slash
    pub base_url: String,

    /// Per-request network timeout
    pub timeout: Duration,

    /// Fixed pause after every successful call
    pub pacing_delay: Duration,

    /// Retry policy applied around each provider call
    pub retry: RetryPolicy,

    /// Directory for research brief logs
    pub log_dir: PathBuf,
}

impl ResearchConfig {
    /// Create a config with default settings for the given key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("EXA_API_KEY".to_string()));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            pacing_delay: Duration::from_secs(1),
            retry: RetryPolicy::default(),
            log_dir: PathBuf::from("logs"),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `EXA_API_KEY` is not set, and
    /// `ConfigError::InvalidValue` if a numeric variable does not parse, the
    /// timeout is zero, or the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key =
            lookup("EXA_API_KEY").ok_or_else(|| ConfigError::MissingEnvVar("EXA_API_KEY".to_string()))?;
        let mut config = Self::new(api_key)?;

        if let Some(raw) = lookup("EXA_BASE_URL") {
            config.base_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup("EXA_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|e| ConfigError::InvalidValue("EXA_TIMEOUT_SECS".to_string(), format!("{}", e)))?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue(
                    "EXA_TIMEOUT_SECS".to_string(),
                    "timeout must be at least 1 second".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("RESEARCH_PACING_MS") {
            let millis: u64 = raw
                .parse()
                .map_err(|e| ConfigError::InvalidValue("RESEARCH_PACING_MS".to_string(), format!("{}", e)))?;
            config.pacing_delay = Duration::from_millis(millis);
        }

        if let Some(dir) = lookup("RESEARCH_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

/// Validate an http(s) base URL and strip any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidValue("EXA_BASE_URL".to_string(), msg);

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("must not be empty".to_string()));
    }
    let parsed = url::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
