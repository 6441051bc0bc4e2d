//! Engine configuration, loaded from environment variables.

use std::time::Duration;

use crate::infrastructure::gateway::retry::RetryPolicy;

/// Default HTTP server port.
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default SQLite database path.
const DEFAULT_DB_PATH: &str = "settlement.db";

/// Default Toss API endpoint.
const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.tosspayments.com";

/// Complete engine configuration.
#[derive(Clone)]
pub struct EngineConfig {
    /// Gateway secret key (Basic-auth username).
    pub secret_key: String,
    /// Gateway base URL.
    pub gateway_base_url: String,
    /// Per-attempt gateway timeout.
    pub gateway_timeout: Duration,
    /// Gateway retry policy.
    pub retry: RetryPolicy,
    /// HTTP server port.
    pub http_port: u16,
    /// SQLite database path.
    pub db_path: String,
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `TOSS_SECRET_KEY` is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = std::env::var("TOSS_SECRET_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("TOSS_SECRET_KEY".to_string()))?;
        if secret_key.is_empty() {
            return Err(ConfigError::EmptyValue("TOSS_SECRET_KEY".to_string()));
        }

        let gateway_base_url = std::env::var("TOSS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_BASE_URL.to_string());

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse_env_u32("TOSS_MAX_ATTEMPTS", defaults.max_attempts),
            initial_backoff: parse_env_duration_millis(
                "TOSS_INITIAL_BACKOFF_MS",
                defaults.initial_backoff,
            ),
            max_backoff: parse_env_duration_millis("TOSS_MAX_BACKOFF_MS", defaults.max_backoff),
            multiplier: defaults.multiplier,
        };

        Ok(Self {
            secret_key,
            gateway_base_url,
            gateway_timeout: parse_env_duration_secs(
                "TOSS_TIMEOUT_SECS",
                Duration::from_secs(30),
            ),
            retry,
            http_port: parse_env_u16("HTTP_PORT", DEFAULT_HTTP_PORT),
            db_path: std::env::var("SETTLEMENT_DB_PATH")
                .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
        })
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("secret_key", &"[REDACTED]")
            .field("gateway_base_url", &self.gateway_base_url)
            .field("gateway_timeout", &self.gateway_timeout)
            .field("retry", &self.retry)
            .field("http_port", &self.http_port)
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}
