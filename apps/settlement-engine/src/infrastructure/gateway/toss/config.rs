//! Toss adapter configuration.

use std::time::Duration;

use crate::infrastructure::gateway::retry::RetryPolicy;

/// Production API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.tosspayments.com";

/// Configuration for the Toss gateway adapter.
#[derive(Clone)]
pub struct TossConfig {
    /// Server-held secret key; becomes the Basic-auth username.
    pub secret_key: String,
    /// API base URL (overridable for tests).
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
    /// Retry policy applied to every gateway operation.
    pub retry: RetryPolicy,
}

impl TossConfig {
    /// Create a new configuration against the production endpoint.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-attempt HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl std::fmt::Debug for TossConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TossConfig")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
