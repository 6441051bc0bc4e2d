//! HTTP client wrapper with retry logic.
//!
//! Transport failures and HTTP 5xx are retried with doubling, capped
//! backoff; any 4xx is returned immediately without retrying. Each attempt
//! is bounded by the configured per-attempt timeout.

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::TossErrorResponse;
use super::config::TossConfig;
use super::error::TossError;
use crate::infrastructure::gateway::retry::{ExponentialBackoff, RetryPolicy, is_retryable_status};

/// HTTP client for the Toss Payments API.
///
/// Authentication is HTTP Basic with the secret key as username and an
/// empty password, which yields the `Basic base64(secret + ":")` header the
/// gateway expects.
#[derive(Debug, Clone)]
pub struct TossHttpClient {
    client: Client,
    secret_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl TossHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &TossConfig) -> Result<Self, TossError> {
        if config.secret_key.is_empty() {
            return Err(TossError::MissingSecretKey);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TossError::Network(e.to_string()))?;

        Ok(Self {
            client,
            secret_key: config.secret_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        })
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TossError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TossError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Internal request implementation with retry logic.
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TossError> {
        let url = format!("{}{}", self.base_url, path);
        let mut backoff = ExponentialBackoff::new(&self.retry);

        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .basic_auth(&self.secret_key, Some(""));
            if let Some(b) = body {
                request = request.json(b);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    // Timeouts and connection errors are eligible for retry.
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt(),
                            "Gateway transport error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(TossError::MaxRetriesExceeded {
                        attempts: backoff.attempt(),
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| TossError::Network(e.to_string()))?;
                if text.is_empty() {
                    return serde_json::from_str("null")
                        .map_err(|e| TossError::JsonParse(e.to_string()));
                }
                return serde_json::from_str(&text)
                    .map_err(|e| TossError::JsonParse(e.to_string()));
            }

            let error_body = response.text().await.unwrap_or_default();
            let (error_code, error_message) =
                match serde_json::from_str::<TossErrorResponse>(&error_body) {
                    Ok(err) => (err.code, err.message),
                    Err(_) => (None, error_body),
                };

            if is_retryable_status(status.as_u16()) {
                if let Some(delay) = backoff.next_backoff() {
                    tracing::warn!(
                        status = status.as_u16(),
                        message = %error_message,
                        delay_ms = delay.as_millis(),
                        attempt = backoff.attempt(),
                        "Gateway server error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(TossError::MaxRetriesExceeded {
                    attempts: backoff.attempt(),
                });
            }

            // 4xx: a client-side error retrying cannot fix.
            return Err(TossError::Api {
                status: status.as_u16(),
                code: error_code,
                message: error_message,
            });
        }
    }
}
