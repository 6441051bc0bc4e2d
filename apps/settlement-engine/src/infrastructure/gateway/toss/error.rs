//! Toss-specific error types.

use thiserror::Error;

use crate::application::ports::GatewayError;

/// Errors from the Toss adapter.
#[derive(Debug, Error, Clone)]
pub enum TossError {
    /// Transport-level failure on a single attempt.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a client error (4xx).
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Processor error code, when present.
        code: Option<String>,
        /// Processor error message.
        message: String,
    },

    /// JSON parsing error on a success response.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Secret key was not configured.
    #[error("Gateway secret key is not configured")]
    MissingSecretKey,
}

impl From<TossError> for GatewayError {
    fn from(err: TossError) -> Self {
        match err {
            TossError::Api {
                status,
                code,
                message,
            } => Self::Rejected {
                status,
                code,
                message,
            },
            TossError::MaxRetriesExceeded { attempts } => Self::RetriesExhausted { attempts },
            TossError::JsonParse(message) | TossError::Network(message) => {
                Self::InvalidResponse { message }
            }
            TossError::MissingSecretKey => Self::InvalidResponse {
                message: "Gateway secret key is not configured".to_string(),
            },
        }
    }
}
