use serde::{Deserialize, Serialize};

/// Errors returned by the 2hire API client
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Transport-level failure (connection refused, DNS, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Authentication rejected by the platform
    #[error("Authentication failed with 2hire API (HTTP {status}): {body}")]
    AuthenticationFailed {
        /// HTTP status code
        status: u16,
        /// Raw provider error body
        body: String,
    },

    /// Any other non-success HTTP status
    #[error("HTTP {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw provider error body
        body: String,
    },

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The provider's error body, when the failure came from an HTTP response.
    pub fn provider_body(&self) -> Option<&str> {
        match self {
            ApiError::AuthenticationFailed { body, .. } | ApiError::Status { body, .. } => {
                Some(body.as_str())
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

/// Webhook subscription mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubMode {
    /// Register the callback for a topic
    Subscribe,
    /// Remove the callback from a topic
    Unsubscribe,
}

/// Body of a webhook management request
#[derive(Debug, Clone, Serialize)]
pub struct HubRequest {
    /// Subscription details
    pub hub: Hub,
}

/// Subscription details sent under the `hub` key
#[derive(Debug, Clone, Serialize)]
pub struct Hub {
    /// Callback URL the platform will call
    pub callback: String,
    /// Subscribe or unsubscribe
    pub mode: HubMode,
    /// Event topic, e.g. `vehicle:online`
    pub topic: String,
    /// Shared secret
    pub secret: String,
}
