use std::time::Duration;

use crate::types::ApiError;

/// Default per-request timeout applied by [`crate::TwoHireClient`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the 2hire API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `https://api.2hire.io`
    pub base_url: String,
    /// Bearer token sent in the `Authorization` header
    pub bearer_token: String,
    /// Service token sent in the `X-SERVICE-TOKEN` header
    pub service_token: String,
    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Load the API configuration from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the API configuration using `lookup` to resolve variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, "BASE_URL")?;
        let bearer_token = required(&lookup, "AUTHORIZATION_BEARER")?;
        let service_token = required(&lookup, "SERVICE_TOKEN")?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ApiError::Config(format!("REQUEST_TIMEOUT_SECS must be an integer: {}", e))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
            service_token,
            request_timeout,
        })
    }
}

/// Callback registration details used by [`crate::WebhookService`].
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Public URL the platform pushes events to
    pub callback_url: String,
    /// Shared secret the platform signs events with
    pub secret: String,
}

impl WebhookConfig {
    /// Load the webhook configuration from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the webhook configuration using `lookup` to resolve variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            callback_url: required(&lookup, "WEBHOOK_CALLBACK_URL")?,
            secret: required(&lookup, "WEBHOOK_SECRET")?,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::Config(format!(
            "{} environment variable not set",
            key
        ))),
    }
}
