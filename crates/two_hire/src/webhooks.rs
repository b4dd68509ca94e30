use serde_json::Value;
use tracing::{error, info};

use crate::client::{TwoHireClient, send};
use crate::config::WebhookConfig;
use crate::types::{ApiError, Hub, HubMode, HubRequest};

const WEBHOOKS_PATH: &str = "/admin/api/webhooks";

/// Manages the platform's webhook subscriptions for a single callback URL
pub struct WebhookService {
    client: TwoHireClient,
    config: WebhookConfig,
}

impl WebhookService {
    /// Create a webhook service on top of an existing API client
    pub fn new(client: TwoHireClient, config: WebhookConfig) -> Self {
        Self { client, config }
    }

    /// Register the callback for `topic`
    pub async fn subscribe(&self, topic: &str) -> Result<Value, ApiError> {
        self.update(HubMode::Subscribe, topic).await
    }

    /// Remove the callback from `topic`
    pub async fn unsubscribe(&self, topic: &str) -> Result<Value, ApiError> {
        self.update(HubMode::Unsubscribe, topic).await
    }

    /// List the webhooks currently registered on the platform
    pub async fn list(&self) -> Result<Value, ApiError> {
        let request = self.client.http().get(self.client.url(WEBHOOKS_PATH));

        match send(request).await {
            Ok(response) => Ok(response.json().await?),
            Err(e) => {
                error!(
                    "Could not list webhooks: {} {}",
                    e,
                    e.provider_body().unwrap_or_default()
                );
                Err(e)
            }
        }
    }

    /// Build the request body for a subscription change
    pub fn hub_request(&self, mode: HubMode, topic: &str) -> HubRequest {
        HubRequest {
            hub: Hub {
                callback: self.config.callback_url.clone(),
                mode,
                topic: topic.to_string(),
                secret: self.config.secret.clone(),
            },
        }
    }

    async fn update(&self, mode: HubMode, topic: &str) -> Result<Value, ApiError> {
        let body = self.hub_request(mode, topic);
        let request = self
            .client
            .http()
            .put(self.client.url(WEBHOOKS_PATH))
            .json(&body);

        match send(request).await {
            Ok(response) => {
                info!("Webhook {:?} succeeded for topic {}", mode, topic);
                // Some deployments answer with an empty body.
                let text = response.text().await?;
                if text.trim().is_empty() {
                    Ok(Value::Null)
                } else {
                    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
                }
            }
            Err(e) => {
                error!(
                    "Could not {:?} topic {}: {} {}",
                    mode,
                    topic,
                    e,
                    e.provider_body().unwrap_or_default()
                );
                Err(e)
            }
        }
    }
}
