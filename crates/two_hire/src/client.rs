use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::types::ApiError;

const SERVICE_TOKEN_HEADER: &str = "x-service-token";

/// Client for interacting with the 2hire API
///
/// Cheap to clone: clones share the same connection pool, so one instance can be
/// used by concurrent callers.
#[derive(Debug, Clone)]
pub struct TwoHireClient {
    client: Client,
    base_url: String,
}

impl TwoHireClient {
    /// Create a new 2hire API client carrying the bearer and service-token headers
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.bearer_token))
            .map_err(|e| ApiError::Config(format!("Invalid bearer token: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);

        let service_token = HeaderValue::from_str(&config.service_token)
            .map_err(|e| ApiError::Config(format!("Invalid service token: {}", e)))?;
        headers.insert(HeaderName::from_static(SERVICE_TOKEN_HEADER), service_token);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the raw service settings payload for a site
    pub async fn get_service_settings(&self, site_id: &str) -> Result<Value, ApiError> {
        debug!("Fetching service settings for site {}", site_id);

        let request = self
            .client
            .get(self.url("/admin/api/service/setting"))
            .query(&[("site", site_id)]);

        let response = send(request).await?;
        response.json().await.map_err(ApiError::from)
    }

    /// List the vehicles of one asset type as seen by operators
    pub async fn list_admin_vehicles(
        &self,
        site_id: &str,
        asset_type: &str,
    ) -> Result<Vec<Value>, ApiError> {
        debug!(
            "Fetching admin vehicles for site {} and asset type {}",
            site_id, asset_type
        );

        let filters = json!({ "_self": { "online": true, "type": [asset_type] } }).to_string();
        let request = self
            .client
            .get(self.url("/admin/api/sharing/vehicle"))
            .query(&[
                ("site", site_id),
                ("mode", "minimal"),
                ("filters", filters.as_str()),
            ]);

        data_array(send(request).await?).await
    }

    /// List the vehicles of one asset type as seen by end users
    pub async fn list_user_vehicles(
        &self,
        site_id: &str,
        asset_type: &str,
    ) -> Result<Vec<Value>, ApiError> {
        debug!(
            "Fetching user vehicles for site {} and asset type {}",
            site_id, asset_type
        );

        let filters = json!({ "_self": { "type": [asset_type] } }).to_string();
        let request = self
            .client
            .get(self.url("/user/api/sharing/vehicle"))
            .query(&[("site", site_id), ("filters", filters.as_str())]);

        data_array(send(request).await?).await
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Send a request and turn non-success statuses into [`ApiError`]s carrying the body
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;

    debug!("API response status: {}", response.status());

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    warn!("API request failed with status {}: {}", status, body);

    match status.as_u16() {
        401 | 403 => Err(ApiError::AuthenticationFailed {
            status: status.as_u16(),
            body,
        }),
        code => Err(ApiError::Status { status: code, body }),
    }
}

async fn data_array(response: Response) -> Result<Vec<Value>, ApiError> {
    let mut body: Value = response.json().await?;

    match body.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ApiError::Decode(format!(
            "expected `data` to be an array, got {}",
            type_name(&other)
        ))),
        None => Err(ApiError::Decode("response has no `data` field".to_string())),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
