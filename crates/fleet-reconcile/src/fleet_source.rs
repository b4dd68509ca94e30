use async_trait::async_trait;
use serde_json::Value;
use two_hire::{ApiError, TwoHireClient};

/// Where settings and vehicle listings come from
#[async_trait]
pub trait FleetSource: Send + Sync {
    /// Raw service settings payload of a site
    async fn service_settings(&self, site_id: &str) -> Result<Value, ApiError>;

    /// Raw admin vehicle records of one asset type
    async fn admin_vehicles(&self, site_id: &str, asset_type: &str)
    -> Result<Vec<Value>, ApiError>;

    /// Raw user vehicle records of one asset type
    async fn user_vehicles(&self, site_id: &str, asset_type: &str) -> Result<Vec<Value>, ApiError>;
}

#[async_trait]
impl FleetSource for TwoHireClient {
    async fn service_settings(&self, site_id: &str) -> Result<Value, ApiError> {
        self.get_service_settings(site_id).await
    }

    async fn admin_vehicles(
        &self,
        site_id: &str,
        asset_type: &str,
    ) -> Result<Vec<Value>, ApiError> {
        self.list_admin_vehicles(site_id, asset_type).await
    }

    async fn user_vehicles(&self, site_id: &str, asset_type: &str) -> Result<Vec<Value>, ApiError> {
        self.list_user_vehicles(site_id, asset_type).await
    }
}
