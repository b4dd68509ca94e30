use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::fleet_source::FleetSource;
use crate::reconcile_types::{DataSource, ReconcileError};
use crate::service_window::{Clock, hhmm, should_fetch};
use crate::settings::AssetTypeSettings;
use crate::vehicle::{FleetSnapshot, Vehicle, VehicleStatus, normalize_vehicle};

/// Admin-side eligibility: online, free, and charged strictly above the threshold
pub fn is_admin_eligible(vehicle: &Vehicle, settings: &AssetTypeSettings) -> bool {
    vehicle.online
        && vehicle.status == VehicleStatus::Free
        && vehicle.battery_percentage > settings.battery_threshold
}

/// Fetches the admin and user fleets of a site
#[derive(Clone)]
pub struct FleetFetcher {
    source: Arc<dyn FleetSource>,
    clock: Arc<dyn Clock>,
    site_id: String,
}

impl FleetFetcher {
    /// Create a fetcher for `site_id`
    pub fn new(source: Arc<dyn FleetSource>, clock: Arc<dyn Clock>, site_id: String) -> Self {
        Self {
            source,
            clock,
            site_id,
        }
    }

    /// Fetch the operator view of one asset type
    ///
    /// With settings, the service window is evaluated against the clock on every
    /// call; outside of it no request is made and the snapshot is empty. Fetched
    /// vehicles are then filtered with [`is_admin_eligible`]. Without settings every
    /// returned vehicle is kept.
    pub async fn fetch_admin(
        &self,
        asset_type: &str,
        settings: Option<&AssetTypeSettings>,
    ) -> Result<FleetSnapshot, ReconcileError> {
        let now = self.clock.now();

        if !should_fetch(settings, now) {
            info!(
                asset_type,
                now = hhmm(now),
                "Asset type disabled or outside service hours, skipping admin fetch"
            );
            return Ok(FleetSnapshot::new());
        }

        let records = self
            .source
            .admin_vehicles(&self.site_id, asset_type)
            .await
            .map_err(|cause| fetch_failed(DataSource::Admin, asset_type, cause))?;

        let snapshot = build_snapshot(&records, |vehicle| {
            settings.is_none_or(|settings| is_admin_eligible(vehicle, settings))
        })?;

        debug!(
            "Kept {} of {} admin {} vehicles",
            snapshot.len(),
            records.len(),
            asset_type
        );

        Ok(snapshot)
    }

    /// Fetch the end-user view of one asset type; never gated or filtered
    pub async fn fetch_user(&self, asset_type: &str) -> Result<FleetSnapshot, ReconcileError> {
        let records = self
            .source
            .user_vehicles(&self.site_id, asset_type)
            .await
            .map_err(|cause| fetch_failed(DataSource::User, asset_type, cause))?;

        build_snapshot(&records, |_| true)
    }
}

fn build_snapshot<F>(records: &[Value], keep: F) -> Result<FleetSnapshot, ReconcileError>
where
    F: Fn(&Vehicle) -> bool,
{
    let mut snapshot = FleetSnapshot::new();

    for record in records {
        let vehicle = normalize_vehicle(record)?;
        if keep(&vehicle) {
            snapshot.insert(vehicle.id.clone(), vehicle);
        }
    }

    Ok(snapshot)
}

fn fetch_failed(origin: DataSource, asset_type: &str, cause: two_hire::ApiError) -> ReconcileError {
    error!(
        "Could not fetch {} vehicles for {}: {} {}",
        origin,
        asset_type,
        cause,
        cause.provider_body().unwrap_or_default()
    );
    ReconcileError::FetchFailed { origin, cause }
}
