use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{error, info, warn};

use crate::fetcher::FleetFetcher;
use crate::fleet_source::FleetSource;
use crate::reconcile_types::{DataSource, ReconcileConfig, ReconcileError};
use crate::reconciler::reconcile;
use crate::reporter::{ReconciliationReport, ReportSink};
use crate::service_window::Clock;
use crate::settings::{AssetTypeSettings, SitePolicy, normalize_settings};

/// Result of one asset type's pipeline
#[derive(Debug)]
pub struct AssetTypeOutcome {
    /// Asset type the pipeline ran for
    pub asset_type: String,
    /// Report on success, the failure otherwise
    pub result: Result<ReconciliationReport, ReconcileError>,
}

/// Runs the reconciliation pipeline for every configured asset type
pub struct ReconcileExecutor {
    config: ReconcileConfig,
    source: Arc<dyn FleetSource>,
    fetcher: FleetFetcher,
    sink: Arc<dyn ReportSink>,
}

impl ReconcileExecutor {
    /// Create an executor; the source is shared by every pipeline
    pub fn new(
        config: ReconcileConfig,
        source: Arc<dyn FleetSource>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        let fetcher = FleetFetcher::new(source.clone(), clock, config.site_id.clone());

        Self {
            config,
            source,
            fetcher,
            sink,
        }
    }

    /// Run one reconciliation over all asset types
    ///
    /// Settings problems abort the whole run before any vehicle is fetched. After
    /// that each asset type runs in its own task and fails on its own; the returned
    /// outcomes follow the configured asset type order.
    pub async fn run(&self) -> Result<Vec<AssetTypeOutcome>, ReconcileError> {
        info!(
            site_id = %self.config.site_id,
            "Starting reconciliation for asset types {:?}", self.config.asset_types
        );

        let policy = self.load_policy().await?;

        let handles = self.config.asset_types.iter().map(|asset_type| {
            let fetcher = self.fetcher.clone();
            let sink = self.sink.clone();
            let asset_type = asset_type.clone();
            let settings = policy
                .as_ref()
                .and_then(|policy| policy.get(&asset_type).cloned());

            tokio::spawn(async move {
                run_asset_type(&fetcher, sink.as_ref(), &asset_type, settings.as_ref()).await
            })
        });

        let joined = join_all(handles).await;

        let outcomes = self
            .config
            .asset_types
            .iter()
            .zip(joined)
            .map(|(asset_type, joined)| {
                let result = joined
                    .unwrap_or_else(|e| Err(ReconcileError::Task(e.to_string())));

                if let Err(e) = &result {
                    error!(
                        "Reconciliation failed for {}: {} {}",
                        asset_type,
                        e,
                        e.provider_body().unwrap_or_default()
                    );
                }

                AssetTypeOutcome {
                    asset_type: asset_type.clone(),
                    result,
                }
            })
            .collect();

        Ok(outcomes)
    }

    async fn load_policy(&self) -> Result<Option<SitePolicy>, ReconcileError> {
        if !self.config.apply_site_settings {
            info!("Site settings disabled, admin fleets will not be filtered");
            return Ok(None);
        }

        let payload = self
            .source
            .service_settings(&self.config.site_id)
            .await
            .map_err(|cause| {
                error!(
                    "Could not fetch service setting: {} {}",
                    cause,
                    cause.provider_body().unwrap_or_default()
                );
                ReconcileError::FetchFailed {
                    origin: DataSource::Settings,
                    cause,
                }
            })?;

        let policy = normalize_settings(&payload, &self.config.site_id, &self.config.asset_types)?;

        if let Err(e) = self.sink.publish_settings(&self.config.site_id, &policy) {
            warn!("Failed to report site settings: {}", e);
        }

        Ok(Some(policy))
    }
}

async fn run_asset_type(
    fetcher: &FleetFetcher,
    sink: &dyn ReportSink,
    asset_type: &str,
    settings: Option<&AssetTypeSettings>,
) -> Result<ReconciliationReport, ReconcileError> {
    let (admin, user) = tokio::join!(
        fetcher.fetch_admin(asset_type, settings),
        fetcher.fetch_user(asset_type)
    );
    let (admin, user) = (admin?, user?);

    let report = ReconciliationReport::new(asset_type, &admin, &user, reconcile(&admin, &user));

    if let Err(e) = sink.publish(&report) {
        warn!("Failed to report {} reconciliation: {}", asset_type, e);
    }

    Ok(report)
}
