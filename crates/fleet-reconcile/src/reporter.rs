use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

use crate::reconciler::Reconciliation;
use crate::settings::SitePolicy;
use crate::vehicle::{FleetSnapshot, Vehicle};

/// Outcome of reconciling one asset type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    /// Asset type the report covers
    pub asset_type: String,
    /// Size of the admin snapshot
    pub admin_count: usize,
    /// Size of the user snapshot
    pub user_count: usize,
    /// Vehicles operators see and end users don't
    pub admin_only: Vec<Vehicle>,
    /// Vehicles end users see and operators don't
    pub user_only: Vec<Vehicle>,
}

impl ReconciliationReport {
    /// Build a report from both snapshots and their differences
    pub fn new(
        asset_type: &str,
        admin: &FleetSnapshot,
        user: &FleetSnapshot,
        reconciliation: Reconciliation,
    ) -> Self {
        Self {
            asset_type: asset_type.to_string(),
            admin_count: admin.len(),
            user_count: user.len(),
            admin_only: reconciliation.admin_only.into_values().collect(),
            user_only: reconciliation.user_only.into_values().collect(),
        }
    }
}

/// Errors raised while emitting a report
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Writing to the sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Another writer panicked while holding the sink
    #[error("Report sink poisoned")]
    Poisoned,
}

/// Destination for reconciliation output
pub trait ReportSink: Send + Sync {
    /// Emit the policies extracted from the site settings
    fn publish_settings(&self, site_id: &str, policy: &SitePolicy) -> Result<(), ReportError>;

    /// Emit the outcome of one asset type
    fn publish(&self, report: &ReconciliationReport) -> Result<(), ReportError>;
}

/// Writes reports as log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ReportSink for LogReporter {
    fn publish_settings(&self, site_id: &str, policy: &SitePolicy) -> Result<(), ReportError> {
        for (asset_type, settings) in policy {
            let hours: Vec<String> = settings
                .service_hours
                .iter()
                .map(ToString::to_string)
                .collect();

            info!(site_id, "{} enabled {}", asset_type, settings.enabled);
            info!(
                site_id,
                "{} battery threshold {}", asset_type, settings.battery_threshold
            );
            info!(site_id, "{} service hours [{}]", asset_type, hours.join(", "));
        }

        Ok(())
    }

    fn publish(&self, report: &ReconciliationReport) -> Result<(), ReportError> {
        let admin_only = serde_json::to_string(&report.admin_only)?;
        let user_only = serde_json::to_string(&report.user_only)?;

        info!("{} admin vehicles {}", report.asset_type, report.admin_count);
        info!("{} user vehicles {}", report.asset_type, report.user_count);
        info!(
            "{} admin vehicles not in user vehicles {}",
            report.asset_type, admin_only
        );
        info!(
            "{} user vehicles not in admin vehicles {}",
            report.asset_type, user_only
        );

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonRecord<'a> {
    Settings {
        site_id: &'a str,
        settings: &'a SitePolicy,
    },
    Reconciliation(&'a ReconciliationReport),
}

/// Writes one JSON document per line
pub struct JsonReporter<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonReporter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Give back the wrapped writer
    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer.into_inner().map_err(|_| ReportError::Poisoned)
    }

    fn write_record(&self, record: &JsonRecord<'_>) -> Result<(), ReportError> {
        let mut writer = self.writer.lock().map_err(|_| ReportError::Poisoned)?;
        serde_json::to_writer(&mut *writer, record)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ReportSink for JsonReporter<W> {
    fn publish_settings(&self, site_id: &str, policy: &SitePolicy) -> Result<(), ReportError> {
        self.write_record(&JsonRecord::Settings {
            site_id,
            settings: policy,
        })
    }

    fn publish(&self, report: &ReconciliationReport) -> Result<(), ReportError> {
        self.write_record(&JsonRecord::Reconciliation(report))
    }
}
