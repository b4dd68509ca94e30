use std::fmt;

use serde::Serialize;
use two_hire::ApiError;

/// Which provider endpoint a fetch failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// `GET /admin/api/service/setting`
    Settings,
    /// `GET /admin/api/sharing/vehicle`
    Admin,
    /// `GET /user/api/sharing/vehicle`
    User,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Settings => write!(f, "settings"),
            DataSource::Admin => write!(f, "admin"),
            DataSource::User => write!(f, "user"),
        }
    }
}

/// Custom error type for reconciliation runs
#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    /// The settings payload lacks a section for a configured asset type
    #[error("Malformed settings: {0}")]
    MalformedSettings(String),

    /// A provider vehicle record lacks an expected field
    #[error("Malformed vehicle record {}: {reason}", .id.as_deref().unwrap_or("<unknown id>"))]
    MalformedVehicleRecord {
        /// Vehicle id, when the record had one
        id: Option<String>,
        /// What was missing or mistyped
        reason: String,
    },

    /// A provider call failed
    #[error("Failed to fetch {origin} data: {cause}")]
    FetchFailed {
        /// Endpoint that failed
        origin: DataSource,
        /// Underlying client error
        #[source]
        cause: ApiError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline task panicked or was cancelled
    #[error("Pipeline task failed: {0}")]
    Task(String),
}

impl ReconcileError {
    /// Provider error body carried by a fetch failure, if any
    pub fn provider_body(&self) -> Option<&str> {
        match self {
            ReconcileError::FetchFailed { cause, .. } => cause.provider_body(),
            _ => None,
        }
    }
}

/// What a single reconciliation run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Site whose settings and vehicles are queried
    pub site_id: String,
    /// Asset types to reconcile, e.g. `scooter`, `bike`
    pub asset_types: Vec<String>,
    /// Whether the site settings gate and filter the admin fleet
    pub apply_site_settings: bool,
}

impl ReconcileConfig {
    /// Load the run configuration from the process environment.
    pub fn from_env() -> Result<Self, ReconcileError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the run configuration using `lookup` to resolve variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReconcileError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let site_id = lookup("SITE_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ReconcileError::Config("SITE_ID environment variable not set".to_string())
            })?;

        let asset_types = parse_asset_types(&lookup("ASSET_TYPES").unwrap_or_default());
        if asset_types.is_empty() {
            return Err(ReconcileError::Config(
                "ASSET_TYPES must list at least one asset type".to_string(),
            ));
        }

        let apply_site_settings = match lookup("APPLY_SITE_SETTINGS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ReconcileError::Config(format!(
                    "APPLY_SITE_SETTINGS must be true or false, got '{}'",
                    raw
                ))
            })?,
            None => true,
        };

        Ok(Self {
            site_id,
            asset_types,
            apply_site_settings,
        })
    }
}

/// Split a comma-separated asset type list, dropping blanks and duplicates
pub fn parse_asset_types(raw: &str) -> Vec<String> {
    let mut asset_types: Vec<String> = Vec::new();

    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !asset_types.iter().any(|existing| existing == item) {
            asset_types.push(item.to_string());
        }
    }

    asset_types
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
