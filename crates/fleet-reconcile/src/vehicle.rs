use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::reconcile_types::ReconcileError;

/// Rental status of a vehicle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleStatus {
    /// Parked and rentable
    Free,
    /// Currently rented
    InUse,
    /// Anything else the platform reports, kept verbatim
    Other(String),
}

impl VehicleStatus {
    /// Map the provider's status string
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "free" => VehicleStatus::Free,
            "in_use" | "in-use" | "inUse" => VehicleStatus::InUse,
            other => VehicleStatus::Other(other.to_string()),
        }
    }

    /// Canonical string form
    pub fn as_str(&self) -> &str {
        match self {
            VehicleStatus::Free => "free",
            VehicleStatus::InUse => "in-use",
            VehicleStatus::Other(raw) => raw,
        }
    }
}

impl Serialize for VehicleStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// Canonical vehicle, built fresh from every fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    /// Provider identifier, unique per provider
    pub id: String,
    /// License plate, absent for plate-less asset types
    pub license_plate: Option<String>,
    /// Human-facing reference code
    pub reference_code: Option<String>,
    /// Rental status
    pub status: VehicleStatus,
    /// Whether the vehicle is connected
    pub online: bool,
    /// `external_status.available` as reported by the platform
    pub available: bool,
    /// Last known position
    pub pos: Position,
    /// Remaining range in meters
    pub autonomy: Option<f64>,
    /// Battery charge, 0-100
    pub battery_percentage: f64,
}

/// One side's visible fleet, keyed by vehicle id
pub type FleetSnapshot = BTreeMap<String, Vehicle>;

#[derive(Debug, Deserialize)]
struct RawVehicle {
    id: String,
    license_plate: Option<String>,
    reference_code: Option<String>,
    status: String,
    online: bool,
    external_status: RawExternalStatus,
    latitude: f64,
    longitude: f64,
    autonomy: Option<f64>,
    total_percentage: f64,
}

#[derive(Debug, Deserialize)]
struct RawExternalStatus {
    available: bool,
}

/// Map one provider vehicle record into its canonical shape
pub fn normalize_vehicle(record: &Value) -> Result<Vehicle, ReconcileError> {
    let raw = RawVehicle::deserialize(record).map_err(|e| {
        ReconcileError::MalformedVehicleRecord {
            id: record_id(record),
            reason: e.to_string(),
        }
    })?;

    Ok(Vehicle {
        id: raw.id,
        license_plate: raw.license_plate,
        reference_code: raw.reference_code,
        status: VehicleStatus::from_raw(&raw.status),
        online: raw.online,
        available: raw.external_status.available,
        pos: Position {
            lat: raw.latitude,
            lng: raw.longitude,
        },
        autonomy: raw.autonomy,
        battery_percentage: raw.total_percentage,
    })
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
