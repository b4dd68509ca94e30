use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reconcile_types::ReconcileError;

/// A wall-clock time of day, hour and minute only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TimeOfDay {
    /// Hour, 0-24 (24 only as `24:00`, the end of the day)
    pub hour: u32,
    /// Minute, 0-59
    pub minute: u32,
}

impl TimeOfDay {
    /// Build a time of day, rejecting out-of-range values
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        let valid = minute < 60 && (hour < 24 || (hour == 24 && minute == 0));
        valid.then_some(Self { hour, minute })
    }

    /// The `hour * 100 + minute` encoding used for window comparisons
    pub fn hhmm(&self) -> u32 {
        self.hour * 100 + self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A service window inside a single day. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeFrame {
    /// Opening time, inclusive
    pub start: TimeOfDay,
    /// Closing time, inclusive
    pub end: TimeOfDay,
}

impl TimeFrame {
    /// Build a frame; frames that would wrap past midnight are rejected
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Whether `hhmm` falls inside the frame, both ends included
    pub fn contains(&self, hhmm: u32) -> bool {
        self.start.hhmm() <= hhmm && hhmm <= self.end.hhmm()
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Eligibility policy of one asset type, derived from the site settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetTypeSettings {
    /// Whether the asset type is enabled on the site
    pub enabled: bool,
    /// Vehicles at or below this battery percentage are not rentable
    pub battery_threshold: f64,
    /// Service hours, in payload order
    pub service_hours: Vec<TimeFrame>,
}

/// Per-asset-type policies for one site
pub type SitePolicy = BTreeMap<String, AssetTypeSettings>;

#[derive(Debug, Deserialize)]
struct RawFrame {
    start: RawTime,
    end: RawTime,
}

/// Frames come either as `{"hour": 8, "minute": 0}` objects or `"08:00"` strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Clock {
        hour: u32,
        #[serde(default)]
        minute: u32,
    },
    Text(String),
}

impl RawTime {
    fn to_time_of_day(&self) -> Option<TimeOfDay> {
        match self {
            RawTime::Clock { hour, minute } => TimeOfDay::new(*hour, *minute),
            RawTime::Text(text) => {
                let (hour, minute) = text.trim().split_once(':')?;
                TimeOfDay::new(hour.parse().ok()?, minute.parse().ok()?)
            }
        }
    }
}

/// Extract the policy of every asset type in `asset_types` from a raw settings payload
///
/// The payload is the body of `GET /admin/api/service/setting`; the relevant part
/// lives under `data.specific.<site_id>.service`. Fails with
/// [`ReconcileError::MalformedSettings`] as soon as one asset type is missing from
/// `vehicle.enabled`, `vehicle.lowBattery` or `availability`.
pub fn normalize_settings(
    payload: &Value,
    site_id: &str,
    asset_types: &[String],
) -> Result<SitePolicy, ReconcileError> {
    let service = payload
        .pointer(&format!("/data/specific/{}/service", escape_pointer(site_id)))
        .ok_or_else(|| {
            ReconcileError::MalformedSettings(format!(
                "no service settings for site `{}`",
                site_id
            ))
        })?;

    let mut policy = SitePolicy::new();

    for asset_type in asset_types {
        policy.insert(
            asset_type.clone(),
            normalize_asset_type(service, asset_type)?,
        );
    }

    Ok(policy)
}

fn normalize_asset_type(
    service: &Value,
    asset_type: &str,
) -> Result<AssetTypeSettings, ReconcileError> {
    let enabled = section(service, "/vehicle/enabled", asset_type)?
        .as_bool()
        .ok_or_else(|| malformed("vehicle.enabled", asset_type, "expected a boolean"))?;

    let battery_threshold = section(service, "/vehicle/lowBattery", asset_type)?
        .as_f64()
        .ok_or_else(|| malformed("vehicle.lowBattery", asset_type, "expected a number"))?;

    let frames = section(service, "/availability", asset_type)?
        .get("frames")
        .ok_or_else(|| malformed("availability", asset_type, "missing `frames`"))?;

    let raw_frames: Vec<RawFrame> = serde_json::from_value(frames.clone())
        .map_err(|e| malformed("availability", asset_type, &e.to_string()))?;

    let service_hours = raw_frames
        .iter()
        .map(|raw| {
            let start = raw.start.to_time_of_day();
            let end = raw.end.to_time_of_day();
            start
                .zip(end)
                .and_then(|(start, end)| TimeFrame::new(start, end))
                .ok_or_else(|| {
                    malformed(
                        "availability",
                        asset_type,
                        &format!("invalid frame {:?}", raw),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AssetTypeSettings {
        enabled,
        battery_threshold,
        service_hours,
    })
}

fn section<'a>(
    service: &'a Value,
    pointer: &str,
    asset_type: &str,
) -> Result<&'a Value, ReconcileError> {
    service
        .pointer(pointer)
        .and_then(|map| map.get(asset_type))
        .ok_or_else(|| {
            ReconcileError::MalformedSettings(format!(
                "asset type `{}` missing from `{}`",
                asset_type,
                pointer.trim_start_matches('/').replace('/', ".")
            ))
        })
}

fn malformed(section: &str, asset_type: &str, detail: &str) -> ReconcileError {
    ReconcileError::MalformedSettings(format!(
        "`{}` entry for `{}`: {}",
        section, asset_type, detail
    ))
}

/// RFC 6901 escaping for a single pointer token
fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
