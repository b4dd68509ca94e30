use chrono::{Local, NaiveTime, Timelike};

use crate::settings::{AssetTypeSettings, TimeFrame};

/// Source of the current wall-clock time of day
pub trait Clock: Send + Sync {
    /// Current local time of day
    fn now(&self) -> NaiveTime;
}

/// Clock backed by the host's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Clock frozen at a fixed time of day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// `hour * 100 + minute` for a wall-clock time; seconds are ignored
pub fn hhmm(now: NaiveTime) -> u32 {
    now.hour() * 100 + now.minute()
}

/// Whether at least one frame covers `now`
pub fn is_in_service(frames: &[TimeFrame], now: NaiveTime) -> bool {
    let now = hhmm(now);
    frames.iter().any(|frame| frame.contains(now))
}

/// Whether the admin fleet of an asset type should be fetched at `now`
///
/// No settings means no gating: always fetch.
pub fn should_fetch(settings: Option<&AssetTypeSettings>, now: NaiveTime) -> bool {
    match settings {
        Some(settings) => settings.enabled && is_in_service(&settings.service_hours, now),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TimeOfDay;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn frame(start: (u32, u32), end: (u32, u32)) -> TimeFrame {
        TimeFrame::new(
            TimeOfDay::new(start.0, start.1).unwrap(),
            TimeOfDay::new(end.0, end.1).unwrap(),
        )
        .unwrap()
    }

    fn settings(enabled: bool, frames: Vec<TimeFrame>) -> AssetTypeSettings {
        AssetTypeSettings {
            enabled,
            battery_threshold: 20.0,
            service_hours: frames,
        }
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let frames = vec![frame((8, 0), (20, 0))];

        assert!(is_in_service(&frames, at(8, 0)));
        assert!(is_in_service(&frames, at(20, 0)));
        assert!(!is_in_service(&frames, at(7, 59)));
        assert!(!is_in_service(&frames, at(20, 1)));
    }

    #[test]
    fn test_seconds_are_ignored() {
        let frames = vec![frame((8, 0), (20, 0))];

        assert!(is_in_service(
            &frames,
            NaiveTime::from_hms_opt(20, 0, 59).unwrap()
        ));
    }

    #[test]
    fn test_any_frame_matches() {
        let frames = vec![frame((6, 0), (9, 0)), frame((17, 0), (21, 30))];

        assert!(is_in_service(&frames, at(18, 15)));
        assert!(!is_in_service(&frames, at(12, 0)));
    }

    #[test]
    fn test_no_frames_means_out_of_service() {
        assert!(!is_in_service(&[], at(12, 0)));
    }

    #[test]
    fn test_should_fetch_requires_enabled() {
        let frames = vec![frame((0, 0), (23, 59))];

        assert!(should_fetch(Some(&settings(true, frames.clone())), at(12, 0)));
        assert!(!should_fetch(Some(&settings(false, frames)), at(12, 0)));
    }

    #[test]
    fn test_should_fetch_without_settings() {
        assert!(should_fetch(None, at(3, 0)));
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(at(9, 41)).now(), at(9, 41));
    }
}
