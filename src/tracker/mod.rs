//! Tracker-side data model and the fix fetcher.
//!
//! Everything here is a fresh snapshot per scheduler tick: fetched, handed
//! to the composer, then dropped.

pub mod http;
pub mod provider;

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

pub use http::HttpProvider;
pub use provider::{FixFetcher, FixSource, TrackerProvider};

/// Icon configured for the device in the vendor's app
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(from = "String")]
pub enum TrackerIcon {
    Bike,
    Helicopter,
    Backpack,
    Tent,
    Antenna,
    Woman,
    Man,
    Car,
    Dog,
    Cat,
    /// Any tag this crate has no name for, kept verbatim for logging
    Other(String),
}

impl From<String> for TrackerIcon {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "bike" => Self::Bike,
            "helicopter" => Self::Helicopter,
            "backpack" => Self::Backpack,
            "tent" => Self::Tent,
            "antenna" => Self::Antenna,
            "woman" => Self::Woman,
            "man" => Self::Man,
            "car" => Self::Car,
            "dog" => Self::Dog,
            "cat" => Self::Cat,
            _ => Self::Other(tag),
        }
    }
}

impl fmt::Display for TrackerIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bike => "bike",
            Self::Helicopter => "helicopter",
            Self::Backpack => "backpack",
            Self::Tent => "tent",
            Self::Antenna => "antenna",
            Self::Woman => "woman",
            Self::Man => "man",
            Self::Car => "car",
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Other(tag) => tag,
        };
        f.write_str(name)
    }
}

/// How the tracker obtained a fix
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(from = "String")]
pub enum LocationMethod {
    Gps,
    Wifi,
    Cell,
    Other(String),
}

impl From<String> for LocationMethod {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "gps" => Self::Gps,
            "wifi" => Self::Wifi,
            "cell" | "gsm" => Self::Cell,
            _ => Self::Other(tag),
        }
    }
}

impl fmt::Display for LocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gps => f.write_str("gps"),
            Self::Wifi => f.write_str("wifi"),
            Self::Cell => f.write_str("cell"),
            Self::Other(tag) => f.write_str(tag),
        }
    }
}

/// One reported position of the tracked device
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct PositionFix {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,
    pub method: LocationMethod,
}

impl PositionFix {
    /// Latitude within ±90 and longitude within ±180
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }

    /// Time elapsed since the fix was taken
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }
}

/// Device state captured alongside the fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    /// Battery level, 0-100
    pub battery: u8,
    pub icon: TrackerIcon,
}

/// Time between the two most recent fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterFixInterval {
    Known(TimeDelta),
    /// Only one fix exists so far
    Unknown,
}

impl InterFixInterval {
    /// Interval between the most recent fix and the one before it
    pub fn between(latest: &PositionFix, previous: &PositionFix) -> Self {
        Self::Known(latest.timestamp - previous.timestamp)
    }
}

impl fmt::Display for InterFixInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Known(delta) => write!(f, "{}", format_delta(*delta)),
        }
    }
}

/// Render a duration as `H:MM:SS`, with a `N day(s), ` prefix past 24 hours.
///
/// Sub-second parts are dropped.
pub fn format_delta(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{sign}{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("{sign}1 day, {hours}:{minutes:02}:{seconds:02}"),
        n => format!("{sign}{n} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}

/// A registered device as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub status: DeviceStatus,
}

/// Everything one cycle needs to compose a report
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub device_name: String,
    pub fix: PositionFix,
    pub status: DeviceStatus,
    pub interval: InterFixInterval,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fix_at(h: u32, m: u32, s: u32) -> PositionFix {
        PositionFix {
            latitude: 55.0,
            longitude: 12.0,
            timestamp: Utc.with_ymd_and_hms(2022, 6, 1, h, m, s).unwrap(),
            method: LocationMethod::Gps,
        }
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(InterFixInterval::Unknown.to_string(), "unknown");
        let interval = InterFixInterval::between(&fix_at(12, 5, 10), &fix_at(12, 0, 0));
        assert_eq!(interval.to_string(), "0:05:10");
    }

    #[test]
    fn test_format_delta_days() {
        assert_eq!(format_delta(TimeDelta::seconds(3 * 3600 + 7)), "3:00:07");
        assert_eq!(format_delta(TimeDelta::seconds(86_400 + 61)), "1 day, 0:01:01");
        assert_eq!(format_delta(TimeDelta::seconds(2 * 86_400)), "2 days, 0:00:00");
        assert_eq!(format_delta(TimeDelta::milliseconds(1_999)), "0:00:01");
    }

    #[test]
    fn test_icon_from_tag() {
        assert_eq!(TrackerIcon::from("HELICOPTER".to_string()), TrackerIcon::Helicopter);
        assert_eq!(
            TrackerIcon::from("kayak".to_string()),
            TrackerIcon::Other("kayak".into())
        );
        assert_eq!(TrackerIcon::Other("kayak".into()).to_string(), "kayak");
    }

    #[test]
    fn test_method_from_tag() {
        assert_eq!(LocationMethod::from("gsm".to_string()), LocationMethod::Cell);
        assert_eq!(LocationMethod::from("WIFI".to_string()).to_string(), "wifi");
    }

    #[test]
    fn test_fix_validity() {
        let mut fix = fix_at(0, 0, 0);
        assert!(fix.is_valid());
        fix.latitude = 91.0;
        assert!(!fix.is_valid());
        fix.latitude = f64::NAN;
        assert!(!fix.is_valid());
    }

    #[test]
    fn test_fix_deserialize() {
        let fix: PositionFix = serde_json::from_str(
            r#"{"lat": 55.6761, "lng": 12.5683, "datetime": "2022-06-01T21:05:19Z", "method": "wifi"}"#,
        )
        .unwrap();
        assert_eq!(fix.timestamp, Utc.with_ymd_and_hms(2022, 6, 1, 21, 5, 19).unwrap());
        assert_eq!(fix.method, LocationMethod::Wifi);
    }
}
