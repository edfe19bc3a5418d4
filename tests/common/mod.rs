#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use tracker2aprs::tracker::{
    DeviceStatus, InterFixInterval, LocationMethod, PositionFix, Snapshot, TrackerIcon,
};

pub fn time(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 6, 1, h, m, s).unwrap()
}

pub fn fix(latitude: f64, longitude: f64) -> PositionFix {
    PositionFix {
        latitude,
        longitude,
        timestamp: time(21, 5, 19),
        method: LocationMethod::Gps,
    }
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        device_name: "bag".into(),
        fix: fix(55.6761, 12.5683),
        status: DeviceStatus {
            battery: 77,
            icon: TrackerIcon::Backpack,
        },
        interval: InterFixInterval::Unknown,
    }
}
