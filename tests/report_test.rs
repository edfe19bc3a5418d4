mod common;

use chrono::TimeDelta;

use tracker2aprs::aprs::parse::{Timestamp, parse};
use tracker2aprs::aprs::ReportComposer;
use tracker2aprs::constants::DEFAULT_COMMENT;
use tracker2aprs::tracker::{DeviceStatus, InterFixInterval, LocationMethod, TrackerIcon};

fn status(battery: u8, icon: TrackerIcon) -> DeviceStatus {
    DeviceStatus { battery, icon }
}

#[test]
fn test_reference_report_fields() {
    let composer = ReportComposer::new("OZ3RF", DEFAULT_COMMENT);
    let report = composer
        .compose(
            &common::fix(12.0, 34.0),
            &status(50, TrackerIcon::Woman),
            &InterFixInterval::Unknown,
        )
        .unwrap();
    let line = report.as_str();

    assert!(line.contains("1200.00N"), "{}", line);
    assert!(line.contains("03400.00E"), "{}", line);
    assert!(line.contains(":/210519h"), "{}", line);
    assert!(line.contains("Battery: 50%"), "{}", line);
    assert!(line.contains("Time between: unknown"), "{}", line);

    let parsed = parse(line).unwrap();
    assert_eq!(
        parsed.timestamp,
        Timestamp::Hms {
            hour: 21,
            minute: 5,
            second: 19
        }
    );
}

#[test]
fn test_composed_reports_always_parse() {
    let composer = ReportComposer::new("OZ3RF-9", DEFAULT_COMMENT);
    let icons = [
        TrackerIcon::Bike,
        TrackerIcon::Helicopter,
        TrackerIcon::Backpack,
        TrackerIcon::Tent,
        TrackerIcon::Antenna,
        TrackerIcon::Cat,
        TrackerIcon::Other("unheard-of".into()),
    ];
    let methods = [
        LocationMethod::Gps,
        LocationMethod::Wifi,
        LocationMethod::Cell,
        LocationMethod::Other("sigfox".into()),
    ];
    let intervals = [
        InterFixInterval::Unknown,
        InterFixInterval::Known(TimeDelta::seconds(0)),
        InterFixInterval::Known(TimeDelta::seconds(299)),
        InterFixInterval::Known(TimeDelta::seconds(3 * 86_400 + 17)),
    ];

    let mut count = 0;
    let mut lat = -90.0;
    while lat <= 90.0 {
        let mut lon = -180.0;
        while lon <= 180.0 {
            let fix = {
                let mut f = common::fix(lat, lon);
                f.method = methods[count % methods.len()].clone();
                f
            };
            let icon = icons[count % icons.len()].clone();
            let battery = (count % 101) as u8;
            let interval = intervals[count % intervals.len()];

            let (report, parsed) = composer
                .compose_checked(&fix, &status(battery, icon), &interval)
                .unwrap_or_else(|e| panic!("lat={} lon={}: {}", lat, lon, e));

            assert!((parsed.latitude - lat).abs() <= 1.0 / 6000.0);
            assert!((parsed.longitude - lon).abs() <= 1.0 / 6000.0);
            assert!(report.as_str().contains(&format!("Battery: {}%", battery)));

            count += 1;
            lon += 7.31;
        }
        lat += 3.17;
    }
    assert!(count > 1000);
}

#[test]
fn test_interval_rendering_in_report() {
    let composer = ReportComposer::new("OZ3RF", "x");
    let report = composer
        .compose(
            &common::fix(1.0, 2.0),
            &status(9, TrackerIcon::Tent),
            &InterFixInterval::Known(TimeDelta::seconds(90_061)),
        )
        .unwrap();
    assert!(
        report
            .as_str()
            .ends_with("[Battery: 9%, Method: gps, Time between: 1 day, 1:01:01]")
    );
}
