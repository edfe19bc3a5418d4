use chrono::Utc;

use super::{Device, InterFixInterval, PositionFix, Snapshot};
use crate::constants::FIXES_PER_FETCH;
use crate::error::FetchError;

/// Narrow view of the tracker vendor's API
pub trait TrackerProvider {
    /// Devices of the given kind registered on the account
    fn devices(&self, kind: &str) -> Result<Vec<Device>, FetchError>;

    /// Up to `max_count` fixes for `device`, most recent first
    fn locations(&self, device: &Device, max_count: usize) -> Result<Vec<PositionFix>, FetchError>;
}

/// Source of one snapshot per scheduler tick
pub trait FixSource {
    fn fetch(&mut self) -> Result<Snapshot, FetchError>;
}

/// Pulls the latest fix, its predecessor and the device status for the
/// single managed device.
pub struct FixFetcher<P: TrackerProvider> {
    provider: P,
    device_kind: String,
}

impl<P: TrackerProvider> FixFetcher<P> {
    pub fn new(provider: P, device_kind: impl Into<String>) -> Self {
        Self {
            provider,
            device_kind: device_kind.into(),
        }
    }
}

impl<P: TrackerProvider> FixSource for FixFetcher<P> {
    fn fetch(&mut self) -> Result<Snapshot, FetchError> {
        let devices = self.provider.devices(&self.device_kind)?;
        // Exactly one tracked device is assumed; extras are ignored
        let device = devices
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NoDevices(self.device_kind.clone()))?;

        let mut fixes = self.provider.locations(&device, FIXES_PER_FETCH)?;
        if fixes.is_empty() {
            return Err(FetchError::NoFixes(device.name));
        }
        fixes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        // Only the newest position is reported; the older fix only
        // contributes its timestamp
        let newest = &fixes[0];
        if !newest.is_valid() {
            return Err(FetchError::Decode(format!(
                "fix out of range: lat={} lng={}",
                newest.latitude, newest.longitude
            )));
        }

        let interval = match fixes.get(1) {
            Some(previous) => InterFixInterval::between(&fixes[0], previous),
            None => InterFixInterval::Unknown,
        };
        let fix = fixes.swap_remove(0);

        let now = Utc::now();
        log::info!("\t{} % battery", device.status.battery);
        log::info!("\t{} is now", now);
        log::info!(
            "\t{} which was {} ago",
            fix.timestamp,
            super::format_delta(fix.age(now))
        );
        log::info!("\t{} {} via {}", fix.latitude, fix.longitude, fix.method);
        log::debug!("\tTime between fixes: {}", interval);

        Ok(Snapshot {
            device_name: device.name,
            fix,
            status: device.status,
            interval,
        })
    }
}
