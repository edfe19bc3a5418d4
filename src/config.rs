//! Configuration for the tracker → APRS beacon.
//!
//! Loaded once at startup from TOML; there is no runtime reconfiguration.
//!
//! ```toml
//! [station]
//! callsign = "OZ3RF-9"
//! comment = "Sigfox tracker (TESTING)"
//!
//! [tracker]
//! username = "me@example.com"
//! password = "hunter2"
//!
//! [aprs_is]
//! server = "rotate.aprs.net:14580"
//!
//! [schedule]
//! interval = "300s"
//! jitter = "10s"
//! ```
//!
//! Credentials can also come from `TRACKER_USERNAME` / `TRACKER_PASSWORD`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta};
use serde::Deserialize;

use crate::aprs::ReportComposer;
use crate::aprs::parse::is_callsign;
use crate::aprs::passcode::passcode;
use crate::constants::{
    BASE_INTERVAL_SECS, DEFAULT_APRS_IS_SERVER, DEFAULT_COMMENT, DEFAULT_DEVICE_KIND,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TRACKER_API_URL, JITTER_SECS,
};
use crate::error::ConfigError;
use crate::tracker::{DeviceStatus, InterFixInterval, LocationMethod, PositionFix, TrackerIcon};

/// Environment variable overriding `tracker.username`
pub const USERNAME_ENV: &str = "TRACKER_USERNAME";
/// Environment variable overriding `tracker.password`
pub const PASSWORD_ENV: &str = "TRACKER_PASSWORD";

/// Duration as written in the config file
///
/// # Parsing formats
/// - `300` or `300s` - seconds
/// - `5m` - minutes
/// - `250ms` - milliseconds
///
/// # Example
/// ```
/// use tracker2aprs::config::Period;
///
/// let p: Period = "5m".parse().unwrap();
/// assert_eq!(p.as_millis(), 300_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "PeriodValue")]
pub struct Period(u64);

#[derive(Deserialize)]
#[serde(untagged)]
enum PeriodValue {
    Seconds(u64),
    Text(String),
}

impl TryFrom<PeriodValue> for Period {
    type Error = String;

    fn try_from(value: PeriodValue) -> Result<Self, Self::Error> {
        match value {
            PeriodValue::Seconds(secs) => Ok(Self::from_secs(secs)),
            PeriodValue::Text(text) => text.parse(),
        }
    }
}

impl Period {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<Period> for Duration {
    fn from(p: Period) -> Self {
        Duration::from_millis(p.0)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}s", self.0 / 1000)
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, scale) = if let Some(num) = s.strip_suffix("ms") {
            (num, 1)
        } else if let Some(num) = s.strip_suffix('s') {
            (num, 1000)
        } else if let Some(num) = s.strip_suffix('m') {
            (num, 60_000)
        } else {
            (s, 1000)
        };

        let value: u64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {}", s))?;
        value
            .checked_mul(scale)
            .map(Self)
            .ok_or_else(|| format!("duration too large: {}", s))
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeaconConfig {
    pub station: StationConfig,
    pub tracker: TrackerConfig,
    pub aprs_is: AprsIsConfig,
    pub schedule: ScheduleConfig,
}

/// Identity used on the beacon network
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationConfig {
    /// Callsign with optional SSID; also the APRS-IS login
    pub callsign: String,
    /// Free text placed after the position
    pub comment: String,
}

/// Tracker vendor account
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub username: String,
    pub password: String,
    pub api_url: String,
    /// Device kind to list; the first match is the tracked device
    pub device_kind: String,
    pub timeout: Period,
}

/// Beacon network connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AprsIsConfig {
    /// `host:port`
    pub server: String,
    pub timeout: Period,
    /// Overrides the code derived from the callsign
    pub passcode: Option<u16>,
}

/// Cycle timing
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Minimum sleep between cycles
    pub interval: Period,
    /// Random extra sleep, uniformly distributed in `[0, jitter]`
    pub jitter: Period,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            callsign: String::new(),
            comment: DEFAULT_COMMENT.to_string(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            api_url: DEFAULT_TRACKER_API_URL.to_string(),
            device_kind: DEFAULT_DEVICE_KIND.to_string(),
            timeout: Period::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Hand-written so the password never reaches the logs
impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("device_kind", &self.device_kind)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AprsIsConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_APRS_IS_SERVER.to_string(),
            timeout: Period::from_secs(DEFAULT_TIMEOUT_SECS),
            passcode: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: Period::from_secs(BASE_INTERVAL_SECS),
            jitter: Period::from_secs(JITTER_SECS),
        }
    }
}

impl BeaconConfig {
    /// Read and parse a TOML file. Validation is a separate step.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Take credentials from the environment when set
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup(USERNAME_ENV) {
            self.tracker.username = username;
        }
        if let Some(password) = lookup(PASSWORD_ENV) {
            self.tracker.password = password;
        }
    }

    /// Reject configurations the daemon cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.username.trim().is_empty() {
            return Err(ConfigError::MissingCredentials("tracker.username"));
        }
        if self.tracker.password.is_empty() {
            return Err(ConfigError::MissingCredentials("tracker.password"));
        }
        if !is_callsign(&self.station.callsign) {
            return Err(ConfigError::InvalidCallsign(self.station.callsign.clone()));
        }
        self.check_comment()?;
        if self.schedule.interval.is_zero() {
            return Err(ConfigError::InvalidDuration(
                self.schedule.interval.to_string(),
            ));
        }
        for timeout in [self.tracker.timeout, self.aprs_is.timeout] {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidDuration(timeout.to_string()));
            }
        }
        if self.aprs_is.server.trim().is_empty() {
            return Err(ConfigError::Invalid("aprs_is.server is empty".into()));
        }
        if self.tracker.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("tracker.api_url is empty".into()));
        }
        Ok(())
    }

    /// Compose a long-form report with the configured station so a comment
    /// that can never be sent fails at startup, not on every tick
    fn check_comment(&self) -> Result<(), ConfigError> {
        let fix = PositionFix {
            latitude: -89.99,
            longitude: -179.99,
            timestamp: DateTime::UNIX_EPOCH,
            method: LocationMethod::Wifi,
        };
        let status = DeviceStatus {
            battery: 100,
            icon: TrackerIcon::Backpack,
        };
        let interval = InterFixInterval::Known(TimeDelta::days(99) + TimeDelta::seconds(86_399));

        ReportComposer::new(&self.station.callsign, &self.station.comment)
            .compose(&fix, &status, &interval)
            .map(|_| ())
            .map_err(|e| ConfigError::Invalid(format!("station.comment cannot be sent: {}", e)))
    }

    /// APRS-IS access code: configured override or derived from the callsign
    pub fn passcode(&self) -> u16 {
        self.aprs_is
            .passcode
            .unwrap_or_else(|| passcode(&self.station.callsign))
    }
}
