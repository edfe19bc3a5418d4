//! Fixed values shared across the beacon pipeline
//!
//! Intervals are sized to stay inside APRS-IS anti-flood limits while the
//! jitter keeps multiple instances from firing in lockstep.

/// Base sleep between beacon cycles, in seconds.
pub const BASE_INTERVAL_SECS: u64 = 300;

/// Upper bound of the random addition to the base interval, in seconds.
pub const JITTER_SECS: u64 = 10;

/// APRS-IS rotating address, filtered port.
pub const DEFAULT_APRS_IS_SERVER: &str = "rotate.aprs.net:14580";

/// Tracker vendor REST endpoint.
pub const DEFAULT_TRACKER_API_URL: &str = "https://labs.invoxia.io";

/// Device kind queried from the tracker provider.
pub const DEFAULT_DEVICE_KIND: &str = "tracker";

/// Comment appended after the position when none is configured.
pub const DEFAULT_COMMENT: &str = "Sigfox tracker (TESTING)";

/// Generic APRS destination (tocall).
pub const APRS_DESTINATION: &str = "APRS";

/// Path for packets injected directly into APRS-IS.
pub const APRS_IS_PATH: &str = "TCPIP*";

/// Longest line an APRS-IS server accepts, excluding CRLF.
pub const MAX_LINE_LENGTH: usize = 512;

/// Number of fixes requested per fetch: current and previous.
pub const FIXES_PER_FETCH: usize = 2;

/// Network timeout for both collaborators unless configured otherwise.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
