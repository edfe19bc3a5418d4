use thiserror::Error;

use crate::aprs::coordinate::Axis;

/// Startup configuration problems. Fatal: the daemon must not start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing tracker credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Invalid callsign {0:?}")]
    InvalidCallsign(String),

    #[error("Invalid duration {0:?}")]
    InvalidDuration(String),

    #[error("Configuration error: {0}")]
    Invalid(String),
}

/// Anything that keeps the Fix Fetcher from producing a snapshot.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Tracker provider rejected credentials (HTTP {0})")]
    Auth(u16),

    #[error("Tracker provider request failed: {0}")]
    Http(String),

    #[error("Unexpected response from tracker provider: {0}")]
    Decode(String),

    #[error("No devices of kind {0:?} registered")]
    NoDevices(String),

    #[error("No position fixes available for device {0}")]
    NoFixes(String),
}

/// Composition defects. The report never reaches the network.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("{axis} {degrees} is outside the encodable range")]
    CoordinateOutOfRange { axis: Axis, degrees: f64 },

    #[error("Composed report failed grammar check ({reason}): {line}")]
    Rejected { line: String, reason: ParseError },
}

/// Why a line is not a valid timestamped position report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing '>' after source callsign")]
    MissingSource,

    #[error("invalid callsign {0:?}")]
    BadCallsign(String),

    #[error("missing ':' before information field")]
    MissingInfo,

    #[error("invalid path element {0:?}")]
    BadPath(String),

    #[error("unsupported data type identifier {0:?}")]
    DataType(char),

    #[error("truncated position report")]
    Truncated,

    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    #[error("invalid latitude {0:?}")]
    Latitude(String),

    #[error("invalid longitude {0:?}")]
    Longitude(String),

    #[error("invalid symbol {0:?}")]
    Symbol(String),

    #[error("comment contains non-printable byte 0x{0:02x}")]
    Comment(u8),

    #[error("line is {0} bytes, exceeds the network limit")]
    TooLong(usize),
}

/// Beacon network failures. The connection is closed regardless.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Cannot resolve beacon server {0}")]
    Resolve(String),

    #[error("Connection to {server} failed: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Beacon server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Beacon server closed the connection during {0}")]
    Closed(&'static str),

    #[error("Login rejected: {0}")]
    Login(String),

    #[error("Beacon server did not answer in time during {0}")]
    Timeout(&'static str),
}

/// A failed fetch → compose → publish pass. Never fatal.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
