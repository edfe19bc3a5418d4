//! Grammar check for outgoing timestamped position reports.
//!
//! Accepts `SRC>DEST[,PATH...]:` followed by an uncompressed position with
//! timestamp (`/` or `@` data type), e.g.
//! `N0CALL>APRS,TCPIP*:/210519h1200.00N/03400.00E:comment`.
//! Anything else the beacon network would choke on is rejected.

use super::coordinate::{self, Axis};
use super::symbol::Symbol;
use crate::constants::MAX_LINE_LENGTH;
use crate::error::ParseError;

/// Report timestamp as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// `HHMMSSh`, UTC
    Hms { hour: u8, minute: u8, second: u8 },
    /// `DDHHMMz` (UTC) or `DDHHMM/` (local)
    Dhm {
        day: u8,
        hour: u8,
        minute: u8,
        zulu: bool,
    },
}

/// Fields of a parsed position report
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub source: String,
    pub destination: String,
    pub path: Vec<String>,
    pub timestamp: Timestamp,
    pub latitude: f64,
    pub longitude: f64,
    pub symbol: Symbol,
    pub comment: String,
}

/// Fixed part of the body: type + timestamp + lat + table + lon + code
const FIXED_BODY_LEN: usize = 1 + 7 + 8 + 1 + 9 + 1;

/// Callsign with optional SSID: 1-6 alphanumerics, then `-` and 1-2 alphanumerics
pub fn is_callsign(s: &str) -> bool {
    let (base, ssid) = match s.split_once('-') {
        Some((base, ssid)) => (base, Some(ssid)),
        None => (s, None),
    };
    let base_ok = (1..=6).contains(&base.len()) && base.bytes().all(|b| b.is_ascii_alphanumeric());
    let ssid_ok = ssid.is_none_or(|ssid| {
        (1..=2).contains(&ssid.len()) && ssid.bytes().all(|b| b.is_ascii_alphanumeric())
    });
    base_ok && ssid_ok
}

fn is_path_element(s: &str) -> bool {
    let s = s.strip_suffix('*').unwrap_or(s);
    (1..=9).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn two_digits(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some((a - b'0') * 10 + (b - b'0')),
        _ => None,
    }
}

fn parse_timestamp(field: &[u8]) -> Result<Timestamp, ParseError> {
    let err = || ParseError::Timestamp(String::from_utf8_lossy(field).into_owned());
    let a = two_digits(&field[0..2]).ok_or_else(err)?;
    let b = two_digits(&field[2..4]).ok_or_else(err)?;
    let c = two_digits(&field[4..6]).ok_or_else(err)?;

    match field[6] {
        b'h' if a < 24 && b < 60 && c < 60 => Ok(Timestamp::Hms {
            hour: a,
            minute: b,
            second: c,
        }),
        suffix @ (b'z' | b'/') if (1..=31).contains(&a) && b < 24 && c < 60 => Ok(Timestamp::Dhm {
            day: a,
            hour: b,
            minute: c,
            zulu: suffix == b'z',
        }),
        _ => Err(err()),
    }
}

/// Parse a full APRS-IS line and reject it if it is not a well-formed
/// timestamped position report.
pub fn parse(line: &str) -> Result<PositionReport, ParseError> {
    if line.len() > MAX_LINE_LENGTH {
        return Err(ParseError::TooLong(line.len()));
    }

    let (header, info) = line.split_once(':').ok_or(ParseError::MissingInfo)?;
    let (source, route) = header.split_once('>').ok_or(ParseError::MissingSource)?;
    if !is_callsign(source) {
        return Err(ParseError::BadCallsign(source.to_string()));
    }

    let mut route = route.split(',');
    let destination = route.next().unwrap_or_default();
    if !is_callsign(destination) {
        return Err(ParseError::BadCallsign(destination.to_string()));
    }
    let path = route
        .map(|p| {
            if is_path_element(p) {
                Ok(p.to_string())
            } else {
                Err(ParseError::BadPath(p.to_string()))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data_type = info.chars().next().ok_or(ParseError::Truncated)?;
    if data_type != '/' && data_type != '@' {
        return Err(ParseError::DataType(data_type));
    }

    let body = info.as_bytes();
    if body.len() < FIXED_BODY_LEN || !body[..FIXED_BODY_LEN].is_ascii() {
        return Err(ParseError::Truncated);
    }

    let timestamp = parse_timestamp(&body[1..8])?;

    // Fixed part is ASCII, so these slices fall on char boundaries
    let lat_field = &info[8..16];
    let latitude = coordinate::decode(lat_field, Axis::Latitude)
        .ok_or_else(|| ParseError::Latitude(lat_field.to_string()))?;

    let table = body[16] as char;
    if !(table == '/' || table == '\\' || table.is_ascii_digit() || table.is_ascii_uppercase()) {
        return Err(ParseError::Symbol(info[16..17].to_string()));
    }

    let lon_field = &info[17..26];
    let longitude = coordinate::decode(lon_field, Axis::Longitude)
        .ok_or_else(|| ParseError::Longitude(lon_field.to_string()))?;

    let code = body[26] as char;
    if !code.is_ascii_graphic() {
        return Err(ParseError::Symbol(info[26..27].to_string()));
    }

    let comment = &info[FIXED_BODY_LEN..];
    if let Some(&bad) = comment.as_bytes().iter().find(|&&b| b < 0x20 || b == 0x7f) {
        return Err(ParseError::Comment(bad));
    }

    Ok(PositionReport {
        source: source.to_string(),
        destination: destination.to_string(),
        path,
        timestamp,
        latitude,
        longitude,
        symbol: Symbol { table, code },
        comment: comment.to_string(),
    })
}
