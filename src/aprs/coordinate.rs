//! Decimal degrees ↔ APRS degree/minute/hundredths notation.
//!
//! Latitude is `DDMM.HHh` (8 chars), longitude `DDDMM.HHh` (9 chars).
//! The sign lives only in the hemisphere letter.

use std::fmt;

use crate::error::ComposeError;

/// Which coordinate is being encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest magnitude accepted, in degrees
    pub fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    /// Width of the whole-degree field
    pub fn degree_width(self) -> usize {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }

    /// Hemisphere letters as (non-negative, negative)
    pub fn hemispheres(self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }

    /// Total encoded width including the hemisphere letter
    pub fn encoded_len(self) -> usize {
        self.degree_width() + 6
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Encode signed decimal degrees as APRS `DD(D)MM.HHh`.
///
/// Minutes and hundredths of a minute are truncated, never rounded, so the
/// fields cannot carry into the next unit. Values outside ±90 / ±180 or
/// non-finite input are rejected instead of producing a wider field.
///
/// # Example
/// ```
/// use tracker2aprs::aprs::coordinate::{Axis, encode};
///
/// assert_eq!(encode(12.0, Axis::Latitude).unwrap(), "1200.00N");
/// assert_eq!(encode(-122.5, Axis::Longitude).unwrap(), "12230.00W");
/// ```
pub fn encode(degrees: f64, axis: Axis) -> Result<String, ComposeError> {
    if !degrees.is_finite() || degrees.abs() > axis.limit() {
        return Err(ComposeError::CoordinateOutOfRange { axis, degrees });
    }

    let magnitude = degrees.abs();
    let whole = magnitude.trunc();
    let minutes_total = (magnitude - whole) * 60.0;
    let minutes = minutes_total.floor();
    // Float noise can push the remainder to exactly 1.0 minute
    let hundredths = (((minutes_total - minutes) * 100.0).trunc() as u32).min(99);

    let (positive, negative) = axis.hemispheres();
    let hemisphere = if degrees < 0.0 { negative } else { positive };

    Ok(format!(
        "{:0width$}{:02}.{:02}{}",
        whole as u32,
        minutes as u32,
        hundredths,
        hemisphere,
        width = axis.degree_width()
    ))
}

/// Inverse of [`encode`]: parse `DD(D)MM.HHh` back to signed decimal degrees.
///
/// Returns `None` when the field is not exactly the expected shape.
pub fn decode(field: &str, axis: Axis) -> Option<f64> {
    let bytes = field.as_bytes();
    if bytes.len() != axis.encoded_len() {
        return None;
    }

    let dw = axis.degree_width();
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = field.get(range)?;
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    let degrees = digits(0..dw)?;
    let minutes = digits(dw..dw + 2)?;
    if bytes[dw + 2] != b'.' {
        return None;
    }
    let hundredths = digits(dw + 3..dw + 5)?;

    if minutes >= 60 {
        return None;
    }
    let value = degrees as f64 + (minutes as f64 + hundredths as f64 / 100.0) / 60.0;
    if value > axis.limit() {
        return None;
    }

    let (positive, negative) = axis.hemispheres();
    match bytes[dw + 5] as char {
        c if c == positive => Some(value),
        c if c == negative => Some(-value),
        _ => None,
    }
}
