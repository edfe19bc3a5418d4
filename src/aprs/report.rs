//! Position report composition.
//!
//! Line layout:
//! `CALL>APRS,TCPIP*:/HHMMSSh<lat><table><lon><code><comment> [Battery: N%, Method: M, Time between: T]`

use std::fmt;

use super::coordinate::{self, Axis};
use super::parse::{self, PositionReport};
use super::symbol;
use crate::constants::{APRS_DESTINATION, APRS_IS_PATH};
use crate::error::ComposeError;
use crate::tracker::{DeviceStatus, InterFixInterval, PositionFix};

/// A fully composed, grammar-checked APRS-IS line without line terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(String);

impl Report {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds reports for one station identity
#[derive(Debug, Clone)]
pub struct ReportComposer {
    callsign: String,
    comment: String,
}

impl ReportComposer {
    pub fn new(callsign: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            comment: comment.into(),
        }
    }

    /// Compose the report line and verify it against the position grammar.
    ///
    /// A rejection here is a composition defect, never a transmission failure.
    pub fn compose(
        &self,
        fix: &PositionFix,
        status: &DeviceStatus,
        interval: &InterFixInterval,
    ) -> Result<Report, ComposeError> {
        let (report, parsed) = self.compose_checked(fix, status, interval)?;
        log::debug!("{}", report);
        log::debug!("{:?}", parsed);
        Ok(report)
    }

    /// Like [`compose`](Self::compose), also returning the parsed view
    pub fn compose_checked(
        &self,
        fix: &PositionFix,
        status: &DeviceStatus,
        interval: &InterFixInterval,
    ) -> Result<(Report, PositionReport), ComposeError> {
        let line = self.render(fix, status, interval)?;
        match parse::parse(&line) {
            Ok(parsed) => Ok((Report(line), parsed)),
            Err(reason) => Err(ComposeError::Rejected { line, reason }),
        }
    }

    fn render(
        &self,
        fix: &PositionFix,
        status: &DeviceStatus,
        interval: &InterFixInterval,
    ) -> Result<String, ComposeError> {
        let lat = coordinate::encode(fix.latitude, Axis::Latitude)?;
        let lon = coordinate::encode(fix.longitude, Axis::Longitude)?;
        let symbol = symbol::for_icon(&status.icon);
        let hhmmss = fix.timestamp.format("%H%M%S");

        Ok(format!(
            "{call}>{dest},{path}:/{hhmmss}h{lat}{table}{lon}{code}{comment} [Battery: {battery}%, Method: {method}, Time between: {interval}]",
            call = self.callsign,
            dest = APRS_DESTINATION,
            path = APRS_IS_PATH,
            table = symbol.table,
            code = symbol.code,
            comment = self.comment,
            battery = status.battery,
            method = fix.method,
        ))
    }
}
