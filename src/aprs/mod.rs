pub mod client;
pub mod coordinate;
pub mod parse;
pub mod passcode;
pub mod report;
pub mod symbol;

pub use client::{AprsIsClient, DryRun, Publisher};
pub use coordinate::Axis;
pub use parse::{PositionReport, parse};
pub use passcode::passcode;
pub use report::{Report, ReportComposer};
pub use symbol::Symbol;
