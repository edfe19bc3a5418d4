pub mod aprs;
pub mod config;
pub mod constants;
pub mod error;
pub mod scheduler;
pub mod tracker;

pub use config::BeaconConfig;
pub use error::{ComposeError, ConfigError, CycleError, FetchError, PublishError};
pub use scheduler::Scheduler;
