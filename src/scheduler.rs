//! Fetch → compose → publish loop.
//!
//! One pass runs immediately at startup, then one per jittered interval,
//! until the shutdown channel fires. Cycle failures are logged and the
//! next tick is the retry; nothing here ends the loop except shutdown.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::aprs::{Publisher, ReportComposer};
use crate::config::ScheduleConfig;
use crate::error::{ComposeError, CycleError};
use crate::tracker::{FixSource, PositionFix, format_delta};

/// Pick the next sleep uniformly from `[interval, interval + jitter]`
pub fn sleep_duration<R: RngExt + ?Sized>(schedule: &ScheduleConfig, rng: &mut R) -> Duration {
    let base = schedule.interval.as_millis();
    let extra = rng.random_range(0..=schedule.jitter.as_millis());
    Duration::from_millis(base + extra)
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub cycles: usize,
    pub failures: usize,
}

pub struct Scheduler<S: FixSource, P: Publisher> {
    source: S,
    composer: ReportComposer,
    publisher: P,
    schedule: ScheduleConfig,
    rng: ChaCha8Rng,
    /// Diagnostics only
    last_fix: Option<PositionFix>,
}

impl<S: FixSource, P: Publisher> Scheduler<S, P> {
    /// `seed` fixes the jitter sequence; `None` seeds from the OS
    pub fn new(
        source: S,
        composer: ReportComposer,
        publisher: P,
        schedule: ScheduleConfig,
        seed: Option<u64>,
    ) -> Self {
        Self {
            source,
            composer,
            publisher,
            schedule,
            rng: create_rng(seed),
            last_fix: None,
        }
    }

    pub fn last_fix(&self) -> Option<&PositionFix> {
        self.last_fix.as_ref()
    }

    /// One fetch → compose → publish pass. No retries.
    pub fn run_cycle(&mut self) -> Result<(), CycleError> {
        let snapshot = self.source.fetch()?;

        if let Some(previous) = &self.last_fix {
            if previous.timestamp == snapshot.fix.timestamp {
                log::info!("No new fix since last cycle, re-sending {}", previous.timestamp);
            }
        }

        let report = self
            .composer
            .compose(&snapshot.fix, &snapshot.status, &snapshot.interval)
            .inspect_err(|e: &ComposeError| {
                log::error!(
                    "Report composition defect: {} [device={} lat={} lng={} time={} battery={} icon={} method={} interval={}]",
                    e,
                    snapshot.device_name,
                    snapshot.fix.latitude,
                    snapshot.fix.longitude,
                    snapshot.fix.timestamp,
                    snapshot.status.battery,
                    snapshot.status.icon,
                    snapshot.fix.method,
                    snapshot.interval
                )
            })?;

        self.publisher.publish(&report)?;
        self.last_fix = Some(snapshot.fix);
        Ok(())
    }

    fn cycle_logged(&mut self, stats: &mut RunStats) {
        stats.cycles += 1;
        if let Err(e) = self.run_cycle() {
            stats.failures += 1;
            let age = self
                .last_fix
                .as_ref()
                .map(|f| format_delta(f.age(chrono::Utc::now())));
            match age {
                Some(age) => log::warn!("Cycle failed: {} (last good fix {} ago)", e, age),
                None => log::warn!("Cycle failed: {} (no fix sent yet)", e),
            }
        }
    }

    /// Run until `shutdown` receives a message or all senders are dropped.
    ///
    /// The startup pass may fail without consequence; its error is logged
    /// and scheduling proceeds. A cycle in progress always finishes before
    /// shutdown is observed.
    pub fn run(&mut self, shutdown: &Receiver<()>) -> RunStats {
        let mut stats = RunStats::default();

        self.cycle_logged(&mut stats);
        if stats.failures > 0 {
            log::info!("Startup pass failed, continuing on schedule");
        }

        log::info!(
            "Running on a schedule ({} + up to {})...",
            self.schedule.interval,
            self.schedule.jitter
        );
        loop {
            let sleep = sleep_duration(&self.schedule, &mut self.rng);
            log::debug!("Sleep time: {:?}", sleep);

            match shutdown.recv_timeout(sleep) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            self.cycle_logged(&mut stats);
        }

        log::info!(
            "Exiting after {} cycles ({} failed)",
            stats.cycles,
            stats.failures
        );
        stats
    }
}
