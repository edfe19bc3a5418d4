use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;

use tracker2aprs::aprs::{AprsIsClient, DryRun, Publisher, ReportComposer};
use tracker2aprs::config::BeaconConfig;
use tracker2aprs::error::ConfigError;
use tracker2aprs::scheduler::Scheduler;
use tracker2aprs::tracker::{FixFetcher, HttpProvider};

const DEFAULT_CONFIG_PATH: &str = "tracker2aprs.toml";

#[derive(Parser, Debug)]
#[command(name = "tracker2aprs")]
#[command(about = "Beacon a GPS tracker's latest position to APRS-IS", long_about = None)]
struct Args {
    /// TOML configuration file (default: ./tracker2aprs.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Callsign with optional SSID (overrides station.callsign)
    #[arg(long)]
    callsign: Option<String>,

    /// Comment text after the position (overrides station.comment)
    #[arg(long)]
    comment: Option<String>,

    /// APRS-IS server as host:port (overrides aprs_is.server)
    #[arg(long)]
    server: Option<String>,

    /// Run a single cycle and exit with its status
    #[arg(long)]
    once: bool,

    /// Compose and check reports without transmitting
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> Result<BeaconConfig, ConfigError> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = if args.config.is_some() || path.exists() {
        log::info!("Loading configuration from {}", path.display());
        BeaconConfig::load(&path)?
    } else {
        log::info!("No config file, using defaults and environment");
        BeaconConfig::default()
    };

    config.apply_env();
    if let Some(callsign) = &args.callsign {
        config.station.callsign = callsign.clone();
    }
    if let Some(comment) = &args.comment {
        config.station.comment = comment.clone();
    }
    if let Some(server) = &args.server {
        config.aprs_is.server = server.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args).context("Refusing to start")?;

    log::info!("Callsign: {}", config.station.callsign);
    log::info!("Tracker API: {} as {}", config.tracker.api_url, config.tracker.username);
    log::info!("APRS-IS server: {}", config.aprs_is.server);
    log::debug!("{:?}", config);

    let provider = HttpProvider::new(&config.tracker).context("Failed to build HTTP client")?;
    let fetcher = FixFetcher::new(provider, config.tracker.device_kind.clone());
    let composer = ReportComposer::new(
        config.station.callsign.clone(),
        config.station.comment.clone(),
    );
    let publisher: Box<dyn Publisher> = if args.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(AprsIsClient::new(
            &config.aprs_is,
            config.station.callsign.clone(),
            config.passcode(),
        ))
    };

    let mut scheduler = Scheduler::new(fetcher, composer, publisher, config.schedule, None);

    if args.once {
        return scheduler.run_cycle().context("Beacon cycle failed");
    }

    let (shutdown_tx, shutdown_rx) = bounded(1);
    ctrlc::set_handler(move || {
        // A second interrupt while one is pending is dropped
        let _ = shutdown_tx.try_send(());
    })
    .context("Failed to install interrupt handler")?;

    scheduler.run(&shutdown_rx);
    Ok(())
}
