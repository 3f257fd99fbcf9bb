//! crossing — run the ferry crossing federation from the command line.
//!
//! Three federates share one in-process bus: a controller that starts and
//! ends the run, a station federate owning every landing, and a single
//! ferry cycling round-robin between them.
//!
//! ```text
//! crossing                                  # defaults: 3 stations, bulk fill
//! crossing --config crossing.json --seed 7  # file config with overrides
//! crossing --continuous --end-trips 25      # continuous arrivals
//! crossing --replications 8                 # independent seeded runs
//! ```
//!
//! Set `RUST_LOG` (or `--log-level`) to control log output; `debug` shows
//! every boarding and attribute update.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use fc_core::{ArrivalPolicy, CrossingConfig, load_config};
use fc_sim::{
    RunReport, SimError, TraceObserver, replication_seeds, run_crossing_with, run_replications,
};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, registry};

/// Simulate passengers and cars crossing between ferry landings.
#[derive(Debug, Parser)]
#[command(name = "crossing", version, about)]
struct Args {
    /// JSON configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of landing stations.
    #[arg(long)]
    stations: Option<u32>,

    /// Ferry capacity in people per trip.
    #[arg(long)]
    capacity: Option<u32>,

    /// Master random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Units placed at each station by the bulk fill.
    #[arg(long, conflicts_with = "continuous")]
    units: Option<u32>,

    /// Use continuous arrivals instead of a one-off bulk fill.
    #[arg(long)]
    continuous: bool,

    /// Trip count that ends a continuous run.
    #[arg(long)]
    end_trips: Option<u32>,

    /// Run this many independent replications with derived seeds.
    #[arg(long)]
    replications: Option<usize>,

    /// Progress log interval in logical time units; 0 disables it.
    #[arg(long, default_value_t = 25.0)]
    progress: f64,

    /// Print the final report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> Result<CrossingConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => CrossingConfig::default(),
        };

        if let Some(stations) = self.stations {
            config.station_count = stations;
        }
        if let Some(capacity) = self.capacity {
            config.ferry_capacity = capacity;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.continuous {
            config.arrival = ArrivalPolicy::Continuous;
        }
        if let Some(units) = self.units {
            if let ArrivalPolicy::BulkFill { units_per_station, .. } = &mut config.arrival {
                *units_per_station = units;
            }
        }
        if let Some(trips) = self.end_trips {
            config.end_trip_count = trips;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    registry().with(filter).with(layer().with_target(false)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(SimError::Federate { federate, operation, .. }) = e.downcast_ref() {
                error!(%federate, operation, "run aborted by a failed bus operation");
            }
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    info!(
        stations = config.station_count,
        capacity = config.ferry_capacity,
        seed = config.seed,
        arrival = ?config.arrival,
        "starting crossing"
    );

    match args.replications {
        Some(n) => run_many(&config, n, args.json),
        None => run_one(&config, args.progress, args.json),
    }
}

fn run_one(config: &CrossingConfig, progress: f64, as_json: bool) -> Result<()> {
    let started = Instant::now();
    let mut trace = TraceObserver::new(progress);
    let report = run_crossing_with(config, &mut trace)?;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        grants = trace.grants,
        deliveries = trace.total_delivered(),
        "run complete"
    );
    log_report(&report);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run_many(config: &CrossingConfig, n: usize, as_json: bool) -> Result<()> {
    let seeds = replication_seeds(config.seed, n);
    let started = Instant::now();
    let results = run_replications(config, &seeds);

    let mut reports = Vec::with_capacity(results.len());
    for (i, result) in results.into_iter().enumerate() {
        let report = result.with_context(|| format!("replication {i} (seed {})", seeds[i]))?;
        reports.push(report);
    }

    for report in &reports {
        log_report(report);
    }
    let trips: Vec<u32> = reports.iter().map(|r| r.ferry.trips).collect();
    let mean_trips = trips.iter().map(|&t| f64::from(t)).sum::<f64>() / trips.len().max(1) as f64;
    info!(
        replications = reports.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        mean_trips,
        "replications complete"
    );

    if as_json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn log_report(report: &RunReport) {
    info!(
        seed = report.seed,
        final_time = report.final_time.value(),
        trips = report.ferry.trips,
        reported_trips = ?report.completed_trips,
        people = report.people_committed(),
        cars = report.cars_committed(),
        empty_stops = report.ferry.empty_stops,
        "crossing summary"
    );
    for s in &report.stations {
        info!(
            station = %s.station,
            people_left = s.people.final_len,
            cars_left = s.cars.final_len,
            people_wait = ?s.people.mean_wait(),
            car_wait = ?s.cars.mean_wait(),
            "station"
        );
    }
    if !report.is_conserved() {
        warn!(seed = report.seed, "queue books do not balance");
    }
}
