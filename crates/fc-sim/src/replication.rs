//! Whole-run entry points and seeded replications.
//!
//! Each replication builds its own federation from a cloned config with a
//! different seed, so replications share nothing and can run on any thread.

use fc_core::{CrossingConfig, SimRng};
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{FederationBuilder, NoopObserver, RunReport, SimObserver, SimResult};

/// Run one crossing to completion.
pub fn run_crossing(config: &CrossingConfig) -> SimResult<RunReport> {
    run_crossing_with(config, &mut NoopObserver)
}

/// Run one crossing, reporting progress to `observer`.
pub fn run_crossing_with<O: SimObserver>(
    config: &CrossingConfig,
    observer: &mut O,
) -> SimResult<RunReport> {
    let mut federation = FederationBuilder::crossing(config)?.build()?;
    let final_time = federation.run(observer)?;
    let report = RunReport::collect(&federation, config.seed)?;
    info!(
        seed = config.seed,
        %final_time,
        trips = ?report.completed_trips,
        people = report.people_committed(),
        cars = report.cars_committed(),
        "crossing finished"
    );
    Ok(report)
}

/// `n` replication seeds derived from `master`.
pub fn replication_seeds(master: u64, n: usize) -> Vec<u64> {
    let mut rng = SimRng::new(master);
    (0..n as u64).map(|i| rng.child_seed(i)).collect()
}

/// Run one independent crossing per seed.
///
/// Results come back in `seeds` order.  With the `parallel` feature the runs
/// are spread over Rayon's thread pool.
pub fn run_replications(config: &CrossingConfig, seeds: &[u64]) -> Vec<SimResult<RunReport>> {
    let run = |&seed: &u64| {
        let config = CrossingConfig { seed, ..config.clone() };
        run_crossing(&config)
    };

    #[cfg(feature = "parallel")]
    {
        seeds.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(run).collect()
    }
}
