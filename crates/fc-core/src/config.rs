//! Run configuration.
//!
//! `CrossingConfig` is the single configuration surface of a run.  The
//! controller federate turns it into the `StartSimulation` interaction; the
//! station and ferry agents never read it directly, they learn their
//! parameters from that interaction.
//!
//! Typically loaded from a JSON file by the application crate.  Every field
//! has a default, so a partial file (or `{}`) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::{FcError, FcResult};

/// Largest route a start signal may describe.
pub const MAX_STATIONS: u32 = 4096;

// ── ArrivalPolicy ─────────────────────────────────────────────────────────────

/// How the station agent populates its queues.  Exactly one variant is
/// active per run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalPolicy {
    /// Fill every station once, at start, with `units_per_station` units.
    /// Each unit becomes a car with probability `car_probability`, otherwise
    /// a person.  The run ends when every queue is empty.
    BulkFill {
        units_per_station: u32,
        car_probability:   f64,
    },

    /// Every station tick, add one person with
    /// `person_arrival_probability` and, independently, one car with
    /// `car_arrival_probability`, each bounded by its max queue length.
    /// The run ends when the ferry's trip count reaches `end_trip_count`.
    Continuous,
}

impl Default for ArrivalPolicy {
    fn default() -> Self {
        ArrivalPolicy::BulkFill { units_per_station: 50, car_probability: 0.10 }
    }
}

// ── FerryTimings ──────────────────────────────────────────────────────────────

/// Logical durations of the ferry's cycle steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerryTimings {
    /// Advance after publishing an arrival (docking delay).
    pub docking:  f64,
    /// Advance between boarding intent and boarding commit.
    pub loading:  f64,
    /// Advance after publishing the boarding commit.
    pub settling: f64,
    /// Advance after departing, before arriving at the next station.
    pub sailing:  f64,
}

impl Default for FerryTimings {
    fn default() -> Self {
        Self { docking: 0.5, loading: 1.0, settling: 0.5, sailing: 1.0 }
    }
}

// ── CrossingConfig ────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingConfig {
    /// Number of landing stations.
    pub station_count: u32,

    /// Max people boarded in one stop.  Cars always board one at a time.
    pub ferry_capacity: u32,

    /// Continuous arrivals stop adding people above this queue length.
    pub max_people_queue: u32,

    /// Continuous arrivals stop adding cars above this queue length.
    pub max_car_queue: u32,

    /// Per-tick probability that one person arrives at a station.
    pub person_arrival_probability: f64,

    /// Per-tick probability that one car arrives at a station.
    pub car_arrival_probability: f64,

    /// Trip count that ends a continuous-arrival run.
    pub end_trip_count: u32,

    /// Queue population policy.
    pub arrival: ArrivalPolicy,

    /// Lookahead used by every federate to stamp outgoing messages.
    pub lookahead: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Safety horizon: the federation refuses to grant past this time.
    pub max_time: f64,

    /// Delay between detecting drained queues and publishing the end of run,
    /// so the last trip-count reflection can arrive.
    pub termination_settle_time: f64,

    /// Interval between station state publications.
    pub station_tick: f64,

    /// Ferry cycle durations.
    pub timings: FerryTimings,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            station_count:              3,
            ferry_capacity:             10,
            max_people_queue:           20,
            max_car_queue:              5,
            person_arrival_probability: 0.4,
            car_arrival_probability:    0.15,
            end_trip_count:             50,
            arrival:                    ArrivalPolicy::default(),
            lookahead:                  1.0,
            seed:                       42,
            max_time:                   100_000.0,
            termination_settle_time:    2.0,
            station_tick:               1.0,
            timings:                    FerryTimings::default(),
        }
    }
}

impl CrossingConfig {
    /// Check every field that would make the federation misbehave.
    pub fn validate(&self) -> FcResult<()> {
        if self.station_count == 0 {
            return Err(FcError::Config("station_count must be at least 1".into()));
        }
        if self.station_count > MAX_STATIONS {
            return Err(FcError::Config(format!("station_count must be at most {MAX_STATIONS}")));
        }
        if self.ferry_capacity == 0 {
            return Err(FcError::Config("ferry_capacity must be at least 1".into()));
        }
        check_probability("person_arrival_probability", self.person_arrival_probability)?;
        check_probability("car_arrival_probability", self.car_arrival_probability)?;
        if let ArrivalPolicy::BulkFill { car_probability, .. } = self.arrival {
            check_probability("arrival.car_probability", car_probability)?;
        }
        check_positive("lookahead", self.lookahead)?;
        check_positive("station_tick", self.station_tick)?;
        check_positive("max_time", self.max_time)?;
        check_non_negative("termination_settle_time", self.termination_settle_time)?;
        check_non_negative("timings.docking", self.timings.docking)?;
        check_non_negative("timings.loading", self.timings.loading)?;
        check_non_negative("timings.settling", self.timings.settling)?;
        check_positive("timings.sailing", self.timings.sailing)?;
        Ok(())
    }

    /// `true` when the run ends on drained queues rather than a trip count.
    #[inline]
    pub fn ends_on_drain(&self) -> bool {
        matches!(self.arrival, ArrivalPolicy::BulkFill { .. })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_probability(name: &str, p: f64) -> FcResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(FcError::Config(format!("{name} must be within [0, 1], got {p}")))
    }
}

fn check_positive(name: &str, v: f64) -> FcResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FcError::Config(format!("{name} must be a positive number, got {v}")))
    }
}

fn check_non_negative(name: &str, v: f64) -> FcResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(FcError::Config(format!("{name} must not be negative, got {v}")))
    }
}
