//! `fc-sim` — the in-process federation that runs a ferry crossing.
//!
//! # Run loop
//!
//! ```text
//! join:  Controller, Station, Ferry          (join order breaks time ties)
//! t = 0: every federate steps once           Controller sends StartSimulation
//! loop:  grant the smallest advance request
//!          ① deliver due messages in timestamp order (discover new objects first)
//!          ② step the granted federate       (sends stamped t + lookahead)
//!        until every federate has resigned
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs replications on Rayon's thread pool.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fc_core::CrossingConfig;
//! use fc_sim::run_crossing;
//!
//! let report = run_crossing(&CrossingConfig::default())?;
//! assert!(report.all_queues_empty());
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod federation;
pub mod observer;
pub mod replication;
pub mod report;

#[cfg(test)]
mod tests;

pub use builder::FederationBuilder;
pub use controller::ControllerFederate;
pub use error::{SimError, SimResult};
pub use federation::Federation;
pub use observer::{NoopObserver, SimObserver, TraceObserver};
pub use replication::{replication_seeds, run_crossing, run_crossing_with, run_replications};
pub use report::RunReport;
