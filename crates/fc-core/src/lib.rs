//! `fc-core` — foundational types for the ferry crossing federation.
//!
//! This crate is a dependency of every other `fc-*` crate.  It has no `fc-*`
//! dependencies and few external ones (`rand`, `thiserror`, `serde`,
//! `serde_json`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `StationId`, `FederateId`, `ObjectId`                   |
//! | [`time`]    | `LogicalTime`, `FederateClock`                          |
//! | [`rng`]     | `FederateRng` (per-federate), `SimRng` (per-run)        |
//! | [`config`]  | `CrossingConfig`, `ArrivalPolicy`, `FerryTimings`       |
//! | [`loader`]  | `load_config`, `load_config_reader` (JSON)              |
//! | [`error`]   | `FcError`, `FcResult`                                   |

pub mod config;
pub mod error;
pub mod ids;
pub mod loader;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ArrivalPolicy, CrossingConfig, FerryTimings, MAX_STATIONS};
pub use error::{FcError, FcResult};
pub use ids::{FederateId, ObjectId, StationId};
pub use loader::{load_config, load_config_reader};
pub use rng::{FederateRng, RngStream, SimRng};
pub use time::{FederateClock, LogicalTime};
