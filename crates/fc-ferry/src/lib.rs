//! `fc-ferry` — the Ferry Agent.
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`policy`]    | `BoardingPolicy`, `PriorityPolicy`, `decide_boarding`    |
//! | [`ferry`]     | `Ferry` — position, trip count, current boarding         |
//! | [`federate`]  | `FerryFederate` — the cycle as a state machine           |
//! | [`summary`]   | `FerrySummary`                                           |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | Key the reflected station view with FxHash.               |

pub mod error;
pub mod federate;
pub mod ferry;
pub mod policy;
pub mod summary;

#[cfg(test)]
mod tests;

pub use error::{FerryError, FerryResult};
pub use federate::{FerryFederate, FerryPhase};
pub use ferry::Ferry;
pub use policy::{decide_boarding, Boarding, BoardingPolicy, PriorityPolicy, QueueView};
pub use summary::FerrySummary;
