//! `fc-station` — the Station Agent.
//!
//! One agent manages every landing of the crossing: it owns a people queue
//! and a car queue per station, populates them with one of two arrival
//! policies, publishes their lengths every tick, applies ferry boardings
//! through a two-phase intent/commit handshake and decides when the run is
//! over.
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`queue`]     | `EntityQueue`, saturating `remove_front`                 |
//! | [`arrival`]   | Bulk fill and continuous arrivals                        |
//! | [`agent`]     | `StationAgent` — protocol state, no bus access           |
//! | [`federate`]  | `StationFederate` — drives the agent on the bus          |
//! | [`summary`]   | `StationSummary`, `QueueLedger`                          |

pub mod agent;
pub mod arrival;
pub mod error;
pub mod federate;
pub mod queue;
pub mod summary;


pub use agent::{Commit, PendingBoarding, Station, StationAgent, StationPhase};
pub use arrival::{Added, ContinuousArrivals};
pub use error::{StationError, StationResult};
pub use federate::{StationFederate, StationLoop};
pub use queue::{EntityQueue, Passenger, Removal, Vehicle};
pub use summary::{QueueLedger, StationSummary};
