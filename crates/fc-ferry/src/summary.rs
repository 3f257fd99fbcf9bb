use fc_core::StationId;
use serde::Serialize;

/// End-of-run view of the ferry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FerrySummary {
    pub ferry_id:       String,
    /// Legs completed by the ferry itself.
    pub trips:          u32,
    /// Trip count carried by the `EndSimulation` the ferry received, if any.
    pub reported_trips: Option<u32>,
    pub final_position: StationId,
    /// Units announced in committed boardings.
    pub people_carried: u64,
    pub cars_carried:   u64,
    /// Stops where the policy chose not to board.
    pub empty_stops:    u32,
}
