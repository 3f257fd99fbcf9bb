use fc_core::StationId;
use thiserror::Error;

/// Logical-consistency problems seen by the station agent.
///
/// None of these are fatal.  The federate logs them and ignores the message
/// that caused them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StationError {
    #[error("{operation}: {station} is not a configured station")]
    UnknownStation {
        operation: &'static str,
        station:   StationId,
    },

    #[error("{operation}: simulation has not started")]
    NotStarted { operation: &'static str },

    #[error("start signal received twice")]
    AlreadyStarted,

    #[error("start signal carries no arrival parameters")]
    MissingArrivals,

    #[error("start signal describes {stations} stations with capacity {capacity}")]
    InvalidStart { stations: u32, capacity: u32 },
}

pub type StationResult<T> = Result<T, StationError>;
