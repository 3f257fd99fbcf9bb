use fc_core::StationId;
use thiserror::Error;

/// Problems the ferry recovers from by ignoring the offending message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FerryError {
    #[error("start signal received twice")]
    AlreadyStarted,

    #[error("start signal with {stations} stations and capacity {capacity} is unusable")]
    InvalidStart { stations: u32, capacity: u32 },

    #[error("reflection for {station} outside the {stations}-station route")]
    UnknownStation { station: StationId, stations: u32 },
}

pub type FerryResult<T> = Result<T, FerryError>;
