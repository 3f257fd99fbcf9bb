use fc_bus::BusError;
use fc_core::{FcError, LogicalTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] FcError),

    #[error("federation setup error: {0}")]
    Setup(String),

    /// A federate hit a transport failure and cannot continue.
    #[error("federate {federate:?} failed in {operation}: {source}")]
    Federate {
        federate:  String,
        operation: &'static str,
        #[source]
        source:    BusError,
    },

    #[error("no advance can be granted before the time limit {limit} (next request at {next})")]
    TimeLimit { limit: LogicalTime, next: LogicalTime },

    #[error("federation has no {what} federate to report on")]
    MissingFederate { what: &'static str },
}

impl SimError {
    /// Name of the failing bus operation, for fatal federate errors.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            SimError::Federate { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
