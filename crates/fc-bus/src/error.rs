use fc_core::{FederateId, LogicalTime, ObjectId};
use thiserror::Error;

use crate::MessageKind;

/// A received payload that cannot be turned into a typed message.
///
/// Always recovered locally: the receiver logs it and drops the message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("missing value {name:?}")]
    Missing { name: &'static str },

    #[error("value {name:?} has {got} bytes, expected {expected}")]
    Width {
        name:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("value {name:?} is truncated")]
    Truncated { name: &'static str },

    #[error("value {name:?} is not valid UTF-8")]
    Utf8 { name: &'static str },

    #[error("value {name:?} = {value} is out of range")]
    OutOfRange { name: &'static str, value: i64 },
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// A failure of the bus itself.
///
/// Every variant is fatal to the calling federate: without delivery it
/// cannot make protocol progress.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BusError {
    #[error("{operation}: {kind} is not declared as published by {federate}")]
    NotPublished {
        operation: &'static str,
        federate:  FederateId,
        kind:      MessageKind,
    },

    #[error("{operation}: {object} is not owned by {federate}")]
    NotOwner {
        operation: &'static str,
        federate:  FederateId,
        object:    ObjectId,
    },

    #[error("{operation}: {federate} is not joined")]
    NotJoined {
        operation: &'static str,
        federate:  FederateId,
    },

    #[error("request_advance: invalid advance of {delta} from {from}")]
    InvalidAdvance { delta: f64, from: LogicalTime },

    #[error("{operation}: transport failure: {reason}")]
    Transport {
        operation: &'static str,
        reason:    String,
    },
}

impl BusError {
    /// Name of the bus operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            BusError::NotPublished { operation, .. }
            | BusError::NotOwner { operation, .. }
            | BusError::NotJoined { operation, .. }
            | BusError::Transport { operation, .. } => operation,
            BusError::InvalidAdvance { .. } => "request_advance",
        }
    }
}

pub type BusResult<T> = Result<T, BusError>;
