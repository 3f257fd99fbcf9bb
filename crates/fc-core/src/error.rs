//! Framework error type.
//!
//! Sub-crates define their own error enums (`BusError`, `StationError`,
//! `SimError`, …) and wrap `FcError` as one variant where they need to.

use thiserror::Error;

/// The top-level error type for `fc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FcError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fc-*` crates.
pub type FcResult<T> = Result<T, FcError>;
