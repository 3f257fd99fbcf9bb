//! Logical time model.
//!
//! # Design
//!
//! Time is a shared, discrete-event `f64` value that only moves when a
//! federate requests an advance and the time manager grants it.  It has no
//! relation to wall-clock time.
//!
//! `LogicalTime` wraps the raw `f64` with a *total* order (`f64::total_cmp`)
//! so it can key `BTreeMap`s and be compared without `partial_cmp` noise.
//! NaN never appears in practice: every constructor path goes through
//! [`LogicalTime::new`], which rejects non-finite values.
//!
//! Each federate owns a `FederateClock` holding its last granted time and
//! its lookahead.  Every outgoing message is stamped `current + lookahead`,
//! which is what lets the time manager grant advances without ever
//! delivering an event into another federate's past.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── LogicalTime ───────────────────────────────────────────────────────────────

/// A point on the shared logical timeline.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct LogicalTime(f64);

impl LogicalTime {
    pub const ZERO: LogicalTime = LogicalTime(0.0);

    /// Wrap a finite `f64`.  Returns `None` for NaN or infinities.
    #[inline]
    pub fn new(value: f64) -> Option<LogicalTime> {
        value.is_finite().then_some(LogicalTime(value))
    }

    /// The raw `f64` value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return the time `delta` units after `self`.
    #[inline]
    pub fn offset(self, delta: f64) -> LogicalTime {
        LogicalTime(self.0 + delta)
    }
}

impl PartialEq for LogicalTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for LogicalTime {}

impl PartialOrd for LogicalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogicalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for LogicalTime {
    type Output = LogicalTime;
    #[inline]
    fn add(self, rhs: f64) -> LogicalTime {
        LogicalTime(self.0 + rhs)
    }
}

impl std::ops::Sub for LogicalTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: LogicalTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.2}", self.0)
    }
}

// ── FederateClock ─────────────────────────────────────────────────────────────

/// One federate's view of logical time: its last grant plus its lookahead.
#[derive(Clone, Debug)]
pub struct FederateClock {
    /// Time of the most recent advance grant.
    pub current: LogicalTime,
    /// Minimum offset for outgoing timestamps.  Always `> 0`.
    pub lookahead: f64,
}

impl FederateClock {
    pub fn new(lookahead: f64) -> Self {
        Self { current: LogicalTime::ZERO, lookahead }
    }

    /// Timestamp for a message sent at the current grant.
    #[inline]
    pub fn stamp(&self) -> LogicalTime {
        self.current + self.lookahead
    }

    /// The time an advance by `delta` would request.
    ///
    /// Returns `None` when `delta` is negative or not finite.
    pub fn target(&self, delta: f64) -> Option<LogicalTime> {
        if !delta.is_finite() || delta < 0.0 {
            return None;
        }
        LogicalTime::new(self.current.0 + delta)
    }

    /// Record a grant.  Grants never move backwards.
    #[inline]
    pub fn grant(&mut self, to: LogicalTime) {
        debug_assert!(to >= self.current, "grant {to} is before {}", self.current);
        self.current = to;
    }
}

impl fmt::Display for FederateClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (lookahead {:.2})", self.current, self.lookahead)
    }
}
