//! FIFO queues of anonymous waiting units.
//!
//! A unit carries nothing but the logical time it joined the queue, which is
//! enough to report waiting times after a run.  Removal is saturating: asking
//! for more units than are queued removes everything that is there and
//! reports the difference as a shortfall instead of failing.

use std::collections::VecDeque;
use std::marker::PhantomData;

use fc_core::LogicalTime;

/// A person waiting on the landing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Passenger;

/// A car waiting on the landing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vehicle;

/// Outcome of one saturating removal.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Removal {
    /// Units actually taken off the front.
    pub removed:   u32,
    /// Units requested but not present.
    pub shortfall: u32,
    /// Sum of waiting times of the removed units.
    pub waited:    f64,
}

/// FIFO queue of units of kind `E`.  The marker only keeps people and cars
/// from being mixed up at compile time.
#[derive(Clone, Debug)]
pub struct EntityQueue<E> {
    joined: VecDeque<LogicalTime>,
    _kind:  PhantomData<E>,
}

impl<E> Default for EntityQueue<E> {
    fn default() -> Self {
        Self { joined: VecDeque::new(), _kind: PhantomData }
    }
}

impl<E> EntityQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued units, as published on the wire.
    #[inline]
    pub fn len(&self) -> u32 {
        u32::try_from(self.joined.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }

    /// Append one unit that joined at `now`.
    pub fn push(&mut self, now: LogicalTime) {
        self.joined.push_back(now);
    }

    /// Remove up to `count` units from the front.
    pub fn remove_front(&mut self, count: u32, now: LogicalTime) -> Removal {
        let available = self.len();
        let removed = count.min(available);
        let waited = self
            .joined
            .drain(..removed as usize)
            .map(|joined| now - joined)
            .sum();
        Removal { removed, shortfall: count - removed, waited }
    }
}
