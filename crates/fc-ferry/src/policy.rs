//! The `BoardingPolicy` trait and the default priority rule.

use fc_bus::BoardingKind;
use fc_core::FederateRng;

/// Queue lengths of one station as last reflected to the ferry.
///
/// May lag the station's true state by up to one lookahead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueView {
    pub people: u32,
    pub cars:   u32,
}

/// One stop's boarding: exactly one kind, never both.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Boarding {
    pub kind:  BoardingKind,
    pub count: u32,
}

impl Boarding {
    pub fn car() -> Self {
        Self { kind: BoardingKind::Car, count: 1 }
    }

    pub fn people(count: u32) -> Self {
        Self { kind: BoardingKind::People, count }
    }
}

/// Pluggable boarding decision.
///
/// Called once per stop with the reflected queue lengths of the current
/// station.  Returning `None` skips boarding: no intent and no commit are
/// sent for that stop.
pub trait BoardingPolicy: Send + 'static {
    fn decide(&self, view: QueueView, capacity: u32, rng: &mut FederateRng) -> Option<Boarding>;
}

/// Cars first on a coin flip, otherwise as many people as fit.
///
/// | Cars | People | Result                                    |
/// |------|--------|-------------------------------------------|
/// | yes  | no     | 1 car                                     |
/// | yes  | yes    | 1 car if the coin says so, else people    |
/// | no   | yes    | `min(people, capacity)` people            |
/// | no   | no     | nothing                                   |
///
/// The coin is only flipped when both kinds are waiting.
#[derive(Copy, Clone, Debug, Default)]
pub struct PriorityPolicy;

impl BoardingPolicy for PriorityPolicy {
    fn decide(&self, view: QueueView, capacity: u32, rng: &mut FederateRng) -> Option<Boarding> {
        decide_boarding(view, capacity, rng)
    }
}

/// The priority rule as a free function.
pub fn decide_boarding(view: QueueView, capacity: u32, rng: &mut FederateRng) -> Option<Boarding> {
    let cars = view.cars > 0;
    let people = view.people > 0;
    if cars && (!people || rng.coin()) {
        Some(Boarding::car())
    } else if people && capacity > 0 {
        Some(Boarding::people(view.people.min(capacity)))
    } else {
        None
    }
}
