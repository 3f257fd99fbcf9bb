//! Arrival policies.
//!
//! | Policy        | When                     | Effect per station                                    |
//! |---------------|--------------------------|-------------------------------------------------------|
//! | Bulk fill     | once, right after start  | `units` draws; each is a car with `p_car`, else a person |
//! | Continuous    | every station tick       | one person with `p_person`, one car with `p_car`, each bounded by its max queue length |
//!
//! Random draws are made in station order, person before car, whether or not
//! the queue has room, so a seeded run draws the same sequence regardless of
//! queue state.

use fc_core::{FederateRng, LogicalTime};

use crate::queue::{EntityQueue, Passenger, Vehicle};

/// Units added to one station by one policy application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Added {
    pub people: u32,
    pub cars:   u32,
}

/// Fill a station once with `units` units.
pub fn bulk_fill(
    people: &mut EntityQueue<Passenger>,
    cars: &mut EntityQueue<Vehicle>,
    units: u32,
    car_probability: f64,
    rng: &mut FederateRng,
    now: LogicalTime,
) -> Added {
    let mut added = Added::default();
    for _ in 0..units {
        if rng.gen_bool(car_probability) {
            cars.push(now);
            added.cars += 1;
        } else {
            people.push(now);
            added.people += 1;
        }
    }
    added
}

/// Bounds and probabilities of the continuous policy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContinuousArrivals {
    pub person_probability: f64,
    pub car_probability:    f64,
    pub max_people_queue:   u32,
    pub max_car_queue:      u32,
}

impl ContinuousArrivals {
    /// One tick of arrivals at one station.
    pub fn tick(
        &self,
        people: &mut EntityQueue<Passenger>,
        cars: &mut EntityQueue<Vehicle>,
        rng: &mut FederateRng,
        now: LogicalTime,
    ) -> Added {
        let mut added = Added::default();
        let person = rng.gen_bool(self.person_probability);
        let car = rng.gen_bool(self.car_probability);
        if person && people.len() < self.max_people_queue {
            people.push(now);
            added.people = 1;
        }
        if car && cars.len() < self.max_car_queue {
            cars.push(now);
            added.cars = 1;
        }
        added
    }
}
