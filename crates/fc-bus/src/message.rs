//! Typed message contracts and their `ValueMap` encodings.
//!
//! # Interactions
//!
//! | Interaction       | Parameters                                            | Emitted by | Consumed by        |
//! |-------------------|-------------------------------------------------------|------------|--------------------|
//! | `Arrival`         | `ferryId`, `stationId`                                | Ferry      | observers          |
//! | `BoardingStart`   | `ferryId`, `stationId`, `kind`, `count`               | Ferry      | Station            |
//! | `BoardingEnd`     | `ferryId`, `stationId`                                | Ferry      | Station            |
//! | `Departure`       | `ferryId`, `destinationStationId`                     | Ferry      | observers          |
//! | `StartSimulation` | `stationCount`, `ferryCapacity`, arrival extras, `endTripCount` | Controller | Ferry, Station |
//! | `EndSimulation`   | `completedTripCount`                                  | Station    | Ferry, Controller  |
//!
//! `StartSimulation` carries variant-dependent extras: `unitsPerStation` +
//! `carProbability` select bulk fill; `personProbability` + `carProbability`
//! + `maxPeopleQueue` + `maxCarQueue` select continuous arrivals.
//!
//! # Objects
//!
//! | Object  | Attributes                                                                    |
//! |---------|-------------------------------------------------------------------------------|
//! | Ferry   | `id`, `position`, `boardingType` (0/1/2), `boardedCount`, `carPresentFlag`, `tripCount` |
//! | Station | `stationId`, `peopleQueueLength`, `carQueueLength`                            |

use fc_core::{ArrivalPolicy, CrossingConfig, StationId};

use crate::{DecodeError, DecodeResult, InteractionKind, ObjectClass, ValueMap};

/// Parameter and attribute names, as they appear on the wire.
pub mod names {
    pub const FERRY_ID:             &str = "ferryId";
    pub const STATION_ID:           &str = "stationId";
    pub const KIND:                 &str = "kind";
    pub const COUNT:                &str = "count";
    pub const DESTINATION:          &str = "destinationStationId";
    pub const STATION_COUNT:        &str = "stationCount";
    pub const FERRY_CAPACITY:       &str = "ferryCapacity";
    pub const UNITS_PER_STATION:    &str = "unitsPerStation";
    pub const CAR_PROBABILITY:      &str = "carProbability";
    pub const PERSON_PROBABILITY:   &str = "personProbability";
    pub const MAX_PEOPLE_QUEUE:     &str = "maxPeopleQueue";
    pub const MAX_CAR_QUEUE:        &str = "maxCarQueue";
    pub const END_TRIP_COUNT:       &str = "endTripCount";
    pub const COMPLETED_TRIP_COUNT: &str = "completedTripCount";

    pub const ID:                   &str = "id";
    pub const POSITION:             &str = "position";
    pub const BOARDING_TYPE:        &str = "boardingType";
    pub const BOARDED_COUNT:        &str = "boardedCount";
    pub const CAR_PRESENT:          &str = "carPresentFlag";
    pub const TRIP_COUNT:           &str = "tripCount";
    pub const PEOPLE_QUEUE_LENGTH:  &str = "peopleQueueLength";
    pub const CAR_QUEUE_LENGTH:     &str = "carQueueLength";
}

use names::*;

// ── BoardingKind ──────────────────────────────────────────────────────────────

/// What a single boarding event moves.  Never both in one stop.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BoardingKind {
    Car,
    People,
}

impl BoardingKind {
    /// Wire tag: `1` = car, `2` = people (`0` is "none" on the ferry object).
    pub fn to_wire(self) -> i32 {
        match self {
            BoardingKind::Car    => 1,
            BoardingKind::People => 2,
        }
    }

    pub fn from_wire(name: &'static str, raw: i32) -> DecodeResult<BoardingKind> {
        match raw {
            1 => Ok(BoardingKind::Car),
            2 => Ok(BoardingKind::People),
            other => Err(DecodeError::OutOfRange { name, value: other.into() }),
        }
    }

    /// Encode an optional kind as the ferry's `boardingType` attribute.
    pub fn option_to_wire(kind: Option<BoardingKind>) -> i32 {
        kind.map_or(0, BoardingKind::to_wire)
    }

    pub fn option_from_wire(name: &'static str, raw: i32) -> DecodeResult<Option<BoardingKind>> {
        if raw == 0 { Ok(None) } else { BoardingKind::from_wire(name, raw).map(Some) }
    }
}

// ── Interactions ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Arrival {
    pub ferry_id: String,
    pub station:  StationId,
}

/// Boarding intent: the ferry is about to take `count` units of `kind`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardingStart {
    pub ferry_id: String,
    pub station:  StationId,
    pub kind:     BoardingKind,
    pub count:    u32,
}

/// Boarding commit: every intent recorded for `station` is now final.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardingEnd {
    pub ferry_id: String,
    pub station:  StationId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Departure {
    pub ferry_id:    String,
    pub destination: StationId,
}

/// Arrival parameters carried by `StartSimulation`.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrivalParams {
    BulkFill {
        units_per_station: u32,
        car_probability:   f64,
    },
    Continuous {
        person_probability: f64,
        car_probability:    f64,
        max_people_queue:   u32,
        max_car_queue:      u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct StartSimulation {
    pub station_count:  u32,
    pub ferry_capacity: u32,
    /// Absent when the sender only carries the topology (the ferry does not
    /// need it; the station rejects such a start).
    pub arrivals:       Option<ArrivalParams>,
    /// Trip count that ends a continuous-arrival run.
    pub end_trip_count: Option<u32>,
}

impl StartSimulation {
    /// Build the start signal for a run.
    pub fn from_config(config: &CrossingConfig) -> Self {
        let (arrivals, end_trip_count) = match config.arrival {
            ArrivalPolicy::BulkFill { units_per_station, car_probability } => (
                ArrivalParams::BulkFill { units_per_station, car_probability },
                None,
            ),
            ArrivalPolicy::Continuous => (
                ArrivalParams::Continuous {
                    person_probability: config.person_arrival_probability,
                    car_probability:    config.car_arrival_probability,
                    max_people_queue:   config.max_people_queue,
                    max_car_queue:      config.max_car_queue,
                },
                Some(config.end_trip_count),
            ),
        };
        Self {
            station_count:  config.station_count,
            ferry_capacity: config.ferry_capacity,
            arrivals:       Some(arrivals),
            end_trip_count,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EndSimulation {
    pub completed_trips: u32,
}

/// Tagged union of every interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Arrival(Arrival),
    BoardingStart(BoardingStart),
    BoardingEnd(BoardingEnd),
    Departure(Departure),
    StartSimulation(StartSimulation),
    EndSimulation(EndSimulation),
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::Arrival(_)         => InteractionKind::Arrival,
            Interaction::BoardingStart(_)   => InteractionKind::BoardingStart,
            Interaction::BoardingEnd(_)     => InteractionKind::BoardingEnd,
            Interaction::Departure(_)       => InteractionKind::Departure,
            Interaction::StartSimulation(_) => InteractionKind::StartSimulation,
            Interaction::EndSimulation(_)   => InteractionKind::EndSimulation,
        }
    }

    pub fn encode(&self) -> ValueMap {
        let mut v = ValueMap::new();
        match self {
            Interaction::Arrival(m) => {
                v.put_str(FERRY_ID, &m.ferry_id).put_i32(STATION_ID, m.station.to_wire());
            }
            Interaction::BoardingStart(m) => {
                v.put_str(FERRY_ID, &m.ferry_id)
                    .put_i32(STATION_ID, m.station.to_wire())
                    .put_i32(KIND, m.kind.to_wire())
                    .put_count(COUNT, m.count);
            }
            Interaction::BoardingEnd(m) => {
                v.put_str(FERRY_ID, &m.ferry_id).put_i32(STATION_ID, m.station.to_wire());
            }
            Interaction::Departure(m) => {
                v.put_str(FERRY_ID, &m.ferry_id).put_i32(DESTINATION, m.destination.to_wire());
            }
            Interaction::StartSimulation(m) => {
                v.put_count(STATION_COUNT, m.station_count)
                    .put_count(FERRY_CAPACITY, m.ferry_capacity);
                match &m.arrivals {
                    Some(ArrivalParams::BulkFill { units_per_station, car_probability }) => {
                        v.put_count(UNITS_PER_STATION, *units_per_station)
                            .put_f64(CAR_PROBABILITY, *car_probability);
                    }
                    Some(ArrivalParams::Continuous {
                        person_probability,
                        car_probability,
                        max_people_queue,
                        max_car_queue,
                    }) => {
                        v.put_f64(PERSON_PROBABILITY, *person_probability)
                            .put_f64(CAR_PROBABILITY, *car_probability)
                            .put_count(MAX_PEOPLE_QUEUE, *max_people_queue)
                            .put_count(MAX_CAR_QUEUE, *max_car_queue);
                    }
                    None => {}
                }
                if let Some(n) = m.end_trip_count {
                    v.put_count(END_TRIP_COUNT, n);
                }
            }
            Interaction::EndSimulation(m) => {
                v.put_count(COMPLETED_TRIP_COUNT, m.completed_trips);
            }
        }
        v
    }

    pub fn decode(kind: InteractionKind, v: &ValueMap) -> DecodeResult<Interaction> {
        Ok(match kind {
            InteractionKind::Arrival => Interaction::Arrival(Arrival {
                ferry_id: v.get_str(FERRY_ID)?,
                station:  v.get_station(STATION_ID)?,
            }),
            InteractionKind::BoardingStart => Interaction::BoardingStart(BoardingStart {
                ferry_id: v.get_str(FERRY_ID)?,
                station:  v.get_station(STATION_ID)?,
                kind:     BoardingKind::from_wire(KIND, v.get_i32(KIND)?)?,
                count:    v.get_count(COUNT)?,
            }),
            InteractionKind::BoardingEnd => Interaction::BoardingEnd(BoardingEnd {
                ferry_id: v.get_str(FERRY_ID)?,
                station:  v.get_station(STATION_ID)?,
            }),
            InteractionKind::Departure => Interaction::Departure(Departure {
                ferry_id:    v.get_str(FERRY_ID)?,
                destination: v.get_station(DESTINATION)?,
            }),
            InteractionKind::StartSimulation => Interaction::StartSimulation(StartSimulation {
                station_count:  v.get_count(STATION_COUNT)?,
                ferry_capacity: v.get_count(FERRY_CAPACITY)?,
                arrivals:       decode_arrivals(v)?,
                end_trip_count: v.get_opt(END_TRIP_COUNT, ValueMap::get_count)?,
            }),
            InteractionKind::EndSimulation => Interaction::EndSimulation(EndSimulation {
                completed_trips: v.get_count(COMPLETED_TRIP_COUNT)?,
            }),
        })
    }
}

fn decode_arrivals(v: &ValueMap) -> DecodeResult<Option<ArrivalParams>> {
    if v.contains(UNITS_PER_STATION) {
        return Ok(Some(ArrivalParams::BulkFill {
            units_per_station: v.get_count(UNITS_PER_STATION)?,
            car_probability:   v.get_f64(CAR_PROBABILITY)?,
        }));
    }
    if v.contains(PERSON_PROBABILITY) {
        return Ok(Some(ArrivalParams::Continuous {
            person_probability: v.get_f64(PERSON_PROBABILITY)?,
            car_probability:    v.get_f64(CAR_PROBABILITY)?,
            max_people_queue:   v.get_count(MAX_PEOPLE_QUEUE)?,
            max_car_queue:      v.get_count(MAX_CAR_QUEUE)?,
        }));
    }
    Ok(None)
}

// ── Object attributes ─────────────────────────────────────────────────────────

/// Full attribute snapshot of the ferry object.
#[derive(Clone, Debug, PartialEq)]
pub struct FerryAttributes {
    pub ferry_id:      String,
    pub position:      StationId,
    pub boarding:      Option<BoardingKind>,
    pub boarded_count: u32,
    pub car_on_board:  bool,
    pub trip_count:    u32,
}

/// Queue lengths of one station.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StationAttributes {
    pub station: StationId,
    pub people:  u32,
    pub cars:    u32,
}

/// Tagged union of every attribute update.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeUpdate {
    Ferry(FerryAttributes),
    Station(StationAttributes),
}

impl AttributeUpdate {
    pub fn class(&self) -> ObjectClass {
        match self {
            AttributeUpdate::Ferry(_)   => ObjectClass::Ferry,
            AttributeUpdate::Station(_) => ObjectClass::Station,
        }
    }

    pub fn encode(&self) -> ValueMap {
        let mut v = ValueMap::new();
        match self {
            AttributeUpdate::Ferry(a) => {
                v.put_str(ID, &a.ferry_id)
                    .put_i32(POSITION, a.position.to_wire())
                    .put_i32(BOARDING_TYPE, BoardingKind::option_to_wire(a.boarding))
                    .put_count(BOARDED_COUNT, a.boarded_count)
                    .put_bool(CAR_PRESENT, a.car_on_board)
                    .put_count(TRIP_COUNT, a.trip_count);
            }
            AttributeUpdate::Station(a) => {
                v.put_i32(STATION_ID, a.station.to_wire())
                    .put_count(PEOPLE_QUEUE_LENGTH, a.people)
                    .put_count(CAR_QUEUE_LENGTH, a.cars);
            }
        }
        v
    }

    pub fn decode(class: ObjectClass, v: &ValueMap) -> DecodeResult<AttributeUpdate> {
        Ok(match class {
            ObjectClass::Ferry => AttributeUpdate::Ferry(FerryAttributes {
                ferry_id:      v.get_str(ID)?,
                position:      v.get_station(POSITION)?,
                boarding:      BoardingKind::option_from_wire(
                    BOARDING_TYPE,
                    v.get_i32(BOARDING_TYPE)?,
                )?,
                boarded_count: v.get_count(BOARDED_COUNT)?,
                car_on_board:  v.get_bool(CAR_PRESENT)?,
                trip_count:    v.get_count(TRIP_COUNT)?,
            }),
            ObjectClass::Station => AttributeUpdate::Station(StationAttributes {
                station: v.get_station(STATION_ID)?,
                people:  v.get_count(PEOPLE_QUEUE_LENGTH)?,
                cars:    v.get_count(CAR_QUEUE_LENGTH)?,
            }),
        })
    }
}
