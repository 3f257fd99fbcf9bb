//! `Ferry` — the singleton vessel state, mutated only by its own federate.

use fc_bus::{BoardingKind, FerryAttributes};
use fc_core::StationId;

use crate::{Boarding, FerryError, FerryResult};

/// Position, trip count and the boarding of the current stop.
#[derive(Clone, Debug)]
pub struct Ferry {
    id:            String,
    position:      StationId,
    trip_count:    u32,
    capacity:      u32,
    station_count: u32,
    boarding:      Option<Boarding>,
}

impl Ferry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id:            id.into(),
            position:      StationId(0),
            trip_count:    0,
            capacity:      0,
            station_count: 0,
            boarding:      None,
        }
    }

    /// Reset for a new run over `station_count` stations.
    pub fn configure(&mut self, station_count: u32, capacity: u32) -> FerryResult<()> {
        if station_count == 0 || capacity == 0 {
            return Err(FerryError::InvalidStart { stations: station_count, capacity });
        }
        self.station_count = station_count;
        self.capacity = capacity;
        self.position = StationId(0);
        self.trip_count = 0;
        self.boarding = None;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> StationId {
        self.position
    }

    pub fn trip_count(&self) -> u32 {
        self.trip_count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn station_count(&self) -> u32 {
        self.station_count
    }

    pub fn boarding(&self) -> Option<Boarding> {
        self.boarding
    }

    /// The station after the current one, wrapping around.
    pub fn next_station(&self) -> StationId {
        StationId((self.position.0 + 1) % self.station_count.max(1))
    }

    /// Record what the current stop boards (or clear it with `None`).
    pub fn set_boarding(&mut self, boarding: Option<Boarding>) {
        self.boarding = boarding;
    }

    /// Complete one leg: move to the next station and count the trip.
    ///
    /// Returns the new position.
    pub fn depart(&mut self) -> StationId {
        self.position = self.next_station();
        self.trip_count += 1;
        self.boarding = None;
        self.position
    }

    /// Full attribute snapshot for publication.
    pub fn attributes(&self) -> FerryAttributes {
        FerryAttributes {
            ferry_id:      self.id.clone(),
            position:      self.position,
            boarding:      self.boarding.map(|b| b.kind),
            boarded_count: self.boarding.map_or(0, |b| b.count),
            car_on_board:  self.boarding.is_some_and(|b| b.kind == BoardingKind::Car),
            trip_count:    self.trip_count,
        }
    }
}
