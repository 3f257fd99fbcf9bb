//! `RunReport` — what a finished crossing run leaves behind.

use fc_core::LogicalTime;
use fc_ferry::{FerryFederate, FerrySummary};
use fc_station::{StationFederate, StationSummary};
use serde::Serialize;

use crate::{ControllerFederate, Federation, SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub seed:            u64,
    pub final_time:      LogicalTime,
    /// Trip count carried by `EndSimulation`, as recorded by the controller.
    pub completed_trips: Option<u32>,
    pub stations:        Vec<StationSummary>,
    pub ferry:           FerrySummary,
}

impl RunReport {
    /// Collect the summaries of a finished crossing federation.
    pub fn collect(federation: &Federation, seed: u64) -> SimResult<Self> {
        let station = federation
            .find::<StationFederate>()
            .ok_or(SimError::MissingFederate { what: "station" })?;
        let ferry = federation
            .find::<FerryFederate>()
            .ok_or(SimError::MissingFederate { what: "ferry" })?;
        let completed_trips = federation
            .find::<ControllerFederate>()
            .and_then(ControllerFederate::completed_trips);
        Ok(Self {
            seed,
            final_time: federation.now(),
            completed_trips,
            stations: station.summaries(),
            ferry: ferry.summary(),
        })
    }

    /// `true` when every station's books balance.
    pub fn is_conserved(&self) -> bool {
        self.stations.iter().all(StationSummary::is_conserved)
    }

    /// `true` when every queue ended empty.
    pub fn all_queues_empty(&self) -> bool {
        self.stations.iter().all(StationSummary::is_empty)
    }

    pub fn people_committed(&self) -> u64 {
        self.stations.iter().map(|s| u64::from(s.people.committed)).sum()
    }

    pub fn cars_committed(&self) -> u64 {
        self.stations.iter().map(|s| u64::from(s.cars.committed)).sum()
    }
}
