//! Per-station accounting, kept for the whole run.

use fc_core::StationId;
use serde::Serialize;

/// Running totals for one queue (people or cars) of one station.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueueLedger {
    /// Units placed by the bulk fill.
    pub initial:   u32,
    /// Units added by continuous arrivals.
    pub arrived:   u32,
    /// Units removed by committed boardings.
    pub committed: u32,
    /// Units requested by committed boardings but not present.
    pub shortfall: u32,
    /// Queue length when the summary was taken.
    pub final_len: u32,
    /// Sum of waiting times of committed units.
    pub waited:    f64,
}

impl QueueLedger {
    /// `initial + arrived - final == committed`.
    pub fn is_conserved(&self) -> bool {
        u64::from(self.initial) + u64::from(self.arrived)
            == u64::from(self.final_len) + u64::from(self.committed)
    }

    /// Mean waiting time of committed units, `None` if nothing boarded.
    pub fn mean_wait(&self) -> Option<f64> {
        (self.committed > 0).then(|| self.waited / f64::from(self.committed))
    }
}

/// End-of-run view of one station.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct StationSummary {
    pub station: StationId,
    pub people:  QueueLedger,
    pub cars:    QueueLedger,
}

impl StationSummary {
    pub fn is_conserved(&self) -> bool {
        self.people.is_conserved() && self.cars.is_conserved()
    }

    pub fn is_empty(&self) -> bool {
        self.people.final_len == 0 && self.cars.final_len == 0
    }
}
