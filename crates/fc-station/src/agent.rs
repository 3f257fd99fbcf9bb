//! `StationAgent` — the station-side half of the boarding protocol.
//!
//! # Two-phase commit
//!
//! The ferry announces a boarding with `BoardingStart` (intent) and confirms
//! it with `BoardingEnd` (commit).  The two messages arrive at different
//! logical times, and anything may be delivered between them, so the agent
//! never touches a queue on intent:
//!
//! ```text
//! BoardingStart(s, kind, n)  ──► pending[s].push((kind, n))      queues untouched
//! BoardingEnd(s)             ──► for each pending[s]: remove ≤ n  (saturating)
//!                                pending[s].clear()
//! BoardingEnd(s) again       ──► pending[s] is empty: no-op
//! ```
//!
//! Every removal is recorded in the station's ledger so conservation can be
//! checked after the run.
//!
//! # Termination
//!
//! [`StationAgent::check_termination`] returns `true` exactly once per run:
//! when every queue is empty (bulk fill) or when the reflected trip count
//! reaches the configured threshold (continuous arrivals).  The agent holds
//! no bus handle; publishing the end signal is the federate's job.

use fc_bus::{ArrivalParams, BoardingKind, EndSimulation, StartSimulation, StationAttributes};
use fc_core::{FederateRng, LogicalTime, MAX_STATIONS, RngStream, StationId};
use tracing::{debug, info, warn};

use crate::arrival::{bulk_fill, Added, ContinuousArrivals};
use crate::queue::{EntityQueue, Passenger, Removal, Vehicle};
use crate::summary::{QueueLedger, StationSummary};
use crate::{StationError, StationResult};

// ── Station ───────────────────────────────────────────────────────────────────

/// Lifecycle of one station.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StationPhase {
    /// Not yet allocated.
    Uninitialized,
    /// Allocated and registered, waiting for the first fill.
    Filling,
    /// At least one unit is queued.
    Active,
    /// Both queues are empty.  Continuous arrivals can reactivate it.
    Drained,
}

/// One recorded, not yet committed, boarding intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingBoarding {
    pub kind:  BoardingKind,
    pub count: u32,
}

/// What one commit removed from a station.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Commit {
    pub people: Removal,
    pub cars:   Removal,
}

impl Commit {
    pub fn is_empty(&self) -> bool {
        self.people.removed == 0 && self.cars.removed == 0
    }
}

/// Queues, pending intents and ledger of one landing.
#[derive(Clone, Debug)]
pub struct Station {
    id:           StationId,
    phase:        StationPhase,
    people:       EntityQueue<Passenger>,
    cars:         EntityQueue<Vehicle>,
    pending:      Vec<PendingBoarding>,
    people_books: QueueLedger,
    car_books:    QueueLedger,
}

impl Station {
    fn new(id: StationId) -> Self {
        Self {
            id,
            phase:        StationPhase::Filling,
            people:       EntityQueue::new(),
            cars:         EntityQueue::new(),
            pending:      Vec::new(),
            people_books: QueueLedger::default(),
            car_books:    QueueLedger::default(),
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn phase(&self) -> StationPhase {
        self.phase
    }

    pub fn people(&self) -> u32 {
        self.people.len()
    }

    pub fn cars(&self) -> u32 {
        self.cars.len()
    }

    pub fn pending(&self) -> &[PendingBoarding] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.cars.is_empty()
    }

    pub fn attributes(&self) -> StationAttributes {
        StationAttributes { station: self.id, people: self.people(), cars: self.cars() }
    }

    pub fn summary(&self) -> StationSummary {
        StationSummary {
            station: self.id,
            people:  QueueLedger { final_len: self.people(), ..self.people_books },
            cars:    QueueLedger { final_len: self.cars(), ..self.car_books },
        }
    }

    fn refresh_phase(&mut self) {
        self.phase = if self.is_empty() { StationPhase::Drained } else { StationPhase::Active };
    }

    /// Apply every pending intent, then forget them.
    fn commit(&mut self, now: LogicalTime) -> Commit {
        let mut commit = Commit::default();
        for PendingBoarding { kind, count } in self.pending.drain(..) {
            let (removal, books, total) = match kind {
                BoardingKind::People => (
                    self.people.remove_front(count, now),
                    &mut self.people_books,
                    &mut commit.people,
                ),
                BoardingKind::Car => (
                    self.cars.remove_front(count, now),
                    &mut self.car_books,
                    &mut commit.cars,
                ),
            };
            books.committed += removal.removed;
            books.shortfall += removal.shortfall;
            books.waited += removal.waited;
            total.removed += removal.removed;
            total.shortfall += removal.shortfall;
            total.waited += removal.waited;
        }
        self.refresh_phase();
        commit
    }
}

// ── StationAgent ──────────────────────────────────────────────────────────────

/// Active arrival policy, fixed by the start signal.
#[derive(Copy, Clone, Debug, PartialEq)]
enum ArrivalMode {
    BulkFill { units: u32, car_probability: f64 },
    Continuous(ContinuousArrivals),
}

impl From<&ArrivalParams> for ArrivalMode {
    fn from(params: &ArrivalParams) -> Self {
        match *params {
            ArrivalParams::BulkFill { units_per_station, car_probability } => {
                ArrivalMode::BulkFill { units: units_per_station, car_probability }
            }
            ArrivalParams::Continuous {
                person_probability,
                car_probability,
                max_people_queue,
                max_car_queue,
            } => ArrivalMode::Continuous(ContinuousArrivals {
                person_probability,
                car_probability,
                max_people_queue,
                max_car_queue,
            }),
        }
    }
}

/// State of every station managed by one station federate.
///
/// All stations share one `started`/`finished` flag pair.
pub struct StationAgent {
    stations:       Vec<Station>,
    configured:     u32,
    mode:           Option<ArrivalMode>,
    started:        bool,
    finished:       bool,
    trip_count:     u32,
    end_trip_count: Option<u32>,
    rng:            FederateRng,
}

impl StationAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            stations:       Vec::new(),
            configured:     0,
            mode:           None,
            started:        false,
            finished:       false,
            trip_count:     0,
            end_trip_count: None,
            rng:            FederateRng::new(seed, RngStream::Station),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_initialized(&self) -> bool {
        !self.stations.is_empty()
    }

    /// Station count carried by the start signal.
    pub fn configured_stations(&self) -> u32 {
        self.configured
    }

    /// Last reflected ferry trip count.
    pub fn trip_count(&self) -> u32 {
        self.trip_count
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    /// Phase of `id`; stations that were never allocated are `Uninitialized`.
    pub fn phase(&self, id: StationId) -> StationPhase {
        self.station(id).map_or(StationPhase::Uninitialized, Station::phase)
    }

    /// `true` when continuous arrivals run every tick.
    pub fn has_continuous_arrivals(&self) -> bool {
        matches!(self.mode, Some(ArrivalMode::Continuous(_)))
    }

    // ── Start and initialization ──────────────────────────────────────────

    /// Accept the start signal.
    pub fn start(&mut self, signal: &StartSimulation) -> StationResult<()> {
        if self.started {
            return Err(StationError::AlreadyStarted);
        }
        let stations = signal.station_count;
        if stations == 0 || stations > MAX_STATIONS || signal.ferry_capacity == 0 {
            return Err(StationError::InvalidStart { stations, capacity: signal.ferry_capacity });
        }
        let arrivals = signal.arrivals.as_ref().ok_or(StationError::MissingArrivals)?;
        self.mode = Some(ArrivalMode::from(arrivals));
        self.configured = signal.station_count;
        self.end_trip_count = signal.end_trip_count;
        self.started = true;
        info!(
            stations = signal.station_count,
            continuous = self.has_continuous_arrivals(),
            "station agent received start signal"
        );
        Ok(())
    }

    /// Allocate one empty queue pair per station and return their ids.
    pub fn initialize(&mut self, station_count: u32) -> Vec<StationId> {
        self.stations = (0..station_count).map(|i| Station::new(StationId(i))).collect();
        self.stations.iter().map(Station::id).collect()
    }

    /// Populate the queues according to the arrival policy.
    ///
    /// Bulk fill places every unit now; continuous arrivals start empty and
    /// fill tick by tick.
    pub fn fill(&mut self, now: LogicalTime) -> StationResult<()> {
        let mode = self.mode.ok_or(StationError::NotStarted { operation: "fill" })?;
        for station in &mut self.stations {
            if let ArrivalMode::BulkFill { units, car_probability } = mode {
                let Added { people, cars } = bulk_fill(
                    &mut station.people,
                    &mut station.cars,
                    units,
                    car_probability,
                    &mut self.rng,
                    now,
                );
                station.people_books.initial += people;
                station.car_books.initial += cars;
                info!(station = %station.id, people, cars, "station filled");
            }
            station.refresh_phase();
        }
        Ok(())
    }

    /// One tick of continuous arrivals.  No-op under bulk fill.
    pub fn tick_arrivals(&mut self, now: LogicalTime) {
        let Some(ArrivalMode::Continuous(policy)) = self.mode else {
            return;
        };
        for station in &mut self.stations {
            let added = policy.tick(&mut station.people, &mut station.cars, &mut self.rng, now);
            station.people_books.arrived += added.people;
            station.car_books.arrived += added.cars;
            if added != Added::default() {
                station.refresh_phase();
            }
        }
    }

    // ── Boarding protocol ─────────────────────────────────────────────────

    fn station_mut(&mut self, operation: &'static str, id: StationId) -> StationResult<&mut Station> {
        if self.stations.is_empty() {
            return Err(StationError::NotStarted { operation });
        }
        self.stations
            .get_mut(id.index())
            .ok_or(StationError::UnknownStation { operation, station: id })
    }

    /// Record a boarding intent.  The queue is not touched.
    pub fn on_boarding_intent(
        &mut self,
        id: StationId,
        kind: BoardingKind,
        count: u32,
    ) -> StationResult<()> {
        let station = self.station_mut("boarding_intent", id)?;
        station.pending.push(PendingBoarding { kind, count });
        debug!(station = %id, ?kind, count, pending = station.pending.len(), "boarding intent recorded");
        Ok(())
    }

    /// Commit every pending intent of `id`.
    ///
    /// Without pending intents this is a no-op returning an empty commit.
    pub fn on_boarding_complete(&mut self, id: StationId, now: LogicalTime) -> StationResult<Commit> {
        let station = self.station_mut("boarding_complete", id)?;
        if station.pending.is_empty() {
            debug!(station = %id, "boarding commit without pending intent");
            return Ok(Commit::default());
        }
        let commit = station.commit(now);
        let shortfall = commit.people.shortfall + commit.cars.shortfall;
        if shortfall > 0 {
            warn!(
                station = %id,
                people = commit.people.removed,
                cars = commit.cars.removed,
                shortfall,
                "boarding commit exceeded queue length"
            );
        } else {
            debug!(
                station = %id,
                people = commit.people.removed,
                cars = commit.cars.removed,
                "boarding committed"
            );
        }
        Ok(commit)
    }

    // ── State publication and termination ─────────────────────────────────

    /// Current queue lengths of every station.
    pub fn snapshots(&self) -> impl Iterator<Item = StationAttributes> + '_ {
        self.stations.iter().map(Station::attributes)
    }

    /// `true` when at least one station exists and every queue is empty.
    pub fn all_queues_empty(&self) -> bool {
        self.is_initialized() && self.stations.iter().all(Station::is_empty)
    }

    /// Cache the ferry's reflected trip count.
    pub fn on_trip_count_update(&mut self, trips: u32) {
        self.trip_count = trips;
        debug!(trips, "trip count reflected");
    }

    fn end_condition_met(&self) -> bool {
        match self.mode {
            Some(ArrivalMode::BulkFill { .. }) => self.all_queues_empty(),
            Some(ArrivalMode::Continuous(_)) => {
                self.end_trip_count.is_some_and(|limit| self.trip_count >= limit)
            }
            None => false,
        }
    }

    /// Decide whether the run is over.  Returns `true` at most once.
    pub fn check_termination(&mut self) -> bool {
        if self.finished || !self.end_condition_met() {
            return false;
        }
        self.finished = true;
        info!(trips = self.trip_count, "end condition reached");
        true
    }

    /// End-of-run signal carrying the latest reflected trip count.
    pub fn end_signal(&self) -> EndSimulation {
        EndSimulation { completed_trips: self.trip_count }
    }

    pub fn summaries(&self) -> Vec<StationSummary> {
        self.stations.iter().map(Station::summary).collect()
    }
}
