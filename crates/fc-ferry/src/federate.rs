//! `FerryFederate` — the arrive, board, depart cycle as a state machine.
//!
//! Each call to `step` runs one segment of the cycle at a granted time and
//! returns the advance that ends it:
//!
//! | Phase        | Sends                                         | Then advances by |
//! |--------------|-----------------------------------------------|------------------|
//! | `Idle`       | nothing until `StartSimulation` arrives       | `poll`           |
//! | `Arriving`   | `Arrival(position)`                           | `docking`        |
//! | `Boarding`   | `BoardingStart` (intent), if the policy boards | `loading`       |
//! | `Committing` | ferry attributes, `BoardingEnd` (commit)      | `settling`       |
//! | `Departing`  | `Departure(next)`, ferry attributes           | `sailing`        |
//!
//! A stop where the policy boards nothing goes straight from `Boarding` to
//! `Departing`.  `EndSimulation` clears the running flag; it is checked on
//! arrival, before boarding and before departing, so no new stop or intent
//! starts after the end signal has been seen.  An intent already sent is
//! still committed.

use std::any::Any;

use fc_bus::{
    Arrival, AttributeUpdate, BoardingEnd, BoardingKind, BoardingStart, BusResult, Declarations,
    Delivery, Departure, Federate, Interaction, InteractionKind, Message, ObjectClass, Rti, Step,
};
use fc_core::{CrossingConfig, FederateRng, FerryTimings, ObjectId, RngStream, StationId};
use tracing::{debug, info, warn};

use crate::{Boarding, BoardingPolicy, Ferry, FerryError, FerrySummary, PriorityPolicy, QueueView};

#[cfg(feature = "fx-hash")]
type StationView = rustc_hash::FxHashMap<StationId, QueueView>;
#[cfg(not(feature = "fx-hash"))]
type StationView = std::collections::HashMap<StationId, QueueView>;

/// Where the ferry is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FerryPhase {
    Idle,
    Arriving,
    Boarding,
    Committing,
    Departing,
    Finished,
}

pub struct FerryFederate {
    name:    String,
    ferry:   Ferry,
    phase:   FerryPhase,
    policy:  Box<dyn BoardingPolicy>,
    rng:     FederateRng,
    timings: FerryTimings,
    poll:    f64,
    object:  Option<ObjectId>,
    view:    StationView,
    started: bool,
    running: bool,
    summary: FerrySummary,
}

impl FerryFederate {
    pub fn new(seed: u64, timings: FerryTimings, poll: f64) -> Self {
        let ferry = Ferry::new("Ferry-1");
        Self {
            name:    "Ferry".to_owned(),
            summary: FerrySummary { ferry_id: ferry.id().to_owned(), ..FerrySummary::default() },
            ferry,
            phase:   FerryPhase::Idle,
            policy:  Box::new(PriorityPolicy),
            rng:     FederateRng::new(seed, RngStream::Ferry),
            timings,
            poll,
            object:  None,
            view:    StationView::default(),
            started: false,
            running: false,
        }
    }

    pub fn from_config(config: &CrossingConfig) -> Self {
        Self::new(config.seed, config.timings.clone(), config.station_tick)
    }

    /// Replace the default priority policy.
    pub fn with_policy(mut self, policy: impl BoardingPolicy) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn ferry(&self) -> &Ferry {
        &self.ferry
    }

    pub fn phase(&self) -> FerryPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last reflected queue lengths of `station`.
    pub fn view(&self, station: StationId) -> QueueView {
        self.view.get(&station).copied().unwrap_or_default()
    }

    pub fn summary(&self) -> FerrySummary {
        FerrySummary {
            trips: self.ferry.trip_count(),
            final_position: self.ferry.position(),
            ..self.summary.clone()
        }
    }

    // ── Callbacks ─────────────────────────────────────────────────────────

    fn on_start(&mut self, station_count: u32, capacity: u32) -> Result<(), FerryError> {
        if self.started {
            return Err(FerryError::AlreadyStarted);
        }
        self.ferry.configure(station_count, capacity)?;
        self.view.clear();
        self.started = true;
        self.running = true;
        info!(federate = %self.name, stations = station_count, capacity, "ferry received start signal");
        Ok(())
    }

    fn on_station_state(&mut self, station: StationId, view: QueueView) -> Result<(), FerryError> {
        let stations = self.ferry.station_count();
        if self.started && station.0 >= stations {
            return Err(FerryError::UnknownStation { station, stations });
        }
        self.view.insert(station, view);
        Ok(())
    }

    // ── Cycle segments ────────────────────────────────────────────────────

    fn publish_attributes(&self, rti: &mut dyn Rti) -> BusResult<()> {
        match self.object {
            Some(object) => {
                rti.update_attributes(object, &AttributeUpdate::Ferry(self.ferry.attributes()))
            }
            None => Ok(()),
        }
    }

    fn finish(&mut self, rti: &dyn Rti) -> Step {
        info!(
            federate = %self.name,
            trips = self.ferry.trip_count(),
            time = %rti.time(),
            "ferry leaving the federation"
        );
        self.phase = FerryPhase::Finished;
        Step::Resign
    }

    fn arrive(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        if !self.running {
            return Ok(self.finish(rti));
        }
        let station = self.ferry.position();
        rti.send_interaction(&Interaction::Arrival(Arrival {
            ferry_id: self.ferry.id().to_owned(),
            station,
        }))?;
        debug!(federate = %self.name, %station, time = %rti.time(), "arrived");
        self.phase = FerryPhase::Boarding;
        Ok(Step::Advance(self.timings.docking))
    }

    fn board(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        if !self.running {
            return Ok(self.finish(rti));
        }
        let station = self.ferry.position();
        let view = self.view(station);
        let Some(boarding) = self.policy.decide(view, self.ferry.capacity(), &mut self.rng) else {
            debug!(federate = %self.name, %station, "nothing to board");
            self.summary.empty_stops += 1;
            return self.depart(rti);
        };
        rti.send_interaction(&Interaction::BoardingStart(BoardingStart {
            ferry_id: self.ferry.id().to_owned(),
            station,
            kind:     boarding.kind,
            count:    boarding.count,
        }))?;
        info!(
            federate = %self.name,
            %station,
            kind = ?boarding.kind,
            count = boarding.count,
            time = %rti.time(),
            "boarding started"
        );
        self.ferry.set_boarding(Some(boarding));
        self.phase = FerryPhase::Committing;
        Ok(Step::Advance(self.timings.loading))
    }

    fn commit(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        self.publish_attributes(rti)?;
        let station = self.ferry.position();
        rti.send_interaction(&Interaction::BoardingEnd(BoardingEnd {
            ferry_id: self.ferry.id().to_owned(),
            station,
        }))?;
        if let Some(Boarding { kind, count }) = self.ferry.boarding() {
            match kind {
                BoardingKind::People => self.summary.people_carried += u64::from(count),
                BoardingKind::Car => self.summary.cars_carried += u64::from(count),
            }
        }
        self.phase = FerryPhase::Departing;
        Ok(Step::Advance(self.timings.settling))
    }

    fn depart(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        if !self.running {
            return Ok(self.finish(rti));
        }
        let destination = self.ferry.next_station();
        rti.send_interaction(&Interaction::Departure(Departure {
            ferry_id: self.ferry.id().to_owned(),
            destination,
        }))?;
        self.ferry.depart();
        self.publish_attributes(rti)?;
        debug!(
            federate = %self.name,
            %destination,
            trips = self.ferry.trip_count(),
            time = %rti.time(),
            "departed"
        );
        self.phase = FerryPhase::Arriving;
        Ok(Step::Advance(self.timings.sailing))
    }
}

impl Federate for FerryFederate {
    fn name(&self) -> &str {
        &self.name
    }

    fn declarations(&self) -> Declarations {
        Declarations::new()
            .publish(ObjectClass::Ferry)
            .publish(InteractionKind::Arrival)
            .publish(InteractionKind::BoardingStart)
            .publish(InteractionKind::BoardingEnd)
            .publish(InteractionKind::Departure)
            .subscribe(InteractionKind::StartSimulation)
            .subscribe(InteractionKind::EndSimulation)
            .subscribe(ObjectClass::Station)
    }

    fn discover(&mut self, object: ObjectId, class: ObjectClass, name: &str) {
        debug!(federate = %self.name, %object, class = class.class_name(), name, "discovered");
    }

    fn receive(&mut self, delivery: &Delivery) {
        let Some(message) = delivery.decode_or_discard(&self.name) else {
            return;
        };
        let result = match message {
            Message::Interaction(Interaction::StartSimulation(start)) => {
                self.on_start(start.station_count, start.ferry_capacity)
            }
            Message::Interaction(Interaction::EndSimulation(end)) => {
                info!(
                    federate = %self.name,
                    trips = end.completed_trips,
                    time = %delivery.time,
                    "end of run received"
                );
                self.summary.reported_trips = Some(end.completed_trips);
                self.running = false;
                Ok(())
            }
            Message::Reflection { update: AttributeUpdate::Station(s), .. } => {
                self.on_station_state(s.station, QueueView { people: s.people, cars: s.cars })
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!(federate = %self.name, kind = %delivery.kind, time = %delivery.time, "message ignored: {e}");
        }
    }

    fn step(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        match self.phase {
            FerryPhase::Idle => {
                if self.object.is_none() {
                    self.object = Some(rti.register_object(ObjectClass::Ferry, self.ferry.id())?);
                }
                if !self.started {
                    return Ok(Step::Advance(self.poll));
                }
                self.arrive(rti)
            }
            FerryPhase::Arriving => self.arrive(rti),
            FerryPhase::Boarding => self.board(rti),
            FerryPhase::Committing => self.commit(rti),
            FerryPhase::Departing => self.depart(rti),
            FerryPhase::Finished => Ok(Step::Resign),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
