//! `StationFederate` — runs the `StationAgent` on the bus.
//!
//! ```text
//!  AwaitingStart ──start──► Running ──end condition──► Settling ──► Finished
//!       │ advance(tick)       │ publish, advance(tick)     │ advance(settle), then EndSimulation
//! ```
//!
//! On the first grant after the start signal the federate allocates the
//! stations, registers one `Station` object per station and fills the
//! queues, then runs its first tick.  Every tick publishes the queue lengths
//! once.

use std::any::Any;

use fc_bus::{
    AttributeUpdate, BusResult, Declarations, Delivery, Federate, Interaction, InteractionKind,
    Message, ObjectClass, Rti, Step,
};
use fc_core::{CrossingConfig, ObjectId};
use tracing::{info, warn};

use crate::{StationAgent, StationSummary};

/// Where the station federate is in its main loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StationLoop {
    AwaitingStart,
    Running,
    Settling,
    Finished,
}

pub struct StationFederate {
    name:    String,
    agent:   StationAgent,
    state:   StationLoop,
    objects: Vec<ObjectId>,
    tick:    f64,
    settle:  f64,
}

impl StationFederate {
    pub fn new(seed: u64, tick: f64, settle: f64) -> Self {
        Self {
            name:    "Station".to_owned(),
            agent:   StationAgent::new(seed),
            state:   StationLoop::AwaitingStart,
            objects: Vec::new(),
            tick,
            settle,
        }
    }

    pub fn from_config(config: &CrossingConfig) -> Self {
        Self::new(config.seed, config.station_tick, config.termination_settle_time)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn agent(&self) -> &StationAgent {
        &self.agent
    }

    pub fn state(&self) -> StationLoop {
        self.state
    }

    pub fn summaries(&self) -> Vec<StationSummary> {
        self.agent.summaries()
    }

    fn begin(&mut self, rti: &mut dyn Rti) -> BusResult<()> {
        let ids = self.agent.initialize(self.agent.configured_stations());
        for id in ids {
            let object = rti.register_object(ObjectClass::Station, &format!("Station{}", id.0))?;
            self.objects.push(object);
        }
        if let Err(e) = self.agent.fill(rti.time()) {
            warn!(federate = %self.name, "fill skipped: {e}");
        }
        info!(federate = %self.name, stations = self.objects.len(), time = %rti.time(), "stations initialized");
        Ok(())
    }

    fn publish_state(&self, rti: &mut dyn Rti) -> BusResult<()> {
        for (object, attrs) in self.objects.iter().zip(self.agent.snapshots()) {
            rti.update_attributes(*object, &AttributeUpdate::Station(attrs))?;
        }
        Ok(())
    }

    fn run_tick(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        self.agent.tick_arrivals(rti.time());
        self.publish_state(rti)?;
        if self.agent.check_termination() {
            info!(federate = %self.name, time = %rti.time(), "queues settled, ending run");
            self.state = StationLoop::Settling;
            return Ok(Step::Advance(self.settle));
        }
        Ok(Step::Advance(self.tick))
    }
}

impl Federate for StationFederate {
    fn name(&self) -> &str {
        &self.name
    }

    fn declarations(&self) -> Declarations {
        Declarations::new()
            .publish(ObjectClass::Station)
            .publish(InteractionKind::EndSimulation)
            .subscribe(InteractionKind::StartSimulation)
            .subscribe(InteractionKind::BoardingStart)
            .subscribe(InteractionKind::BoardingEnd)
            .subscribe(ObjectClass::Ferry)
    }

    fn receive(&mut self, delivery: &Delivery) {
        let Some(message) = delivery.decode_or_discard(&self.name) else {
            return;
        };
        let result = match message {
            Message::Interaction(Interaction::StartSimulation(start)) => self.agent.start(&start),
            Message::Interaction(Interaction::BoardingStart(b)) => {
                self.agent.on_boarding_intent(b.station, b.kind, b.count)
            }
            Message::Interaction(Interaction::BoardingEnd(e)) => {
                self.agent.on_boarding_complete(e.station, delivery.time).map(|_| ())
            }
            Message::Reflection { update: AttributeUpdate::Ferry(ferry), .. } => {
                self.agent.on_trip_count_update(ferry.trip_count);
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!(federate = %self.name, kind = %delivery.kind, time = %delivery.time, "message ignored: {e}");
        }
    }

    fn step(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        match self.state {
            StationLoop::AwaitingStart => {
                if !self.agent.is_started() {
                    return Ok(Step::Advance(self.tick));
                }
                self.begin(rti)?;
                self.state = StationLoop::Running;
                self.run_tick(rti)
            }
            StationLoop::Running => self.run_tick(rti),
            StationLoop::Settling => {
                let end = self.agent.end_signal();
                info!(federate = %self.name, trips = end.completed_trips, time = %rti.time(), "sending end of run");
                rti.send_interaction(&Interaction::EndSimulation(end))?;
                self.state = StationLoop::Finished;
                Ok(Step::Resign)
            }
            StationLoop::Finished => Ok(Step::Resign),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
