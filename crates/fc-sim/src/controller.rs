//! `ControllerFederate` — issues the start signal and records the result.

use std::any::Any;

use fc_bus::{
    BusResult, Declarations, Delivery, Federate, Interaction, InteractionKind, Message, Rti,
    StartSimulation, Step,
};
use fc_core::CrossingConfig;
use tracing::info;

pub struct ControllerFederate {
    name:            String,
    start:           StartSimulation,
    poll:            f64,
    sent:            bool,
    completed_trips: Option<u32>,
}

impl ControllerFederate {
    pub fn new(start: StartSimulation, poll: f64) -> Self {
        Self { name: "Controller".to_owned(), start, poll, sent: false, completed_trips: None }
    }

    pub fn from_config(config: &CrossingConfig) -> Self {
        Self::new(StartSimulation::from_config(config), config.station_tick)
    }

    /// Trip count carried by the end-of-run signal, once received.
    pub fn completed_trips(&self) -> Option<u32> {
        self.completed_trips
    }
}

impl Federate for ControllerFederate {
    fn name(&self) -> &str {
        &self.name
    }

    fn declarations(&self) -> Declarations {
        Declarations::new()
            .publish(InteractionKind::StartSimulation)
            .subscribe(InteractionKind::EndSimulation)
    }

    fn receive(&mut self, delivery: &Delivery) {
        if let Some(Message::Interaction(Interaction::EndSimulation(end))) =
            delivery.decode_or_discard(&self.name)
        {
            info!(trips = end.completed_trips, time = %delivery.time, "run completed");
            self.completed_trips = Some(end.completed_trips);
        }
    }

    fn step(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        if !self.sent {
            rti.send_interaction(&Interaction::StartSimulation(self.start.clone()))?;
            self.sent = true;
            info!(
                stations = self.start.station_count,
                capacity = self.start.ferry_capacity,
                time = %rti.stamp(),
                "start signal sent"
            );
        }
        if self.completed_trips.is_some() {
            return Ok(Step::Resign);
        }
        Ok(Step::Advance(self.poll))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
