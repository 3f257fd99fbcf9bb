//! Integration tests for fc-sim: time management, routing and whole runs.

use std::any::Any;

use fc_bus::{
    AttributeUpdate, BusError, BusResult, Declarations, Delivery, EndSimulation, Federate,
    Interaction, InteractionKind, MessageKind, ObjectClass, Rti, StationAttributes, Step,
};
use fc_core::{ArrivalPolicy, CrossingConfig, LogicalTime, ObjectId, StationId};

use crate::{FederationBuilder, NoopObserver, SimError, TraceObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Script = Box<dyn FnMut(usize, &mut dyn Rti) -> BusResult<Step>>;

/// Scripted federate that records everything it sees.
struct Probe {
    name:       String,
    decl:       Declarations,
    script:     Script,
    steps:      usize,
    step_times: Vec<f64>,
    received:   Vec<(f64, MessageKind, u32)>,
    discovered: Vec<(ObjectId, ObjectClass, String)>,
}

impl Probe {
    fn new(
        name: &str,
        decl: Declarations,
        script: impl FnMut(usize, &mut dyn Rti) -> BusResult<Step> + 'static,
    ) -> Self {
        Self {
            name:       name.to_owned(),
            decl,
            script:     Box::new(script),
            steps:      0,
            step_times: Vec::new(),
            received:   Vec::new(),
            discovered: Vec::new(),
        }
    }
}

impl Federate for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn declarations(&self) -> Declarations {
        self.decl.clone()
    }

    fn discover(&mut self, object: ObjectId, class: ObjectClass, name: &str) {
        self.discovered.push((object, class, name.to_owned()));
    }

    fn receive(&mut self, delivery: &Delivery) {
        self.received.push((delivery.time.value(), delivery.kind, delivery.sender.0));
    }

    fn step(&mut self, rti: &mut dyn Rti) -> BusResult<Step> {
        self.step_times.push(rti.time().value());
        let step = (self.script)(self.steps, rti);
        self.steps += 1;
        step
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn end(trips: u32) -> Interaction {
    Interaction::EndSimulation(EndSimulation { completed_trips: trips })
}

/// Advance by `delta` for `n` steps, then resign.
fn ticker(n: usize, delta: f64) -> impl FnMut(usize, &mut dyn Rti) -> BusResult<Step> {
    move |i, _| Ok(if i < n { Step::Advance(delta) } else { Step::Resign })
}

fn bulk_config(seed: u64) -> CrossingConfig {
    CrossingConfig {
        station_count:  3,
        ferry_capacity: 10,
        arrival:        ArrivalPolicy::BulkFill { units_per_station: 50, car_probability: 0.10 },
        seed,
        ..CrossingConfig::default()
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn rejects_empty_federation() {
        assert!(matches!(FederationBuilder::new(1.0).build(), Err(SimError::Setup(_))));
    }

    #[test]
    fn rejects_non_positive_lookahead() {
        let result = FederationBuilder::new(0.0)
            .join(Probe::new("a", Declarations::new(), ticker(0, 1.0)))
            .build();
        assert!(matches!(result, Err(SimError::Setup(_))));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = FederationBuilder::new(1.0)
            .join(Probe::new("a", Declarations::new(), ticker(0, 1.0)))
            .join(Probe::new("a", Declarations::new(), ticker(0, 1.0)))
            .build();
        assert!(matches!(result, Err(SimError::Setup(_))));
    }

    #[test]
    fn crossing_rejects_invalid_config() {
        let config = CrossingConfig { station_count: 0, ..CrossingConfig::default() };
        assert!(matches!(FederationBuilder::crossing(&config), Err(SimError::Config(_))));
    }
}

// ── Time management and routing ───────────────────────────────────────────────

#[cfg(test)]
mod federation_tests {
    use super::*;

    fn sender_decl() -> Declarations {
        Declarations::new().publish(InteractionKind::EndSimulation)
    }

    fn receiver_decl() -> Declarations {
        Declarations::new().subscribe(InteractionKind::EndSimulation)
    }

    #[test]
    fn messages_arrive_at_stamp_not_before() {
        let sender = Probe::new("sender", sender_decl(), |i, rti| {
            if i == 0 {
                rti.send_interaction(&end(1))?;
            }
            Ok(if i < 3 { Step::Advance(1.0) } else { Step::Resign })
        });
        let receiver = Probe::new("receiver", receiver_decl(), ticker(6, 0.25));

        let mut fed = FederationBuilder::new(1.0).join(sender).join(receiver).build().unwrap();
        fed.run(&mut NoopObserver).unwrap();

        let probe = fed.federate::<Probe>("receiver").unwrap();
        assert_eq!(probe.received, vec![(1.0, MessageKind::Interaction(InteractionKind::EndSimulation), 0u32)]);
        assert_eq!(probe.step_times, vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5]);
        assert!(fed.is_finished());
    }

    #[test]
    fn own_messages_are_not_delivered_back() {
        let decl = sender_decl().subscribe(InteractionKind::EndSimulation);
        let echo = Probe::new("echo", decl, |i, rti| {
            if i == 0 {
                rti.send_interaction(&end(1))?;
            }
            Ok(if i < 3 { Step::Advance(1.0) } else { Step::Resign })
        });
        let mut fed = FederationBuilder::new(1.0).join(echo).build().unwrap();
        fed.run(&mut NoopObserver).unwrap();
        assert!(fed.federate::<Probe>("echo").unwrap().received.is_empty());
    }

    #[test]
    fn unsubscribed_federates_receive_nothing() {
        let sender = Probe::new("sender", sender_decl(), |i, rti| {
            if i == 0 {
                rti.send_interaction(&end(1))?;
            }
            Ok(if i < 2 { Step::Advance(1.0) } else { Step::Resign })
        });
        let bystander = Probe::new("bystander", Declarations::new(), ticker(3, 1.0));
        let mut fed = FederationBuilder::new(1.0).join(sender).join(bystander).build().unwrap();
        fed.run(&mut NoopObserver).unwrap();
        assert!(fed.federate::<Probe>("bystander").unwrap().received.is_empty());
    }

    #[test]
    fn equal_stamps_keep_send_order_across_senders() {
        let a = Probe::new("a", sender_decl(), |i, rti| {
            if i == 0 {
                rti.send_interaction(&end(1))?;
            }
            Ok(if i < 1 { Step::Advance(1.0) } else { Step::Resign })
        });
        let b = Probe::new("b", sender_decl(), |i, rti| {
            if i == 0 {
                rti.send_interaction(&end(2))?;
            }
            Ok(if i < 1 { Step::Advance(1.0) } else { Step::Resign })
        });
        let receiver = Probe::new("receiver", receiver_decl(), ticker(2, 1.0));
        let mut fed =
            FederationBuilder::new(1.0).join(a).join(b).join(receiver).build().unwrap();
        fed.run(&mut NoopObserver).unwrap();

        let senders: Vec<u32> =
            fed.federate::<Probe>("receiver").unwrap().received.iter().map(|r| r.2).collect();
        assert_eq!(senders, vec![0, 1]);
    }

    #[test]
    fn first_reflection_triggers_discovery() {
        let owner_decl = Declarations::new().publish(ObjectClass::Station);
        let owner = Probe::new("owner", owner_decl, |i, rti| {
            if i == 0 {
                let object = rti.register_object(ObjectClass::Station, "Station0")?;
                for people in [3, 2] {
                    let attrs = StationAttributes { station: StationId(0), people, cars: 0 };
                    rti.update_attributes(object, &AttributeUpdate::Station(attrs))?;
                }
            }
            Ok(if i < 1 { Step::Advance(1.0) } else { Step::Resign })
        });
        let watcher =
            Probe::new("watcher", Declarations::new().subscribe(ObjectClass::Station), ticker(2, 1.0));
        let mut fed = FederationBuilder::new(1.0).join(owner).join(watcher).build().unwrap();
        fed.run(&mut NoopObserver).unwrap();

        let probe = fed.federate::<Probe>("watcher").unwrap();
        assert_eq!(probe.discovered, vec![(ObjectId(0), ObjectClass::Station, "Station0".to_owned())]);
        assert_eq!(probe.received.len(), 2);
        assert_eq!(fed.object_count(), 1);
    }

    #[test]
    fn undeclared_publish_is_fatal() {
        let rogue = Probe::new("rogue", Declarations::new(), |_, rti| {
            rti.send_interaction(&end(0))?;
            Ok(Step::Resign)
        });
        let mut fed = FederationBuilder::new(1.0).join(rogue).build().unwrap();
        match fed.run(&mut NoopObserver) {
            Err(SimError::Federate { federate, operation, source }) => {
                assert_eq!(federate, "rogue");
                assert_eq!(operation, "send_interaction");
                assert!(matches!(source, BusError::NotPublished { .. }));
            }
            other => panic!("expected a fatal federate error, got {other:?}"),
        }
    }

    #[test]
    fn updating_unowned_object_is_fatal() {
        let decl = Declarations::new().publish(ObjectClass::Station);
        let rogue = Probe::new("rogue", decl, |_, rti| {
            let attrs = StationAttributes { station: StationId(0), people: 0, cars: 0 };
            rti.update_attributes(ObjectId(7), &AttributeUpdate::Station(attrs))?;
            Ok(Step::Resign)
        });
        let mut fed = FederationBuilder::new(1.0).join(rogue).build().unwrap();
        let err = fed.run(&mut NoopObserver).unwrap_err();
        assert_eq!(err.operation(), Some("update_attributes"));
    }

    #[test]
    fn negative_advance_is_fatal() {
        let rogue = Probe::new("rogue", Declarations::new(), |_, _| Ok(Step::Advance(-1.0)));
        let mut fed = FederationBuilder::new(1.0).join(rogue).build().unwrap();
        let err = fed.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            SimError::Federate { source: BusError::InvalidAdvance { .. }, .. }
        ));
    }

    #[test]
    fn time_limit_stops_runaway_federation() {
        let forever = Probe::new("forever", Declarations::new(), |_, _| Ok(Step::Advance(1.0)));
        let mut fed =
            FederationBuilder::new(1.0).max_time(10.0).join(forever).build().unwrap();
        let err = fed.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::TimeLimit { .. }));
        assert_eq!(fed.now(), LogicalTime::new(10.0).unwrap());
    }

    #[test]
    fn trace_observer_counts_deliveries() {
        let sender = Probe::new("sender", sender_decl(), |i, rti| {
            rti.send_interaction(&end(i as u32))?;
            Ok(if i < 4 { Step::Advance(1.0) } else { Step::Resign })
        });
        let receiver = Probe::new("receiver", receiver_decl(), ticker(10, 1.0));
        let mut fed = FederationBuilder::new(1.0).join(sender).join(receiver).build().unwrap();
        let mut trace = TraceObserver::new(5.0);
        fed.run(&mut trace).unwrap();
        assert_eq!(trace.count(InteractionKind::EndSimulation), 5);
        assert_eq!(trace.resigned, vec!["sender".to_owned(), "receiver".to_owned()]);
    }
}

// ── Whole crossing runs ───────────────────────────────────────────────────────

#[cfg(test)]
mod crossing_tests {
    use super::*;
    use crate::{replication_seeds, run_crossing, run_crossing_with, run_replications};

    #[test]
    fn bulk_fill_drains_every_station() {
        let report = run_crossing(&bulk_config(42)).unwrap();

        assert!(report.all_queues_empty());
        assert!(report.is_conserved());
        assert_eq!(report.stations.len(), 3);
        for s in &report.stations {
            assert_eq!(s.people.initial + s.cars.initial, 50);
            assert_eq!(s.people.committed, s.people.initial);
            assert_eq!(s.cars.committed, s.cars.initial);
        }
        let trips = report.completed_trips.unwrap();
        assert!(trips >= 3, "only {trips} trips");
        assert!(trips <= report.ferry.trips);
        assert_eq!(report.ferry.reported_trips, Some(trips));
    }

    #[test]
    fn report_serializes_every_section() {
        let report = run_crossing(&bulk_config(42)).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["seed"], 42);
        assert_eq!(json["completed_trips"], serde_json::json!(report.completed_trips));
        assert_eq!(json["ferry"]["reported_trips"], serde_json::json!(report.ferry.reported_trips));
        assert_eq!(json["ferry"]["trips"], report.ferry.trips);
        assert_eq!(json["stations"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["stations"][0]["people"]["final_len"], 0);
    }

    #[test]
    fn same_seed_same_report() {
        let a = run_crossing(&bulk_config(7)).unwrap();
        let b = run_crossing(&bulk_config(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn continuous_arrivals_end_at_trip_threshold() {
        let config = CrossingConfig {
            arrival: ArrivalPolicy::Continuous,
            end_trip_count: 12,
            ..bulk_config(3)
        };
        let report = run_crossing(&config).unwrap();
        assert!(report.completed_trips.unwrap() >= 12);
        assert!(report.is_conserved());
        for s in &report.stations {
            assert_eq!(s.people.initial, 0);
            assert!(s.people.final_len <= config.max_people_queue);
            assert!(s.cars.final_len <= config.max_car_queue);
        }
    }

    #[test]
    fn every_message_kind_flows() {
        let mut trace = TraceObserver::new(0.0);
        run_crossing_with(&bulk_config(42), &mut trace).unwrap();
        assert_eq!(trace.count(InteractionKind::StartSimulation), 2);
        assert!(trace.count(InteractionKind::BoardingStart) > 0);
        assert!(trace.count(InteractionKind::BoardingEnd) > 0);
        assert!(trace.count(ObjectClass::Station) > 0);
        assert!(trace.count(ObjectClass::Ferry) > 0);
        assert_eq!(trace.count(InteractionKind::EndSimulation), 2);
        assert_eq!(trace.count(InteractionKind::Arrival), 0);
    }

    #[test]
    fn transport_failure_ends_the_run() {
        let mut fed = FederationBuilder::crossing(&bulk_config(1))
            .unwrap()
            .fail_transport_after(5)
            .build()
            .unwrap();
        match fed.run(&mut NoopObserver) {
            Err(SimError::Federate { federate, operation, source }) => {
                assert_eq!(federate, "Station");
                assert_eq!(operation, "update_attributes");
                assert!(matches!(source, BusError::Transport { .. }));
            }
            other => panic!("expected a transport failure, got {other:?}"),
        }
    }

    #[test]
    fn replications_follow_seed_order() {
        let seeds = replication_seeds(99, 3);
        assert_eq!(seeds.len(), 3);
        let reports = run_replications(&bulk_config(0), &seeds);
        for (report, seed) in reports.iter().zip(&seeds) {
            let report = report.as_ref().unwrap();
            assert_eq!(report.seed, *seed);
            assert!(report.all_queues_empty());
        }
    }
}
