//! Unit tests for the ferry: boarding policy, vessel state and the cycle.

#[cfg(test)]
mod helpers {
    use fc_bus::{
        AttributeUpdate, BusResult, Delivery, Interaction, InteractionKind, MessageKind,
        ObjectClass, Rti, StartSimulation, StationAttributes, ValueMap,
    };
    use fc_core::{FederateClock, FederateId, LogicalTime, ObjectId, StationId};

    /// In-memory `Rti` that records everything the federate sends.
    pub struct RecordingRti {
        pub clock:   FederateClock,
        pub sent:    Vec<Interaction>,
        pub updates: Vec<AttributeUpdate>,
        pub objects: Vec<(ObjectClass, String)>,
    }

    impl RecordingRti {
        pub fn new() -> Self {
            Self {
                clock:   FederateClock::new(1.0),
                sent:    Vec::new(),
                updates: Vec::new(),
                objects: Vec::new(),
            }
        }

        pub fn advance(&mut self, delta: f64) {
            let to = self.clock.target(delta).unwrap();
            self.clock.grant(to);
        }

        pub fn kinds(&self) -> Vec<InteractionKind> {
            self.sent.iter().map(Interaction::kind).collect()
        }
    }

    impl Rti for RecordingRti {
        fn federate(&self) -> FederateId {
            FederateId(0)
        }

        fn clock(&self) -> &FederateClock {
            &self.clock
        }

        fn send_values(&mut self, kind: InteractionKind, values: ValueMap) -> BusResult<()> {
            self.sent.push(Interaction::decode(kind, &values).unwrap());
            Ok(())
        }

        fn register_object(&mut self, class: ObjectClass, name: &str) -> BusResult<ObjectId> {
            self.objects.push((class, name.to_owned()));
            Ok(ObjectId(self.objects.len() as u32 - 1))
        }

        fn update_values(&mut self, _object: ObjectId, values: ValueMap) -> BusResult<()> {
            self.updates.push(AttributeUpdate::decode(ObjectClass::Ferry, &values).unwrap());
            Ok(())
        }
    }

    pub fn interaction(time: f64, msg: Interaction) -> Delivery {
        Delivery {
            kind:   MessageKind::Interaction(msg.kind()),
            time:   LogicalTime::new(time).unwrap(),
            sender: FederateId(1),
            object: None,
            values: msg.encode(),
        }
    }

    pub fn start(stations: u32, capacity: u32) -> Delivery {
        interaction(
            1.0,
            Interaction::StartSimulation(StartSimulation {
                station_count:  stations,
                ferry_capacity: capacity,
                arrivals:       None,
                end_trip_count: None,
            }),
        )
    }

    pub fn station_state(time: f64, station: u32, people: u32, cars: u32) -> Delivery {
        let update = AttributeUpdate::Station(StationAttributes {
            station: StationId(station),
            people,
            cars,
        });
        Delivery {
            kind:   MessageKind::Reflection(ObjectClass::Station),
            time:   LogicalTime::new(time).unwrap(),
            sender: FederateId(2),
            object: Some(ObjectId(station + 1)),
            values: update.encode(),
        }
    }
}

// ── Boarding policy ───────────────────────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use fc_bus::BoardingKind;
    use fc_core::{FederateRng, RngStream};

    use crate::{decide_boarding, Boarding, QueueView};

    fn rng() -> FederateRng {
        FederateRng::new(11, RngStream::Ferry)
    }

    #[test]
    fn cars_only_boards_one_car() {
        let mut rng = rng();
        for cars in 1..20 {
            let view = QueueView { people: 0, cars };
            assert_eq!(decide_boarding(view, 10, &mut rng), Some(Boarding::car()));
        }
    }

    #[test]
    fn people_only_boards_up_to_capacity() {
        let mut rng = rng();
        assert_eq!(
            decide_boarding(QueueView { people: 7, cars: 0 }, 10, &mut rng),
            Some(Boarding::people(7))
        );
        assert_eq!(
            decide_boarding(QueueView { people: 45, cars: 0 }, 10, &mut rng),
            Some(Boarding::people(10))
        );
    }

    #[test]
    fn nothing_waiting_boards_nothing() {
        assert_eq!(decide_boarding(QueueView::default(), 10, &mut rng()), None);
    }

    #[test]
    fn mixed_queue_boards_one_kind() {
        let mut rng = rng();
        let mut seen_car = false;
        let mut seen_people = false;
        for _ in 0..64 {
            match decide_boarding(QueueView { people: 12, cars: 3 }, 10, &mut rng) {
                Some(Boarding { kind: BoardingKind::Car, count }) => {
                    assert_eq!(count, 1);
                    seen_car = true;
                }
                Some(Boarding { kind: BoardingKind::People, count }) => {
                    assert_eq!(count, 10);
                    seen_people = true;
                }
                None => panic!("mixed queue must board something"),
            }
        }
        assert!(seen_car && seen_people);
    }

    #[test]
    fn same_seed_same_decisions() {
        let (mut a, mut b) = (rng(), rng());
        let view = QueueView { people: 5, cars: 5 };
        for _ in 0..32 {
            assert_eq!(decide_boarding(view, 10, &mut a), decide_boarding(view, 10, &mut b));
        }
    }
}

// ── Ferry state ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod ferry_tests {
    use fc_bus::BoardingKind;
    use fc_core::StationId;

    use crate::{Boarding, Ferry, FerryError};

    #[test]
    fn trip_count_matches_departures() {
        let mut ferry = Ferry::new("Ferry-1");
        ferry.configure(3, 10).unwrap();
        let mut previous = 0;
        for k in 1..=10 {
            ferry.depart();
            assert_eq!(ferry.trip_count(), k);
            assert_eq!(ferry.trip_count(), previous + 1);
            previous = ferry.trip_count();
        }
    }

    #[test]
    fn position_wraps() {
        let mut ferry = Ferry::new("Ferry-1");
        ferry.configure(3, 10).unwrap();
        let visited: Vec<u32> = (0..6).map(|_| ferry.depart().0).collect();
        assert_eq!(visited, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn attributes_reflect_boarding() {
        let mut ferry = Ferry::new("Ferry-1");
        ferry.configure(2, 10).unwrap();
        ferry.set_boarding(Some(Boarding::car()));
        let a = ferry.attributes();
        assert_eq!(a.boarding, Some(BoardingKind::Car));
        assert_eq!(a.boarded_count, 1);
        assert!(a.car_on_board);

        ferry.depart();
        let a = ferry.attributes();
        assert_eq!(a.boarding, None);
        assert_eq!(a.boarded_count, 0);
        assert!(!a.car_on_board);
        assert_eq!(a.position, StationId(1));
        assert_eq!(a.trip_count, 1);
    }

    #[test]
    fn zero_stations_rejected() {
        let mut ferry = Ferry::new("Ferry-1");
        assert_eq!(
            ferry.configure(0, 10),
            Err(FerryError::InvalidStart { stations: 0, capacity: 10 })
        );
    }
}

// ── Federate cycle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod federate_tests {
    use fc_bus::{
        BoardingKind, EndSimulation, Federate, Interaction, InteractionKind, ObjectClass, Step,
    };
    use fc_core::{FerryTimings, StationId};

    use super::helpers::{interaction, start, station_state, RecordingRti};
    use crate::{Boarding, BoardingPolicy, FerryFederate, FerryPhase, QueueView};

    fn federate() -> FerryFederate {
        FerryFederate::new(5, FerryTimings::default(), 1.0)
    }

    #[test]
    fn waits_for_start() {
        let mut fed = federate();
        let mut rti = RecordingRti::new();
        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(1.0));
        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(1.0));
        assert!(rti.sent.is_empty());
        assert_eq!(rti.objects, vec![(ObjectClass::Ferry, "Ferry-1".to_owned())]);
    }

    #[test]
    fn full_cycle_with_boarding() {
        let mut fed = federate();
        let mut rti = RecordingRti::new();
        fed.step(&mut rti).unwrap();
        rti.advance(1.0);
        fed.receive(&start(3, 10));
        fed.receive(&station_state(1.0, 0, 7, 0));

        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(0.5));
        assert_eq!(fed.phase(), FerryPhase::Boarding);
        rti.advance(0.5);
        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(1.0));
        rti.advance(1.0);
        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(0.5));
        rti.advance(0.5);
        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(1.0));
        assert_eq!(fed.phase(), FerryPhase::Arriving);

        assert_eq!(
            rti.kinds(),
            vec![
                InteractionKind::Arrival,
                InteractionKind::BoardingStart,
                InteractionKind::BoardingEnd,
                InteractionKind::Departure,
            ]
        );
        let Interaction::BoardingStart(b) = &rti.sent[1] else { panic!("expected intent") };
        assert_eq!((b.station, b.kind, b.count), (StationId(0), BoardingKind::People, 7));

        assert_eq!(rti.updates.len(), 2);
        assert_eq!(fed.ferry().trip_count(), 1);
        assert_eq!(fed.ferry().position(), StationId(1));
        assert_eq!(fed.summary().people_carried, 7);
    }

    #[test]
    fn empty_stop_skips_the_handshake() {
        let mut fed = federate();
        let mut rti = RecordingRti::new();
        fed.step(&mut rti).unwrap();
        rti.advance(1.0);
        fed.receive(&start(2, 10));
        fed.step(&mut rti).unwrap();
        rti.advance(0.5);
        assert_eq!(fed.step(&mut rti).unwrap(), Step::Advance(1.0));
        assert_eq!(rti.kinds(), vec![InteractionKind::Arrival, InteractionKind::Departure]);
        assert_eq!(fed.summary().empty_stops, 1);
    }

    #[test]
    fn end_signal_stops_before_departure() {
        let mut fed = federate();
        let mut rti = RecordingRti::new();
        fed.step(&mut rti).unwrap();
        rti.advance(1.0);
        fed.receive(&start(2, 10));
        fed.step(&mut rti).unwrap();
        rti.advance(0.5);
        fed.receive(&interaction(
            1.5,
            Interaction::EndSimulation(EndSimulation { completed_trips: 9 }),
        ));

        assert_eq!(fed.step(&mut rti).unwrap(), Step::Resign);
        assert_eq!(fed.phase(), FerryPhase::Finished);
        assert_eq!(rti.kinds(), vec![InteractionKind::Arrival]);
        assert_eq!(fed.summary().reported_trips, Some(9));
        assert!(!fed.is_running());
    }

    #[test]
    fn end_signal_during_docking_skips_boarding() {
        let mut fed = federate();
        let mut rti = RecordingRti::new();
        fed.step(&mut rti).unwrap();
        rti.advance(1.0);
        fed.receive(&start(2, 10));
        fed.receive(&station_state(1.0, 0, 7, 0));
        fed.step(&mut rti).unwrap();
        assert_eq!(fed.phase(), FerryPhase::Boarding);
        rti.advance(0.5);
        fed.receive(&interaction(
            1.5,
            Interaction::EndSimulation(EndSimulation { completed_trips: 4 }),
        ));

        assert_eq!(fed.step(&mut rti).unwrap(), Step::Resign);
        assert_eq!(fed.phase(), FerryPhase::Finished);
        assert_eq!(rti.kinds(), vec![InteractionKind::Arrival]);
        assert_eq!(fed.ferry().boarding(), None);
        assert_eq!(fed.summary().people_carried, 0);
    }

    #[test]
    fn malformed_station_state_is_ignored() {
        let mut fed = federate();
        fed.receive(&start(2, 10));
        let mut bad = station_state(1.0, 0, 3, 1);
        bad.values.put_i32(fc_bus::names::PEOPLE_QUEUE_LENGTH, -2);
        fed.receive(&bad);
        assert_eq!(fed.view(StationId(0)), QueueView::default());

        fed.receive(&station_state(1.0, 5, 3, 1));
        assert_eq!(fed.view(StationId(5)), QueueView::default());
    }

    struct AlwaysOnePerson;

    impl BoardingPolicy for AlwaysOnePerson {
        fn decide(
            &self,
            _view: QueueView,
            _capacity: u32,
            _rng: &mut fc_core::FederateRng,
        ) -> Option<Boarding> {
            Some(Boarding::people(1))
        }
    }

    #[test]
    fn custom_policy_is_used() {
        let mut fed = federate().with_policy(AlwaysOnePerson);
        let mut rti = RecordingRti::new();
        fed.step(&mut rti).unwrap();
        rti.advance(1.0);
        fed.receive(&start(2, 10));
        fed.step(&mut rti).unwrap();
        rti.advance(0.5);
        fed.step(&mut rti).unwrap();
        let Interaction::BoardingStart(b) = &rti.sent[1] else { panic!("expected intent") };
        assert_eq!(b.count, 1);
    }
}
