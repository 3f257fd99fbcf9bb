//! The `Federation` — in-process bus and conservative time manager.
//!
//! # Time management
//!
//! Every federate is both time-regulating and time-constrained with the
//! same lookahead `L > 0`.  After each `step` a federate either resigns or
//! requests an advance to `t`.  The federation repeatedly grants the
//! smallest outstanding request (ties go to the earlier joiner):
//!
//! ```text
//! loop:
//!   m, t ← member with the minimum requested time
//!   deliver every message queued for m stamped ≤ t   (timestamp order)
//!   m.clock ← t
//!   m.step()                                          (sends are stamped t + L)
//! ```
//!
//! The grant is safe: every other member has requested a time `≥ t`, so
//! anything it sends later is stamped `≥ t + L > t` and can never land in
//! `m`'s past.
//!
//! # Split borrow
//!
//! Federates and bus state live in separate fields so a federate can hold
//! `&mut` to itself while its `Rti` handle holds `&mut` to the bus.

use std::collections::BTreeSet;

use fc_bus::{
    BusError, BusResult, Declarations, Delivery, Federate, InteractionKind, Mailbox, MessageKind,
    ObjectClass, Rti, Step, ValueMap,
};
use fc_core::{FederateClock, FederateId, LogicalTime, ObjectId};
use tracing::{debug, error, warn};

use crate::{SimError, SimObserver, SimResult};

// ── Bus state ─────────────────────────────────────────────────────────────────

/// Bus-side record of one joined federate.
pub(crate) struct Member {
    pub(crate) name:         String,
    pub(crate) declarations: Declarations,
    pub(crate) clock:        FederateClock,
    pub(crate) mailbox:      Mailbox,
    pub(crate) requested:    Option<LogicalTime>,
    pub(crate) resigned:     bool,
    pub(crate) discovered:   BTreeSet<ObjectId>,
}

pub(crate) struct ObjectRecord {
    class: ObjectClass,
    name:  String,
    owner: FederateId,
}

/// Everything except the federates themselves.
pub(crate) struct Bus {
    pub(crate) members: Vec<Member>,
    objects:            Vec<ObjectRecord>,
    /// Federation-wide send sequence, the tie-break for equal timestamps.
    seq:                u64,
    /// Successful sends so far, counted for fault injection.
    sends:              u64,
    fail_after:         Option<u64>,
}

impl Bus {
    pub(crate) fn new(fail_after: Option<u64>) -> Self {
        Self { members: Vec::new(), objects: Vec::new(), seq: 0, sends: 0, fail_after }
    }

    fn check_transport(&mut self, operation: &'static str) -> BusResult<()> {
        if self.fail_after.is_some_and(|limit| self.sends >= limit) {
            return Err(BusError::Transport {
                operation,
                reason: format!("injected failure after {} sends", self.sends),
            });
        }
        self.sends += 1;
        Ok(())
    }

    fn check_published(
        &self,
        operation: &'static str,
        sender: FederateId,
        kind: MessageKind,
    ) -> BusResult<()> {
        let member = self
            .members
            .get(sender.index())
            .filter(|m| !m.resigned)
            .ok_or(BusError::NotJoined { operation, federate: sender })?;
        if member.declarations.publishes(kind) {
            Ok(())
        } else {
            Err(BusError::NotPublished { operation, federate: sender, kind })
        }
    }

    /// Queue a message for every other joined subscriber of `kind`.
    fn route(
        &mut self,
        sender: FederateId,
        kind: MessageKind,
        object: Option<ObjectId>,
        values: ValueMap,
    ) {
        let time = self.members[sender.index()].clock.stamp();
        let seq = self.seq;
        self.seq += 1;
        for (i, member) in self.members.iter_mut().enumerate() {
            if i == sender.index() || member.resigned || !member.declarations.subscribes(kind) {
                continue;
            }
            member.mailbox.push(seq, Delivery { kind, time, sender, object, values: values.clone() });
        }
    }
}

/// The `Rti` handle given to one federate for the duration of one `step`.
struct Ambassador<'a> {
    bus: &'a mut Bus,
    id:  FederateId,
}

impl Rti for Ambassador<'_> {
    fn federate(&self) -> FederateId {
        self.id
    }

    fn clock(&self) -> &FederateClock {
        &self.bus.members[self.id.index()].clock
    }

    fn send_values(&mut self, kind: InteractionKind, values: ValueMap) -> BusResult<()> {
        let kind = MessageKind::Interaction(kind);
        self.bus.check_published("send_interaction", self.id, kind)?;
        self.bus.check_transport("send_interaction")?;
        self.bus.route(self.id, kind, None, values);
        Ok(())
    }

    fn register_object(&mut self, class: ObjectClass, name: &str) -> BusResult<ObjectId> {
        self.bus.check_published("register_object", self.id, class.into())?;
        self.bus.check_transport("register_object")?;
        let object = ObjectId::try_from(self.bus.objects.len()).map_err(|_| BusError::Transport {
            operation: "register_object",
            reason:    "object handle space exhausted".to_owned(),
        })?;
        self.bus.objects.push(ObjectRecord { class, name: name.to_owned(), owner: self.id });
        debug!(federate = %self.id, %object, class = class.class_name(), name, "registered object");
        Ok(object)
    }

    fn update_values(&mut self, object: ObjectId, values: ValueMap) -> BusResult<()> {
        let class = match self.bus.objects.get(object.index()) {
            Some(record) if record.owner == self.id => record.class,
            _ => {
                return Err(BusError::NotOwner {
                    operation: "update_attributes",
                    federate:  self.id,
                    object,
                });
            }
        };
        let kind = MessageKind::Reflection(class);
        self.bus.check_published("update_attributes", self.id, kind)?;
        self.bus.check_transport("update_attributes")?;
        self.bus.route(self.id, kind, Some(object), values);
        Ok(())
    }
}

// ── Federation ────────────────────────────────────────────────────────────────

/// A running federation execution.  Create via
/// [`FederationBuilder`][crate::FederationBuilder].
pub struct Federation {
    pub(crate) federates: Vec<Box<dyn Federate>>,
    pub(crate) bus:       Bus,
    pub(crate) max_time:  LogicalTime,
    /// Latest time granted to any federate.
    pub(crate) now:       LogicalTime,
    pub(crate) started:   bool,
}

impl Federation {
    /// Number of joined federates, resigned or not.
    pub fn len(&self) -> usize {
        self.federates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.federates.is_empty()
    }

    /// Latest time granted to any federate.
    pub fn now(&self) -> LogicalTime {
        self.now
    }

    /// `true` once every federate has resigned.
    pub fn is_finished(&self) -> bool {
        self.bus.members.iter().all(|m| m.resigned)
    }

    /// Number of registered object instances.
    pub fn object_count(&self) -> usize {
        self.bus.objects.len()
    }

    /// Find the first federate of concrete type `T`.
    pub fn find<T: Federate>(&self) -> Option<&T> {
        self.federates.iter().find_map(|f| f.as_any().downcast_ref::<T>())
    }

    /// The federate called `name`, if it has concrete type `T`.
    pub fn federate<T: Federate>(&self, name: &str) -> Option<&T> {
        self.federates
            .iter()
            .filter(|f| f.name() == name)
            .find_map(|f| f.as_any().downcast_ref::<T>())
    }

    /// Run until every federate has resigned.
    ///
    /// Each federate gets its first `step` at time zero, in join order.
    /// Returns the final logical time.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<LogicalTime> {
        if !self.started {
            self.started = true;
            for i in 0..self.federates.len() {
                self.step_federate(i, observer)?;
            }
        }

        while let Some((i, time)) = self.next_grant() {
            if time > self.max_time {
                return Err(SimError::TimeLimit { limit: self.max_time, next: time });
            }
            self.grant(i, time, observer);
            self.step_federate(i, observer)?;
        }

        observer.on_end(self.now);
        Ok(self.now)
    }

    /// The member with the smallest outstanding request.
    fn next_grant(&self) -> Option<(usize, LogicalTime)> {
        self.bus
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.resigned)
            .filter_map(|(i, m)| m.requested.map(|t| (i, t)))
            .min_by_key(|&(i, t)| (t, i))
    }

    /// Advance member `i` to `time` and deliver its due messages.
    fn grant<O: SimObserver>(&mut self, i: usize, time: LogicalTime, observer: &mut O) {
        let member = &mut self.bus.members[i];
        member.requested = None;
        member.clock.grant(time);
        if time > self.now {
            self.now = time;
        }
        let due = member.mailbox.drain_through(time);
        observer.on_grant(&member.name, time);

        let federate = &mut self.federates[i];
        for delivery in &due {
            if let (Some(object), MessageKind::Reflection(class)) = (delivery.object, delivery.kind) {
                if self.bus.members[i].discovered.insert(object) {
                    let name = self.bus.objects.get(object.index()).map_or("", |o| o.name.as_str());
                    federate.discover(object, class, name);
                }
            }
            federate.receive(delivery);
            observer.on_delivery(&self.bus.members[i].name, delivery);
        }
    }

    /// Run one `step` of federate `i` and record what it asked for.
    fn step_federate<O: SimObserver>(&mut self, i: usize, observer: &mut O) -> SimResult<()> {
        let id = FederateId(i as u32);
        let federate = &mut self.federates[i];
        let result = {
            let mut rti = Ambassador { bus: &mut self.bus, id };
            federate.step(&mut rti)
        };
        let member = &mut self.bus.members[i];

        let step = match result {
            Ok(step) => step,
            Err(source) => {
                error!(federate = %member.name, operation = source.operation(), "fatal bus error: {source}");
                return Err(SimError::Federate {
                    federate: member.name.clone(),
                    operation: source.operation(),
                    source,
                });
            }
        };

        match step {
            Step::Advance(delta) => {
                let Some(target) = member.clock.target(delta) else {
                    let source = BusError::InvalidAdvance { delta, from: member.clock.current };
                    error!(federate = %member.name, "fatal bus error: {source}");
                    return Err(SimError::Federate {
                        federate: member.name.clone(),
                        operation: source.operation(),
                        source,
                    });
                };
                member.requested = Some(target);
            }
            Step::Resign => {
                member.resigned = true;
                member.requested = None;
                if !member.mailbox.is_empty() {
                    warn!(federate = %member.name, dropped = member.mailbox.len(), "resigned with undelivered messages");
                }
                member.mailbox.clear();
                observer.on_resign(&member.name, member.clock.current);
            }
        }
        Ok(())
    }
}
