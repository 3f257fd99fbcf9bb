//! The `Federate` trait — the extension point every agent implements.

use std::any::Any;

use fc_core::ObjectId;

use crate::{BusResult, Delivery, MessageKind, ObjectClass, Rti};

/// What a federate asks for at the end of a step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Step {
    /// Request an advance of `delta` logical units and suspend until granted.
    Advance(f64),
    /// Leave the federation.  No further callbacks are made.
    Resign,
}

/// Publication and subscription declarations of one federate.
///
/// Sending an undeclared kind is a transport error; only declared
/// subscriptions are routed to the federate's mailbox.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    pub publishes:  Vec<MessageKind>,
    pub subscribes: Vec<MessageKind>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(mut self, kind: impl Into<MessageKind>) -> Self {
        self.publishes.push(kind.into());
        self
    }

    pub fn subscribe(mut self, kind: impl Into<MessageKind>) -> Self {
        self.subscribes.push(kind.into());
        self
    }

    pub fn publishes(&self, kind: MessageKind) -> bool {
        self.publishes.contains(&kind)
    }

    pub fn subscribes(&self, kind: MessageKind) -> bool {
        self.subscribes.contains(&kind)
    }
}

/// A single-threaded, cooperatively scheduled participant.
///
/// # Scheduling contract
///
/// The federation drives each federate through a strict cycle:
///
/// 1. `step` runs at a granted time and returns the next [`Step`].
/// 2. While the requested advance is pending, the federate is suspended.
/// 3. When the advance is granted, every queued message stamped at or before
///    the granted time is passed to `receive` (and `discover` before the
///    first reflection of an unseen object), in timestamp order.
/// 4. `step` runs again at the granted time.
///
/// `receive` never overlaps `step`, so a federate's state needs no locking.
/// `receive` has no bus access: callbacks only update local state, the main
/// loop in `step` does all publishing.
///
/// The first `step` is made at time zero right after joining.
pub trait Federate: 'static {
    /// Federate name, unique within a federation.
    fn name(&self) -> &str;

    /// What this federate publishes and subscribes to.  Read once at join.
    fn declarations(&self) -> Declarations;

    /// Called when a subscribed object instance is seen for the first time.
    fn discover(&mut self, _object: ObjectId, _class: ObjectClass, _name: &str) {}

    /// Callback for one due message.
    fn receive(&mut self, delivery: &Delivery);

    /// Main-loop iteration at the current grant.
    fn step(&mut self, rti: &mut dyn Rti) -> BusResult<Step>;

    /// Downcast support so callers can read results back after a run.
    fn as_any(&self) -> &dyn Any;
}

