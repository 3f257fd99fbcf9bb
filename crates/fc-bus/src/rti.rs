//! The `Rti` trait — the bus as seen from inside a federate.
//!
//! Every call is made at the federate's current granted time; outgoing
//! messages are stamped `time + lookahead` by the implementation, never by
//! the caller.

use fc_core::{FederateClock, FederateId, LogicalTime, ObjectId};

use crate::{AttributeUpdate, BusResult, Interaction, InteractionKind, ObjectClass, ValueMap};

/// Outgoing half of the bus, handed to [`Federate::step`][crate::Federate::step].
///
/// Errors returned by these methods are transport failures and are fatal to
/// the caller; propagate them with `?`.
pub trait Rti {
    /// Handle of the calling federate.
    fn federate(&self) -> FederateId;

    /// The caller's clock (last grant and lookahead).
    fn clock(&self) -> &FederateClock;

    /// Send an already-encoded interaction.
    fn send_values(&mut self, kind: InteractionKind, values: ValueMap) -> BusResult<()>;

    /// Register a new instance of `class` owned by the caller.
    fn register_object(&mut self, class: ObjectClass, name: &str) -> BusResult<ObjectId>;

    /// Publish an already-encoded attribute update for an owned object.
    fn update_values(&mut self, object: ObjectId, values: ValueMap) -> BusResult<()>;

    // ── Provided ──────────────────────────────────────────────────────────

    /// Current granted time.
    fn time(&self) -> LogicalTime {
        self.clock().current
    }

    /// Timestamp the next outgoing message will carry.
    fn stamp(&self) -> LogicalTime {
        self.clock().stamp()
    }

    /// Encode and send a typed interaction.
    fn send_interaction(&mut self, interaction: &Interaction) -> BusResult<()> {
        self.send_values(interaction.kind(), interaction.encode())
    }

    /// Encode and publish a typed attribute update.
    fn update_attributes(&mut self, object: ObjectId, update: &AttributeUpdate) -> BusResult<()> {
        self.update_values(object, update.encode())
    }
}
