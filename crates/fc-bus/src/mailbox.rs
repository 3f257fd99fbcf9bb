//! `Mailbox` — timestamp-ordered (TSO) delivery queue of one federate.
//!
//! # Why this exists
//!
//! Messages reach a federate long before it may see them: a message stamped
//! `t` must stay queued until the federate is granted an advance to `t` or
//! later.  At each grant the federation drains everything stamped at or
//! before the granted time, in timestamp order.
//!
//! Entries are keyed by `(timestamp, send sequence)`.  The sequence number
//! is global to the federation, so two messages with the same timestamp are
//! always delivered in the order they were sent, regardless of which federate
//! sent them.  That tie-break is what makes a seeded run reproducible.

use std::collections::BTreeMap;

use fc_core::{FederateId, LogicalTime, ObjectId};
use tracing::warn;

use crate::{AttributeUpdate, DecodeResult, Interaction, MessageKind, ValueMap};

// ── Delivery ──────────────────────────────────────────────────────────────────

/// One message as handed to a federate's receive callback.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub kind:   MessageKind,
    /// Timestamp assigned by the sender (`sender time + lookahead`).
    pub time:   LogicalTime,
    pub sender: FederateId,
    /// The reflected object instance; `None` for interactions.
    pub object: Option<ObjectId>,
    pub values: ValueMap,
}

/// A decoded delivery.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Interaction(Interaction),
    Reflection {
        object: Option<ObjectId>,
        update: AttributeUpdate,
    },
}

impl Delivery {
    /// Decode the payload according to `kind`.
    pub fn decode(&self) -> DecodeResult<Message> {
        match self.kind {
            MessageKind::Interaction(kind) => {
                Interaction::decode(kind, &self.values).map(Message::Interaction)
            }
            MessageKind::Reflection(class) => AttributeUpdate::decode(class, &self.values)
                .map(|update| Message::Reflection { object: self.object, update }),
        }
    }

    /// Decode, or log the failure and return `None`.
    ///
    /// A malformed message is dropped without any state change; logical time
    /// has already moved past it, so there is nothing to retry.
    pub fn decode_or_discard(&self, receiver: &str) -> Option<Message> {
        match self.decode() {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!(
                    receiver,
                    kind = %self.kind,
                    time = %self.time,
                    sender = %self.sender,
                    "discarding undecodable message: {e}"
                );
                None
            }
        }
    }
}

// ── Mailbox ───────────────────────────────────────────────────────────────────

/// Pending deliveries of one federate, ordered by `(timestamp, sequence)`.
#[derive(Default, Debug)]
pub struct Mailbox {
    inner: BTreeMap<(LogicalTime, u64), Delivery>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `delivery`; `seq` is the federation-wide send sequence number.
    pub fn push(&mut self, seq: u64, delivery: Delivery) {
        self.inner.insert((delivery.time, seq), delivery);
    }

    /// Remove and return every delivery stamped at or before `time`, in
    /// timestamp order.
    pub fn drain_through(&mut self, time: LogicalTime) -> Vec<Delivery> {
        // Split at the first key strictly after `time`.
        let later = self.inner.split_off(&(time, u64::MAX));
        let due = std::mem::replace(&mut self.inner, later);
        due.into_values().collect()
    }

    /// The earliest queued timestamp, or `None` if empty.
    pub fn next_time(&self) -> Option<LogicalTime> {
        self.inner.keys().next().map(|&(t, _)| t)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop everything (used when a federate resigns).
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
