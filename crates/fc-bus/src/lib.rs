//! `fc-bus` — the federation bus contract shared by every federate.
//!
//! Federates never talk to each other directly.  Everything they exchange is
//! a `ValueMap` tagged with a [`MessageKind`], stamped with a logical time and
//! routed by the federation to every subscriber other than the sender.
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`kind`]      | `InteractionKind`, `ObjectClass`, `MessageKind`           |
//! | [`values`]    | `ValueMap` and the scalar wire encoding                   |
//! | [`message`]   | Typed interactions and attribute updates, encode/decode   |
//! | [`mailbox`]   | `Delivery`, `Message`, timestamp-ordered `Mailbox`        |
//! | [`rti`]       | `Rti` — outgoing calls available inside `step`            |
//! | [`federate`]  | `Federate`, `Declarations`, `Step`                        |
//! | [`error`]     | `DecodeError` (recovered), `BusError` (fatal)             |
//!
//! The federation that drives these traits lives in `fc-sim`.

pub mod error;
pub mod federate;
pub mod kind;
pub mod mailbox;
pub mod message;
pub mod rti;
pub mod values;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BusError, BusResult, DecodeError, DecodeResult};
pub use federate::{Declarations, Federate, Step};
pub use kind::{InteractionKind, MessageKind, ObjectClass};
pub use mailbox::{Delivery, Mailbox, Message};
pub use message::{
    Arrival, ArrivalParams, AttributeUpdate, BoardingEnd, BoardingKind, BoardingStart, Departure,
    EndSimulation, FerryAttributes, Interaction, StartSimulation, StationAttributes, names,
};
pub use rti::Rti;
pub use values::ValueMap;
