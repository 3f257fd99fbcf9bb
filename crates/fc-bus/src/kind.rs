//! Message kinds — the keys of every dispatch table on the bus.

use std::fmt;

/// Point events exchanged between federates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum InteractionKind {
    Arrival,
    BoardingStart,
    BoardingEnd,
    Departure,
    StartSimulation,
    EndSimulation,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 6] = [
        InteractionKind::Arrival,
        InteractionKind::BoardingStart,
        InteractionKind::BoardingEnd,
        InteractionKind::Departure,
        InteractionKind::StartSimulation,
        InteractionKind::EndSimulation,
    ];

    /// Fully qualified interaction class name.
    pub fn class_name(self) -> &'static str {
        match self {
            InteractionKind::Arrival         => "InteractionRoot.FerryOperations.Arrival",
            InteractionKind::BoardingStart   => "InteractionRoot.FerryOperations.BoardingStart",
            InteractionKind::BoardingEnd     => "InteractionRoot.FerryOperations.BoardingEnd",
            InteractionKind::Departure       => "InteractionRoot.FerryOperations.Departure",
            InteractionKind::StartSimulation => "InteractionRoot.SimulationControl.StartSimulation",
            InteractionKind::EndSimulation   => "InteractionRoot.SimulationControl.EndSimulation",
        }
    }
}

/// Attribute-replicated object classes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ObjectClass {
    Ferry,
    Station,
}

impl ObjectClass {
    pub fn class_name(self) -> &'static str {
        match self {
            ObjectClass::Ferry   => "ObjectRoot.Ferry",
            ObjectClass::Station => "ObjectRoot.Station",
        }
    }
}

/// Anything a federate can publish or subscribe to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum MessageKind {
    Interaction(InteractionKind),
    Reflection(ObjectClass),
}

impl From<InteractionKind> for MessageKind {
    fn from(kind: InteractionKind) -> Self {
        MessageKind::Interaction(kind)
    }
}

impl From<ObjectClass> for MessageKind {
    fn from(class: ObjectClass) -> Self {
        MessageKind::Reflection(class)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Interaction(k) => f.write_str(k.class_name()),
            MessageKind::Reflection(c)  => f.write_str(c.class_name()),
        }
    }
}
