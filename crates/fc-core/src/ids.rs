//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so a
//! station id can index the station `Vec` directly, but callers should prefer
//! the `.index()` helper for clarity.
//!
//! On the wire every id travels as a signed 32-bit integer; use
//! `to_wire`/`from_wire` at the codec boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a `u32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident(u32);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID", equal to `u32::MAX`.
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Encode as the signed 32-bit wire representation.
            ///
            /// `INVALID` (and anything above `i32::MAX`) maps to `-1`.
            #[inline]
            pub fn to_wire(self) -> i32 {
                i32::try_from(self.0).unwrap_or(-1)
            }

            /// Decode from the wire; negative values are rejected.
            #[inline]
            pub fn from_wire(raw: i32) -> Option<$name> {
                u32::try_from(raw).ok().map($name)
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a landing station, `0..station_count`.
    pub struct StationId(u32);
}

typed_id! {
    /// Join-order handle of a federate inside one federation execution.
    pub struct FederateId(u32);
}

typed_id! {
    /// Handle of a registered object instance (the ferry, one per station).
    pub struct ObjectId(u32);
}
