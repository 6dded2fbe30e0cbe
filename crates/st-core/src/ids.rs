//! Strongly typed identifier wrappers.
//!
//! SUMO names every object with a free-form string, so each ID wraps a
//! `String`.  All IDs are `Ord + Hash` so they can be used as map keys and
//! sort keys without ceremony.  Ordering is plain byte-wise string ordering.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed string ID wrapper.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// A vehicle currently (or formerly) present in the simulation.
    pub struct VehicleId;
}

string_id! {
    /// A road segment (SUMO edge).
    pub struct EdgeId;
}

string_id! {
    /// A lane on a road segment, e.g. `E1_0`.
    pub struct LaneId;
}

string_id! {
    /// A junction (SUMO node) bounding one or more edges.
    pub struct JunctionId;
}
