use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An id drawn from a monotonically assigned, 1-based counter.
///
/// The store hands out ids in order and reports the next unassigned one, so
/// every id space can be walked densely with [`IdRange`](crate::IdRange).
pub trait SequentialId: Copy + Ord + fmt::Debug {
    fn from_raw(raw: u64) -> Self;
    fn raw(self) -> u64;
}

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl SequentialId for $name {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| TypeError::InvalidId {
                        kind: $label,
                        input: s.to_string(),
                    })
            }
        }
    };
}

sequential_id!(
    /// Identifier of a [`Class`](crate::Class) definition.
    ClassId,
    "class id"
);

sequential_id!(
    /// Identifier of an [`Entity`](crate::Entity). Global across classes.
    EntityId,
    "entity id"
);

sequential_id!(
    /// Identifier of a [`Channel`](crate::Channel) in the content working group.
    ChannelId,
    "channel id"
);

sequential_id!(
    /// Identifier of a membership account owning channels.
    MemberId,
    "member id"
);
