#![deny(unsafe_code)]

//! On-disk entity identifiers.
//!
//! Every entity kind has its own identifier space, so a task uid can never be
//! passed where a resource uid is expected.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Task unique id.
    TaskId
);
entity_id!(
    /// Resource unique id.
    ResourceId
);
entity_id!(
    /// Resource assignment unique id.
    AssignmentId
);
entity_id!(
    /// Calendar unique id.
    CalendarId
);
entity_id!(
    /// Task dependency unique id.
    RelationId
);
entity_id!(
    /// Presentation table id.
    TableId
);
entity_id!(
    /// View id.
    ViewId
);
entity_id!(
    /// Saved filter id.
    FilterId
);
entity_id!(
    /// Saved grouping id.
    GroupId
);
