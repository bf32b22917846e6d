use std::fmt;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::ids::{RelationId, TaskId};

/// Dependency type between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationType {
    FinishFinish,
    FinishStart,
    StartFinish,
    StartStart,
}

impl RelationType {
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::FinishFinish),
            1 => Some(Self::FinishStart),
            2 => Some(Self::StartFinish),
            3 => Some(Self::StartStart),
            _ => None,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::FinishFinish => "FF",
            Self::FinishStart => "FS",
            Self::StartFinish => "SF",
            Self::StartStart => "SS",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub uid: RelationId,
    pub predecessor: TaskId,
    pub successor: TaskId,
    pub kind: RelationType,
    pub lag: Option<Duration>,
}

impl Relation {
    #[must_use]
    pub const fn new(uid: RelationId, predecessor: TaskId, successor: TaskId) -> Self {
        Self {
            uid,
            predecessor,
            successor,
            kind: RelationType::FinishStart,
            lag: None,
        }
    }
}
