//! Recoverable decode and resolution anomalies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity kind a diagnostic refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Property,
    Calendar,
    Resource,
    Task,
    Relation,
    Assignment,
    Table,
    View,
    Filter,
    Group,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Calendar => "calendar",
            Self::Resource => "resource",
            Self::Task => "task",
            Self::Relation => "relation",
            Self::Assignment => "assignment",
            Self::Table => "table",
            Self::View => "view",
            Self::Filter => "filter",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum DiagnosticReason {
    /// Record key equals the table's deleted/unused marker.
    SkippedSentinel,
    /// A second record reused an identifier; the first one was kept.
    DuplicateIdentifier,
    /// An optional reference did not resolve and was cleared.
    UnresolvedReference { field: &'static str, target: i64 },
    /// A reference by name matched no entity and was cleared.
    UnresolvedName { field: &'static str, name: String },
    /// The entity was dropped because a mandatory reference did not resolve.
    DroppedDependent { field: &'static str, target: i64 },
    /// The parent link would close an outline cycle and was removed.
    OutlineCycle { parent: i64 },
    /// The base-calendar link would close a cycle and was removed.
    CalendarCycle { parent: i64 },
    /// A variable-length blob points outside its data stream or is too short.
    MalformedBlob { key: u16 },
    /// The table ended before its declared record count.
    TruncatedTable { index: usize },
    /// A coded field held a value outside its known range.
    InvalidValue { field: &'static str, value: i64 },
}

impl DiagnosticReason {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SkippedSentinel => "skipped-sentinel",
            Self::DuplicateIdentifier => "duplicate-identifier",
            Self::UnresolvedReference { .. } | Self::UnresolvedName { .. } => {
                "unresolved-reference"
            }
            Self::DroppedDependent { .. } => "dropped-dependent",
            Self::OutlineCycle { .. } => "outline-cycle",
            Self::CalendarCycle { .. } => "calendar-cycle",
            Self::MalformedBlob { .. } => "malformed-blob",
            Self::TruncatedTable { .. } => "truncated-table",
            Self::InvalidValue { .. } => "invalid-value",
        }
    }
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())?;
        match self {
            Self::SkippedSentinel | Self::DuplicateIdentifier => Ok(()),
            Self::UnresolvedReference { field, target }
            | Self::DroppedDependent { field, target } => write!(f, " ({field} -> {target})"),
            Self::UnresolvedName { field, name } => write!(f, " ({field} -> {name:?})"),
            Self::OutlineCycle { parent } | Self::CalendarCycle { parent } => {
                write!(f, " (parent {parent})")
            }
            Self::MalformedBlob { key } => write!(f, " (key {key})"),
            Self::TruncatedTable { index } => write!(f, " (at record {index})"),
            Self::InvalidValue { field, value } => write!(f, " ({field} = {value})"),
        }
    }
}

/// One recorded anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: EntityKind,
    pub identifier: Option<i64>,
    #[serde(flatten)]
    pub reason: DiagnosticReason,
}

impl Diagnostic {
    #[must_use]
    pub const fn new(kind: EntityKind, identifier: Option<i64>, reason: DiagnosticReason) -> Self {
        Self {
            kind,
            identifier,
            reason,
        }
    }

    /// Diagnostic about the entity with on-disk identifier `id`.
    #[must_use]
    pub const fn entity(kind: EntityKind, id: i64, reason: DiagnosticReason) -> Self {
        Self::new(kind, Some(id), reason)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identifier {
            Some(id) => write!(f, "{} {id}: {}", self.kind, self.reason),
            None => write!(f, "{}: {}", self.kind, self.reason),
        }
    }
}
