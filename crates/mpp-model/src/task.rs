use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::ids::{AssignmentId, CalendarId, TaskId};

/// Scheduling constraint applied to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    AsSoonAsPossible,
    AsLateAsPossible,
    MustStartOn,
    MustFinishOn,
    StartNoEarlierThan,
    StartNoLaterThan,
    FinishNoEarlierThan,
    FinishNoLaterThan,
}

impl ConstraintType {
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::AsSoonAsPossible),
            1 => Some(Self::AsLateAsPossible),
            2 => Some(Self::MustStartOn),
            3 => Some(Self::MustFinishOn),
            4 => Some(Self::StartNoEarlierThan),
            5 => Some(Self::StartNoLaterThan),
            6 => Some(Self::FinishNoEarlierThan),
            7 => Some(Self::FinishNoLaterThan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub uid: TaskId,
    /// Display id; determines sibling order.
    pub id: Option<i32>,
    pub name: Option<String>,
    pub wbs: Option<String>,
    pub notes: Option<String>,
    pub outline_level: Option<u16>,
    /// Raw parent reference; cleared during resolution when it does not
    /// resolve or would close a cycle.
    pub parent: Option<TaskId>,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_finish: Option<NaiveDateTime>,
    pub duration: Option<Duration>,
    pub work: Option<Duration>,
    pub actual_work: Option<Duration>,
    pub cost: Option<f64>,
    pub percent_complete: Option<u16>,
    pub milestone: bool,
    pub calendar: Option<CalendarId>,
    pub constraint_type: Option<ConstraintType>,
    pub constraint_date: Option<NaiveDateTime>,
    pub custom_text: BTreeMap<String, String>,
    #[serde(default)]
    pub(crate) summary: bool,
    #[serde(default)]
    pub(crate) assignments: BTreeSet<AssignmentId>,
}

impl Task {
    #[must_use]
    pub fn new(uid: TaskId) -> Self {
        Self {
            uid,
            id: None,
            name: None,
            wbs: None,
            notes: None,
            outline_level: None,
            parent: None,
            start: None,
            finish: None,
            actual_start: None,
            actual_finish: None,
            duration: None,
            work: None,
            actual_work: None,
            cost: None,
            percent_complete: None,
            milestone: false,
            calendar: None,
            constraint_type: None,
            constraint_date: None,
            custom_text: BTreeMap::new(),
            summary: false,
            assignments: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// True when at least one task names this one as parent.
    pub fn is_summary(&self) -> bool {
        self.summary
    }

    /// Assignments that reference this task.
    pub fn assignments(&self) -> &BTreeSet<AssignmentId> {
        &self.assignments
    }

    pub(crate) fn display_key(&self) -> (i32, TaskId) {
        (self.id.unwrap_or(i32::MAX), self.uid)
    }
}
