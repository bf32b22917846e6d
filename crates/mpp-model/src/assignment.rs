use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::ids::{AssignmentId, ResourceId, TaskId};

/// Links one resource to one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub uid: AssignmentId,
    pub task: TaskId,
    pub resource: ResourceId,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub work: Option<Duration>,
    pub actual_work: Option<Duration>,
    pub cost: Option<f64>,
    /// Percentage of the resource's time (100.0 = full time).
    pub units: Option<f64>,
}

impl Assignment {
    #[must_use]
    pub fn new(uid: AssignmentId, task: TaskId, resource: ResourceId) -> Self {
        Self {
            uid,
            task,
            resource,
            start: None,
            finish: None,
            work: None,
            actual_work: None,
            cost: None,
            units: None,
        }
    }
}
