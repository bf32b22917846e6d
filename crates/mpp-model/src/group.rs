//! Saved groupings: ordered clauses that bucket rows by a field.

use serde::{Deserialize, Serialize};

use crate::ids::GroupId;
use crate::table::FieldClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupClause {
    pub class: FieldClass,
    /// Numeric field code within `class`.
    pub field: u16,
    /// Default caption for the field, when the code is known.
    pub field_name: Option<String>,
    pub ascending: bool,
    /// Raw bucketing mode code (each value, intervals, and so on).
    pub group_on: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: Option<String>,
    pub show_summary_tasks: bool,
    /// Clauses in stored order, outermost first.
    pub clauses: Vec<GroupClause>,
}

impl Group {
    #[must_use]
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            name: None,
            show_summary_tasks: false,
            clauses: Vec::new(),
        }
    }

    /// Field class of the outermost clause; groupings apply to one class.
    #[must_use]
    pub fn class(&self) -> Option<FieldClass> {
        self.clauses.first().map(|clause| clause.class)
    }
}
