use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{TableId, ViewId};

/// Kind of screen a view presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    #[default]
    Unknown,
    GanttChart,
    NetworkDiagram,
    RelationshipDiagram,
    TaskForm,
    TaskSheet,
    ResourceForm,
    ResourceSheet,
    ResourceGraph,
    TaskDetailsForm,
    TaskNameForm,
    ResourceNameForm,
    Calendar,
    TaskUsage,
    ResourceUsage,
}

impl ViewType {
    /// Map an on-disk view type code; unknown codes map to `Unknown`.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => Self::GanttChart,
            2 => Self::NetworkDiagram,
            3 => Self::RelationshipDiagram,
            4 => Self::TaskForm,
            5 => Self::TaskSheet,
            6 => Self::ResourceForm,
            7 => Self::ResourceSheet,
            8 => Self::ResourceGraph,
            10 => Self::TaskDetailsForm,
            11 => Self::TaskNameForm,
            12 => Self::ResourceNameForm,
            13 => Self::Calendar,
            14 => Self::TaskUsage,
            15 => Self::ResourceUsage,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::GanttChart => "Gantt Chart",
            Self::NetworkDiagram => "Network Diagram",
            Self::RelationshipDiagram => "Relationship Diagram",
            Self::TaskForm => "Task Form",
            Self::TaskSheet => "Task Sheet",
            Self::ResourceForm => "Resource Form",
            Self::ResourceSheet => "Resource Sheet",
            Self::ResourceGraph => "Resource Graph",
            Self::TaskDetailsForm => "Task Details Form",
            Self::TaskNameForm => "Task Name Form",
            Self::ResourceNameForm => "Resource Name Form",
            Self::Calendar => "Calendar",
            Self::TaskUsage => "Task Usage",
            Self::ResourceUsage => "Resource Usage",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A saved screen layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub id: ViewId,
    pub name: Option<String>,
    pub view_type: ViewType,
    /// Whether the view opens with a split pane.
    pub split: bool,
    pub table: Option<TableId>,
}

impl View {
    #[must_use]
    pub fn new(id: ViewId, view_type: ViewType) -> Self {
        Self {
            id,
            name: None,
            view_type,
            split: false,
            table: None,
        }
    }
}
