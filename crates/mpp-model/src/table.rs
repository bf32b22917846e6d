//! Presentation tables: the column sets sheet-style views display.

use serde::{Deserialize, Serialize};

use crate::ids::TableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// 0 is left, 1 is center, anything else is right.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Left,
            1 => Self::Center,
            _ => Self::Right,
        }
    }
}

/// Entities a table displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    #[default]
    Task,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Numeric field code within the table's field class.
    pub field: u16,
    /// Default caption for the field, when the code is known.
    pub field_name: Option<String>,
    /// Caption override stored with the column.
    pub title: Option<String>,
    pub width: u16,
    pub title_alignment: Alignment,
    pub data_alignment: Alignment,
}

impl Column {
    /// Caption shown in the header: the stored title, else the field name.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.title.as_deref().or(self.field_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: Option<String>,
    pub class: FieldClass,
    /// Columns in stored order.
    pub columns: Vec<Column>,
}

impl Table {
    #[must_use]
    pub fn new(id: TableId, class: FieldClass) -> Self {
        Self {
            id,
            name: None,
            class,
            columns: Vec::new(),
        }
    }
}

/// Default caption for a field code.
#[must_use]
pub fn field_name(class: FieldClass, code: u16) -> Option<&'static str> {
    let name = match (class, code) {
        (FieldClass::Task, 0) => "Work",
        (FieldClass::Task, 5) => "Cost",
        (FieldClass::Task, 14) => "Task Name",
        (FieldClass::Task, 22) => "Unique ID",
        (FieldClass::Task, 23) => "ID",
        (FieldClass::Task, 29) => "Duration",
        (FieldClass::Task, 32) => "% Complete",
        (FieldClass::Task, 35) => "Start",
        (FieldClass::Task, 36) => "Finish",
        (FieldClass::Task, 37) => "Predecessors",
        (FieldClass::Task, 44) => "Resource Names",
        (FieldClass::Task, 308) => "Indicators",
        (FieldClass::Resource, 0) => "ID",
        (FieldClass::Resource, 1) => "Resource Name",
        (FieldClass::Resource, 2) => "Initials",
        (FieldClass::Resource, 3) => "Group",
        (FieldClass::Resource, 4) => "Max. Units",
        (FieldClass::Resource, 6) => "Std. Rate",
        (FieldClass::Resource, 7) => "Ovt. Rate",
        _ => return None,
    };
    Some(name)
}
