use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{CalendarId, ResourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[default]
    Work,
    Material,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub uid: ResourceId,
    pub id: Option<i32>,
    pub name: Option<String>,
    pub initials: Option<String>,
    pub group: Option<String>,
    pub email: Option<String>,
    pub kind: ResourceKind,
    pub calendar: Option<CalendarId>,
    pub standard_rate: Option<f64>,
    pub overtime_rate: Option<f64>,
    pub cost: Option<f64>,
    /// Maximum units as a percentage (100.0 = one full-time resource).
    pub max_units: Option<f64>,
    pub custom_text: BTreeMap<String, String>,
}

impl Resource {
    #[must_use]
    pub fn new(uid: ResourceId) -> Self {
        Self {
            uid,
            id: None,
            name: None,
            initials: None,
            group: None,
            email: None,
            kind: ResourceKind::Work,
            calendar: None,
            standard_rate: None,
            overtime_rate: None,
            cost: None,
            max_units: None,
            custom_text: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn display_key(&self) -> (i32, ResourceId) {
        (self.id.unwrap_or(i32::MAX), self.uid)
    }
}
