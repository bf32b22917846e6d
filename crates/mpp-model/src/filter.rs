use serde::{Deserialize, Serialize};

use crate::ids::FilterId;

/// A saved filter definition. Only the header is decoded; the criteria
/// expression is not part of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub id: FilterId,
    pub name: Option<String>,
    /// Whether summary rows of matching tasks are shown.
    pub show_related_summary_rows: bool,
}

impl Filter {
    #[must_use]
    pub fn new(id: FilterId) -> Self {
        Self {
            id,
            name: None,
            show_related_summary_rows: false,
        }
    }
}
