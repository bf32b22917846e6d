use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// File-level and project-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectProperties {
    /// Writing application, e.g. "Microsoft Project 2010".
    pub application_name: Option<String>,
    /// Major version parsed from the application name.
    pub application_version: Option<u32>,
    /// Container format string, e.g. "MSProject.MPP14".
    pub file_format: Option<String>,
    /// Numeric format generation (8, 9, 12, 14).
    pub file_generation: Option<u32>,
    pub start_date: Option<NaiveDateTime>,
    pub finish_date: Option<NaiveDateTime>,
    pub status_date: Option<NaiveDateTime>,
    pub default_calendar_name: Option<String>,
    pub currency_symbol: Option<String>,
    pub minutes_per_day: Option<u32>,
    pub minutes_per_week: Option<u32>,
    /// Path the file was last saved to.
    pub project_file_path: Option<String>,
    /// Record tables were XOR-obfuscated on disk.
    pub encrypted: bool,
}
