//! Working-time calendars.

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::ids::{CalendarId, ResourceId};

/// A contiguous block of working time within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingPeriod {
    pub start: NaiveTime,
    pub minutes: u32,
}

impl WorkingPeriod {
    #[must_use]
    pub const fn new(start: NaiveTime, minutes: u32) -> Self {
        Self { start, minutes }
    }

    /// End of the period; periods ending at midnight wrap to 00:00.
    #[must_use]
    pub fn end(&self) -> NaiveTime {
        self.start
            .overflowing_add_signed(TimeDelta::minutes(i64::from(self.minutes)))
            .0
    }
}

/// Rule for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", content = "periods", rename_all = "snake_case")]
pub enum DayRule {
    /// Inherit from the base calendar.
    #[default]
    Default,
    NonWorking,
    Working(Vec<WorkingPeriod>),
}

impl DayRule {
    /// Total working minutes, `None` when the rule is inherited.
    #[must_use]
    pub fn working_minutes(&self) -> Option<u32> {
        match self {
            Self::Default => None,
            Self::NonWorking => Some(0),
            Self::Working(periods) => Some(periods.iter().map(|p| p.minutes).sum()),
        }
    }
}

/// A date range whose working time overrides the weekly rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub name: Option<String>,
    /// Empty for non-working exceptions.
    pub periods: Vec<WorkingPeriod>,
}

impl CalendarException {
    #[must_use]
    pub fn is_working(&self) -> bool {
        !self.periods.is_empty()
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub uid: CalendarId,
    pub name: Option<String>,
    /// Base calendar this one derives from.
    pub parent: Option<CalendarId>,
    /// Owning resource for resource calendars.
    pub resource: Option<ResourceId>,
    /// Weekday rules, Sunday first.
    pub days: [DayRule; 7],
    pub exceptions: Vec<CalendarException>,
}

impl Calendar {
    #[must_use]
    pub fn new(uid: CalendarId) -> Self {
        Self {
            uid,
            name: None,
            parent: None,
            resource: None,
            days: Default::default(),
            exceptions: Vec::new(),
        }
    }

    #[must_use]
    pub fn day(&self, weekday: Weekday) -> &DayRule {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn set_day(&mut self, weekday: Weekday, rule: DayRule) {
        self.days[weekday.num_days_from_sunday() as usize] = rule;
    }

    /// A base calendar does not inherit from another calendar.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.parent.is_none()
    }

    #[must_use]
    pub fn exception_for(&self, date: NaiveDate) -> Option<&CalendarException> {
        self.exceptions.iter().find(|e| e.contains(date))
    }

    /// Rule in effect for `date` on this calendar alone (no inheritance).
    #[must_use]
    pub fn rule_for(&self, date: NaiveDate) -> DayRule {
        match self.exception_for(date) {
            Some(exception) if exception.is_working() => DayRule::Working(exception.periods.clone()),
            Some(_) => DayRule::NonWorking,
            None => self.day(date.weekday()).clone(),
        }
    }
}
