//! Durations with their display units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit a duration is expressed in. Elapsed units count calendar time rather
/// than working time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minutes,
    ElapsedMinutes,
    Hours,
    ElapsedHours,
    Days,
    ElapsedDays,
    Weeks,
    ElapsedWeeks,
    Months,
    ElapsedMonths,
    Percent,
    ElapsedPercent,
}

impl TimeUnit {
    /// Map an on-disk units code (low five bits) to a unit.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code & 0x1F {
            3 => Some(Self::Minutes),
            4 => Some(Self::ElapsedMinutes),
            5 => Some(Self::Hours),
            6 => Some(Self::ElapsedHours),
            7 => Some(Self::Days),
            8 => Some(Self::ElapsedDays),
            9 => Some(Self::Weeks),
            10 => Some(Self::ElapsedWeeks),
            11 => Some(Self::Months),
            12 => Some(Self::ElapsedMonths),
            19 => Some(Self::Percent),
            20 => Some(Self::ElapsedPercent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Minutes => 3,
            Self::ElapsedMinutes => 4,
            Self::Hours => 5,
            Self::ElapsedHours => 6,
            Self::Days => 7,
            Self::ElapsedDays => 8,
            Self::Weeks => 9,
            Self::ElapsedWeeks => 10,
            Self::Months => 11,
            Self::ElapsedMonths => 12,
            Self::Percent => 19,
            Self::ElapsedPercent => 20,
        }
    }

    #[must_use]
    pub const fn is_elapsed(self) -> bool {
        matches!(
            self,
            Self::ElapsedMinutes
                | Self::ElapsedHours
                | Self::ElapsedDays
                | Self::ElapsedWeeks
                | Self::ElapsedMonths
                | Self::ElapsedPercent
        )
    }

    /// Short suffix used when printing durations.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Minutes => "m",
            Self::ElapsedMinutes => "em",
            Self::Hours => "h",
            Self::ElapsedHours => "eh",
            Self::Days => "d",
            Self::ElapsedDays => "ed",
            Self::Weeks => "w",
            Self::ElapsedWeeks => "ew",
            Self::Months => "mo",
            Self::ElapsedMonths => "emo",
            Self::Percent => "%",
            Self::ElapsedPercent => "e%",
        }
    }
}

/// A quantity of time in a given unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Duration {
    pub value: f64,
    pub units: TimeUnit,
}

impl Duration {
    #[must_use]
    pub const fn new(value: f64, units: TimeUnit) -> Self {
        Self { value, units }
    }

    #[must_use]
    pub const fn hours(value: f64) -> Self {
        Self::new(value, TimeUnit::Hours)
    }

    #[must_use]
    pub const fn days(value: f64) -> Self {
        Self::new(value, TimeUnit::Days)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.units.symbol())
    }
}
