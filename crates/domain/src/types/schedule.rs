//! Work-window and timeslot types
//!
//! A `WorkTime` bounds one weekday of an attendee's schedulable window,
//! already rendered in the host timezone. A `TimeSlot` is one
//! granularity-sized tile inside that window; slots are the solver's
//! placement unit and must tile their window with no gaps or overlaps.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TesseraError};

/// Slot granularity: fine (15 min) or lite (30 min)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Granularity {
    Fine,
    Lite,
}

impl Granularity {
    pub const fn minutes(self) -> i64 {
        match self {
            Self::Fine => crate::constants::FINE_GRANULARITY_MINUTES,
            Self::Lite => crate::constants::LITE_GRANULARITY_MINUTES,
        }
    }
}

/// ISO day of week, serialized in the solver's uppercase wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Construct from an ISO weekday number (1 = Monday .. 7 = Sunday)
    pub fn from_iso(day: u8) -> Result<Self> {
        match day {
            1 => Ok(Self::Monday),
            2 => Ok(Self::Tuesday),
            3 => Ok(Self::Wednesday),
            4 => Ok(Self::Thursday),
            5 => Ok(Self::Friday),
            6 => Ok(Self::Saturday),
            7 => Ok(Self::Sunday),
            other => Err(TesseraError::InvalidInput(format!("invalid ISO weekday: {other}"))),
        }
    }

    pub const fn iso(self) -> u8 {
        match self {
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
            Self::Sunday => 7,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// Recurring month/day tag in the solver's `--MM-DD` wire format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthDay(String);

impl MonthDay {
    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self(format!("--{:02}-{:02}", date.month(), date.day()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One weekday of an attendee's schedulable window, in host wall-clock time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTime {
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub host_id: String,
    pub user_id: String,
}

/// One granularity-sized tile of a work window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub host_id: String,
    pub month_day: MonthDay,
    pub date: NaiveDate,
}
