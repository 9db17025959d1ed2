//! Per-user scheduling preferences
//!
//! Immutable input for a run. Start/end times are keyed by ISO weekday
//! (1 = Monday .. 7 = Sunday); a missing weekday entry is a lookup error and
//! aborts that day's generation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TesseraError};

/// Work-window boundary for one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTime {
    /// ISO weekday 1..=7
    pub day: u8,
    pub hour: u32,
    pub minutes: u32,
}

impl DayTime {
    pub fn to_time(self) -> Result<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minutes, 0).ok_or_else(|| {
            TesseraError::InvalidInput(format!(
                "invalid work-window time {:02}:{:02} for day {}",
                self.hour, self.minutes, self.day
            ))
        })
    }
}

/// Per-user scheduling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub start_times: Vec<DayTime>,
    pub end_times: Vec<DayTime>,
    /// Break duration in minutes
    pub break_length: i64,
    pub min_number_of_breaks: i32,
    /// Percentage (0..=100) of working hours that may be scheduled
    pub max_work_load_percent: i32,
    pub max_number_of_meetings: i32,
    pub back_to_back_meetings: bool,
    pub break_color: Option<String>,
    // Copy policy: prefer a previous occurrence's value over category defaults
    #[serde(default)]
    pub copy_availability: bool,
    #[serde(default)]
    pub copy_time_blocking: bool,
    #[serde(default)]
    pub copy_time_preference: bool,
    #[serde(default)]
    pub copy_reminders: bool,
    #[serde(default)]
    pub copy_priority_level: bool,
    #[serde(default)]
    pub copy_modifiable: bool,
    #[serde(default)]
    pub copy_is_break: bool,
    #[serde(default)]
    pub copy_is_meeting: bool,
    #[serde(default)]
    pub copy_is_external_meeting: bool,
    #[serde(default)]
    pub copy_color: bool,
}

impl UserPreference {
    /// Work-window start for an ISO weekday.
    ///
    /// # Errors
    /// `TesseraError::NotFound` when the preference has no entry for the day.
    pub fn day_start(&self, iso_day: u8) -> Result<NaiveTime> {
        Self::lookup(&self.start_times, iso_day, "start")?.to_time()
    }

    /// Work-window end for an ISO weekday.
    pub fn day_end(&self, iso_day: u8) -> Result<NaiveTime> {
        Self::lookup(&self.end_times, iso_day, "end")?.to_time()
    }

    /// Length of the work window for an ISO weekday, in fractional hours.
    pub fn working_hours(&self, iso_day: u8) -> Result<f64> {
        let start = self.day_start(iso_day)?;
        let end = self.day_end(iso_day)?;
        Ok((end - start).num_minutes() as f64 / 60.0)
    }

    fn lookup(times: &[DayTime], iso_day: u8, kind: &str) -> Result<DayTime> {
        times.iter().copied().find(|t| t.day == iso_day).ok_or_else(|| {
            TesseraError::NotFound(format!("no {kind} time configured for weekday {iso_day}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> UserPreference {
        UserPreference {
            user_id: "user-1".into(),
            start_times: (1..=7).map(|day| DayTime { day, hour: 9, minutes: 0 }).collect(),
            end_times: (1..=7).map(|day| DayTime { day, hour: 17, minutes: 0 }).collect(),
            break_length: 15,
            min_number_of_breaks: 2,
            max_work_load_percent: 80,
            max_number_of_meetings: 6,
            back_to_back_meetings: false,
            break_color: None,
            copy_availability: false,
            copy_time_blocking: false,
            copy_time_preference: false,
            copy_reminders: false,
            copy_priority_level: false,
            copy_modifiable: false,
            copy_is_break: false,
            copy_is_meeting: false,
            copy_is_external_meeting: false,
            copy_color: false,
        }
    }

    #[test]
    fn computes_working_hours_from_window() {
        assert_eq!(prefs().working_hours(1).unwrap(), 8.0);
    }

    #[test]
    fn missing_weekday_is_not_found() {
        let mut p = prefs();
        p.start_times.retain(|t| t.day != 3);
        assert!(matches!(p.day_start(3), Err(TesseraError::NotFound(_))));
        assert!(p.day_start(4).is_ok());
    }
}
