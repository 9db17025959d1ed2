//! Work-time profile building
//!
//! Converts a user's per-weekday start/end preference into host-timezone
//! `WorkTime` entries. Internal attendees use their stated preference;
//! external attendees (no stored preference) get an empirical profile
//! derived from the spread of their own existing events.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tessera_domain::utils::clock::{
    anchor_in_tz, ceil_to_granularity, floor_to_granularity, iso_weekday, render_in,
};
use tessera_domain::{constants, DayOfWeek, Event, Result, UserPreference, WorkTime};

/// Build the 7 host-timezone work-time entries for an internal attendee.
///
/// Each weekday's start/end is anchored to that weekday in `anchor`'s ISO
/// week in the attendee's timezone, then re-rendered in the host timezone so
/// timezone skew (including cross-midnight shifts) lands in the times while
/// the weekday label stays the attendee's.
///
/// # Errors
/// A weekday missing from the preference fails the whole profile.
pub fn build_work_times(
    preference: &UserPreference,
    host_id: &str,
    user_id: &str,
    host_timezone: Tz,
    user_timezone: Tz,
    anchor: NaiveDate,
) -> Result<Vec<WorkTime>> {
    let anchor_day = i64::from(iso_weekday(anchor));
    let mut work_times = Vec::with_capacity(7);

    for day in 1..=7u8 {
        let date = anchor + Duration::days(i64::from(day) - anchor_day);
        let start = anchor_in_tz(date.and_time(preference.day_start(day)?), user_timezone)?;
        let end = anchor_in_tz(date.and_time(preference.day_end(day)?), user_timezone)?;

        work_times.push(WorkTime {
            day_of_week: DayOfWeek::from_iso(day)?,
            start_time: render_in(start, host_timezone).time(),
            end_time: render_in(end, host_timezone).time(),
            host_id: host_id.to_string(),
            user_id: user_id.to_string(),
        });
    }

    Ok(work_times)
}

/// Build work times for an external attendee from their existing events.
///
/// Per host-timezone weekday, the window is the min event start through the
/// max event end, snapped outward to the fine slot boundary. Weekdays
/// without events produce no entry.
pub fn build_work_times_from_events(
    host_id: &str,
    user_id: &str,
    events: &[Event],
    host_timezone: Tz,
) -> Result<Vec<WorkTime>> {
    let mut work_times = Vec::new();

    for day in 1..=7u8 {
        let Some((min_start, max_end)) = day_bounds(events, day, host_timezone) else {
            continue;
        };

        work_times.push(WorkTime {
            day_of_week: DayOfWeek::from_iso(day)?,
            start_time: floor_to_granularity(min_start, constants::FINE_GRANULARITY_MINUTES)
                .time(),
            end_time: ceil_to_granularity(max_end, constants::FINE_GRANULARITY_MINUTES).time(),
            host_id: host_id.to_string(),
            user_id: user_id.to_string(),
        });
    }

    Ok(work_times)
}

/// Length of an internal attendee's work window on the day of `host_start`,
/// in fractional hours.
pub fn total_working_hours(
    preference: &UserPreference,
    host_start: NaiveDateTime,
) -> Result<f64> {
    preference.working_hours(iso_weekday(host_start))
}

/// Empirical working hours for an external attendee on the day of
/// `host_start`: min-start to max-end of their same-day events, snapped to
/// the fine slot boundary. Zero when the day has no events.
pub fn total_working_hours_from_events(
    events: &[Event],
    host_start: NaiveDateTime,
    host_timezone: Tz,
) -> f64 {
    let day = iso_weekday(host_start);
    let Some((min_start, max_end)) = day_bounds(events, day, host_timezone) else {
        return 0.0;
    };

    let start = floor_to_granularity(min_start, constants::FINE_GRANULARITY_MINUTES);
    let end = ceil_to_granularity(max_end, constants::FINE_GRANULARITY_MINUTES);
    (end - start).num_minutes() as f64 / 60.0
}

/// Host-timezone (min start, max end) over events falling on the given ISO
/// weekday, or None when no event does.
fn day_bounds(events: &[Event], iso_day: u8, host_timezone: Tz) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;

    for event in events {
        let Ok(start) = anchor_in_tz(event.start_date, event.timezone) else {
            continue;
        };
        let Ok(end) = anchor_in_tz(event.end_date, event.timezone) else {
            continue;
        };

        let start_by_host = render_in(start, host_timezone);
        if iso_weekday(start_by_host) != iso_day {
            continue;
        }
        let end_by_host = render_in(end, host_timezone);

        bounds = Some(match bounds {
            None => (start_by_host, end_by_host),
            Some((min_start, max_end)) => {
                (min_start.min(start_by_host), max_end.max(end_by_host))
            }
        });
    }

    bounds
}
