//! Timeslot generation
//!
//! Discretizes a work window into fixed-size tiles, per attendee per day.
//! Fine slots are 15 minutes, lite slots 30. The first day of a scheduling
//! window may begin mid-window: generation then starts at the instant's
//! granularity boundary rather than the work start, returns nothing when the
//! day is already exhausted, and falls back to the whole window when the
//! instant is still before work start.
//!
//! Slots tile their window exactly: `slot[i].end == slot[i+1].start`,
//! ascending, no overlaps.

use chrono::{Datelike, Duration, NaiveDateTime};
use chrono_tz::Tz;
use tessera_domain::utils::clock::{anchor_in_tz, floor_to_granularity, iso_weekday, render_in};
use tessera_domain::{DayOfWeek, Granularity, MonthDay, Result, TimeSlot, UserPreference};

/// Generate fine (15 min) slots for one attendee day.
pub fn generate_time_slots(
    host_start: NaiveDateTime,
    host_id: &str,
    preference: &UserPreference,
    host_timezone: Tz,
    user_timezone: Tz,
    is_first_day: bool,
) -> Result<Vec<TimeSlot>> {
    generate(host_start, host_id, preference, host_timezone, user_timezone, Granularity::Fine, is_first_day)
}

/// Generate lite (30 min) slots for one attendee day.
pub fn generate_time_slots_lite(
    host_start: NaiveDateTime,
    host_id: &str,
    preference: &UserPreference,
    host_timezone: Tz,
    user_timezone: Tz,
    is_first_day: bool,
) -> Result<Vec<TimeSlot>> {
    generate(host_start, host_id, preference, host_timezone, user_timezone, Granularity::Lite, is_first_day)
}

fn generate(
    host_start: NaiveDateTime,
    host_id: &str,
    preference: &UserPreference,
    host_timezone: Tz,
    user_timezone: Tz,
    granularity: Granularity,
    is_first_day: bool,
) -> Result<Vec<TimeSlot>> {
    let instant = anchor_in_tz(host_start, host_timezone)?;
    let by_user = render_in(instant, user_timezone);
    let user_day = iso_weekday(by_user);

    // Preference times live on the attendee's wall clock; re-render both
    // window edges in host time on this day.
    let work_start = preference.day_start(user_day)?;
    let work_end = preference.day_end(user_day)?;
    let window_minutes = (work_end - work_start).num_minutes();

    let start_by_host =
        render_in(anchor_in_tz(by_user.date().and_time(work_start), user_timezone)?, host_timezone);
    let end_by_host =
        render_in(anchor_in_tz(by_user.date().and_time(work_end), user_timezone)?, host_timezone);

    if !is_first_day {
        return Ok(tile(start_by_host, window_minutes, host_id, granularity, host_start));
    }

    let now_by_host = render_in(instant, host_timezone);

    // Day already exhausted
    if now_by_host > end_by_host {
        return Ok(Vec::new());
    }

    // Window not yet open: the whole remaining window is available
    if now_by_host < start_by_host {
        return Ok(tile(start_by_host, window_minutes, host_id, granularity, host_start));
    }

    // Mid-window: snap down to the granularity boundary and tile to work end
    let slot_start = floor_to_granularity(now_by_host, granularity.minutes());
    let remaining = (end_by_host - slot_start).num_minutes();
    Ok(tile(slot_start, remaining, host_id, granularity, host_start))
}

/// Emit `ceil(total_minutes / granularity)` contiguous slots from `start`.
fn tile(
    start: NaiveDateTime,
    total_minutes: i64,
    host_id: &str,
    granularity: Granularity,
    host_start: NaiveDateTime,
) -> Vec<TimeSlot> {
    let step = granularity.minutes();
    let day_of_week = DayOfWeek::from(host_start.weekday());
    let date = host_start.date();
    let month_day = MonthDay::from_date(date);

    let mut slots = Vec::new();
    let mut offset = 0;
    while offset < total_minutes {
        let slot_start = start + Duration::minutes(offset);
        let slot_end = slot_start + Duration::minutes(step);
        slots.push(TimeSlot {
            day_of_week,
            start_time: slot_start.time(),
            end_time: slot_end.time(),
            host_id: host_id.to_string(),
            month_day: month_day.clone(),
            date,
        });
        offset += step;
    }

    slots
}
