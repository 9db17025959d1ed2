//! Shared builders for scheduling unit tests

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use chrono_tz::UTC;
use tessera_domain::{
    BufferTimes, DayTime, Event, PersistMethod, Transparency, UserPreference,
};

pub fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, 0))
        .unwrap_or_default()
}

/// Monday-to-Sunday 09:00-17:00 preference with the break settings used by
/// most break-planner tests.
pub fn preference() -> UserPreference {
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

pub fn event(id: &str, start: NaiveDateTime, end: NaiveDateTime, timezone: Tz) -> Event {
    Event {
        id: id.to_string(),
        user_id: "user-1".into(),
        calendar_id: "cal-1".into(),
        summary: Some(format!("Event {id}")),
        notes: None,
        start_date: start,
        end_date: end,
        timezone,
        all_day: false,
        modifiable: true,
        priority: 1,
        transparency: Transparency::Opaque,
        background_color: None,
        is_break: false,
        is_meeting: false,
        is_external_meeting: false,
        is_meeting_modifiable: false,
        is_external_meeting_modifiable: false,
        is_pre_event: false,
        is_post_event: false,
        pre_event_id: None,
        post_event_id: None,
        for_event_id: None,
        recurring_event_id: None,
        meeting_id: None,
        buffer_times: BufferTimes::default(),
        preferred_time_ranges: Vec::new(),
        overrides: BTreeSet::new(),
        method: PersistMethod::Update,
    }
}

pub fn event_on(
    id: &str,
    y: i32,
    mo: u32,
    d: u32,
    start: (u32, u32),
    end: (u32, u32),
) -> Event {
    event(id, naive(y, mo, d, start.0, start.1), naive(y, mo, d, end.0, end.1), UTC)
}
