//! Event window validation
//!
//! Filters out events the solver must not reason about: zero/negative
//! durations, likely all-day items (crossing a calendar day or longer than
//! 23 hours), and events starting outside the attendee's stated work window.
//! External attendees have no stated preference, so their check skips the
//! work-window test.

use chrono::Datelike;
use tessera_domain::utils::clock::iso_weekday;
use tessera_domain::{constants, Event, UserPreference};

/// Whether an internal attendee's event participates in scheduling.
pub fn validate_event_window(event: &Event, preference: &UserPreference) -> bool {
    if !validate_event_window_external(event) {
        return false;
    }

    let day = iso_weekday(event.start_date);
    let (Ok(work_start), Ok(work_end)) = (preference.day_start(day), preference.day_end(day))
    else {
        // No window configured for this weekday: nothing can be scheduled on it
        return false;
    };

    let start_time = event.start_date.time();
    start_time >= work_start && start_time <= work_end
}

/// Whether an external attendee's event participates in scheduling.
pub fn validate_event_window_external(event: &Event) -> bool {
    let minutes = event.duration_minutes();
    if minutes <= 0 {
        return false;
    }

    // Likely all-day: crosses a calendar day or runs longer than 23 hours
    if event.end_date.num_days_from_ce() - event.start_date.num_days_from_ce() >= 1 {
        return false;
    }
    if minutes > constants::MAX_EVENT_HOURS * 60 {
        return false;
    }

    true
}
