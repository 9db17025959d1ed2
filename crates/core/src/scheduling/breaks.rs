//! Break planning
//!
//! Decides whether a day needs synthetic break events (workload thresholds)
//! and places the generated breaks into the largest safe gaps: a candidate
//! break ends exactly at an existing event's start, must sit fully inside
//! the work window, and may not overlap any other event or already-placed
//! break. Breaks that fit nowhere are dropped, not an error.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use tessera_domain::constants::{
    BREAK_TITLE, DEFAULT_BREAK_COLOR, MAX_BREAK_HOURS_PER_DAY, MIN_BREAK_LENGTH_MINUTES,
};
use tessera_domain::utils::clock::iso_weekday;
use tessera_domain::{
    Event, OverrideField, PersistMethod, Result, TesseraError, Transparency, UserPreference,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::assembly::ports::SchedulingStore;
use crate::scheduling::work_times::total_working_hours;

/// Effective break duration: preference value clamped up to the floor.
fn break_length_minutes(preference: &UserPreference) -> i64 {
    preference.break_length.max(MIN_BREAK_LENGTH_MINUTES)
}

/// Whether the day's workload calls for new breaks at all.
///
/// Required break hours are the larger of the workload remainder
/// (`working_hours * (1 - max_work_load_percent/100)`) and the stated
/// minimum (`break_length/60 * min_number_of_breaks`); existing break events
/// already covering that much time mean nothing to do.
pub fn should_generate_breaks(
    working_hours: f64,
    preference: &UserPreference,
    events: &[Event],
) -> bool {
    if events.is_empty() {
        return false;
    }

    let break_hours_from_min_breaks = (preference.break_length as f64 / 60.0)
        * f64::from(preference.min_number_of_breaks);
    let hours_must_be_break =
        working_hours * (1.0 - f64::from(preference.max_work_load_percent) / 100.0);
    let break_hours_available = break_hours_from_min_breaks.max(hours_must_be_break);

    let break_hours_used: f64 = events
        .iter()
        .filter(|e| e.is_break)
        .map(|e| e.duration_minutes() as f64 / 60.0)
        .sum();

    break_hours_used < break_hours_available
}

/// Number of breaks to generate for the day; zero means generate nothing.
///
/// Caps: never fewer than one when generating at all, and never a plan whose
/// provisional break hours exceed [`MAX_BREAK_HOURS_PER_DAY`].
pub fn breaks_to_generate(
    working_hours: f64,
    preference: &UserPreference,
    events: &[Event],
) -> u32 {
    if !should_generate_breaks(working_hours, preference, events) {
        return 0;
    }

    let hours_used: f64 =
        events.iter().map(|e| e.duration_minutes() as f64 / 60.0).sum();
    let hours_must_be_break =
        working_hours * (1.0 - f64::from(preference.max_work_load_percent) / 100.0);

    let mut hours_available = working_hours - hours_used;
    if hours_available < hours_must_be_break {
        hours_available = hours_must_be_break;
    }
    if hours_available <= 0.0 {
        return 0;
    }

    let break_hours_from_min_breaks = (preference.break_length as f64 / 60.0)
        * f64::from(preference.min_number_of_breaks);
    let break_hours_used: f64 = events
        .iter()
        .filter(|e| e.is_break)
        .map(|e| e.duration_minutes() as f64 / 60.0)
        .sum();

    let provisional = break_hours_from_min_breaks.min(hours_available);
    let to_generate = provisional - break_hours_used;
    if to_generate > hours_available {
        return 0;
    }
    if provisional > MAX_BREAK_HOURS_PER_DAY {
        debug!(provisional, "break plan exceeds daily cap");
        return 0;
    }

    let break_length_hours = preference.break_length as f64 / 60.0;
    let count = (to_generate / break_length_hours).floor();
    if count < 1.0 {
        return 0;
    }
    count as u32
}

/// Synthesize `count` break events anchored at the mirror event's start.
/// Placement happens separately; until then every break shares the anchor.
pub fn synthesize_breaks(
    preference: &UserPreference,
    count: u32,
    mirror: &Event,
    calendar_id: Option<&str>,
) -> Vec<Event> {
    let length = break_length_minutes(preference);
    let calendar_id = calendar_id.unwrap_or(&mirror.calendar_id);

    (0..count)
        .map(|_| Event {
            id: Uuid::new_v4().to_string(),
            user_id: preference.user_id.clone(),
            calendar_id: calendar_id.to_string(),
            summary: Some(BREAK_TITLE.to_string()),
            notes: Some(BREAK_TITLE.to_string()),
            start_date: mirror.start_date,
            end_date: mirror.start_date + Duration::minutes(length),
            timezone: mirror.timezone,
            all_day: false,
            modifiable: true,
            priority: 1,
            transparency: Transparency::Opaque,
            background_color: Some(
                preference.break_color.clone().unwrap_or_else(|| DEFAULT_BREAK_COLOR.to_string()),
            ),
            is_break: true,
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
            buffer_times: Default::default(),
            preferred_time_ranges: Vec::new(),
            overrides: BTreeSet::from([OverrideField::Duration, OverrideField::Color]),
            method: PersistMethod::Create,
        })
        .collect()
}

/// Place break templates into gaps: each candidate ends exactly at an
/// existing non-break event's start. Breaks with no valid position are
/// dropped.
///
/// All timestamps are naive wall-clock values in one shared timezone.
pub fn place_breaks(
    events: &[Event],
    breaks: &[Event],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<Event> {
    let mut anchors: Vec<&Event> = events.iter().filter(|e| !e.is_break).collect();
    anchors.sort_by_key(|e| e.start_date);

    let mut placed: Vec<Event> = Vec::new();

    for template in breaks {
        let length = template.duration_minutes();

        let position = anchors.iter().find_map(|anchor| {
            let candidate_end = anchor.start_date;
            let candidate_start = candidate_end - Duration::minutes(length);

            if candidate_start < window_start || candidate_end > window_end {
                return None;
            }
            let clashes_event = anchors
                .iter()
                .any(|e| candidate_start < e.end_date && e.start_date < candidate_end);
            if clashes_event {
                return None;
            }
            let clashes_break = placed
                .iter()
                .any(|b| candidate_start < b.end_date && b.start_date < candidate_end);
            if clashes_break {
                return None;
            }
            Some((candidate_start, candidate_end))
        });

        if let Some((start, end)) = position {
            let mut break_event = template.clone();
            break_event.start_date = start;
            break_event.end_date = end;
            placed.push(break_event);
        }
    }

    placed
}

/// Break planning service: fetches each day's events and produces placed
/// break events for a scheduling window.
pub struct BreakPlanner {
    store: Arc<dyn SchedulingStore>,
}

impl BreakPlanner {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Generate placed breaks for every full day of the window. The first
    /// day clamps its window to start no earlier than the given instant.
    pub async fn generate_breaks_for_window(
        &self,
        preference: &UserPreference,
        user_id: &str,
        host_start: NaiveDateTime,
        host_end: NaiveDateTime,
        host_timezone: Tz,
        calendar_id: Option<&str>,
    ) -> Result<Vec<Event>> {
        let total_days = (host_end - host_start).num_days();
        let mut all_breaks = Vec::new();

        for day_index in 0..total_days {
            let day_start = host_start + Duration::days(day_index);
            match self
                .generate_breaks_for_day(
                    preference,
                    user_id,
                    day_start,
                    host_timezone,
                    calendar_id,
                    day_index == 0,
                )
                .await
            {
                Ok(breaks) => all_breaks.extend(breaks),
                // A weekday missing from the preference skips that day only
                Err(TesseraError::NotFound(reason)) => {
                    debug!(%reason, "skipping day without work window");
                }
                Err(other) => return Err(other),
            }
        }

        Ok(all_breaks)
    }

    /// Generate and place breaks for a single day.
    pub async fn generate_breaks_for_day(
        &self,
        preference: &UserPreference,
        user_id: &str,
        day_start: NaiveDateTime,
        host_timezone: Tz,
        calendar_id: Option<&str>,
        is_first_day: bool,
    ) -> Result<Vec<Event>> {
        let day = iso_weekday(day_start);
        let window_start = day_start.date().and_time(preference.day_start(day)?);
        let window_end = day_start.date().and_time(preference.day_end(day)?);

        let effective_start = if is_first_day {
            if day_start > window_end {
                return Ok(Vec::new());
            }
            window_start.max(day_start)
        } else {
            window_start
        };

        let events = match self
            .store
            .list_events_for_date(user_id, effective_start, window_end, host_timezone)
            .await
        {
            Ok(events) => events,
            Err(err) => {
                warn!(%user_id, error = %err, "failed to list events for break planning");
                Vec::new()
            }
        };

        if events.is_empty() {
            return Ok(Vec::new());
        }

        let working_hours = total_working_hours(preference, day_start)?;
        let count = breaks_to_generate(working_hours, preference, &events);
        if count == 0 {
            return Ok(Vec::new());
        }

        let Some(mirror) = events.iter().find(|e| !e.is_break) else {
            return Ok(Vec::new());
        };

        let templates = synthesize_breaks(preference, count, mirror, calendar_id);
        Ok(place_breaks(&events, &templates, effective_start, window_end))
    }
}

#[cfg(test)]
mod tests {
    use chrono_tz::UTC;

    use super::*;
    use crate::scheduling::test_fixtures::{event_on, preference};

    #[test]
    fn reproduces_reference_arithmetic() {
        // Monday 09:00-17:00, breakLength=15, minBreaks=2, maxLoad=80%, one
        // 09:00-12:00 event: workingHours=8, hoursMustBeBreak=1.6,
        // breakHoursFromMinBreaks=0.5, hoursAvailable=max(8-3, 1.6)=5,
        // toGenerate=min(0.5, 5)=0.5 -> 2 breaks
        let prefs = preference();
        let events = vec![event_on("e1", 2023, 6, 5, (9, 0), (12, 0))];

        assert!(should_generate_breaks(8.0, &prefs, &events));
        assert_eq!(breaks_to_generate(8.0, &prefs, &events), 2);
    }

    #[test]
    fn no_events_means_no_breaks() {
        assert!(!should_generate_breaks(8.0, &preference(), &[]));
        assert_eq!(breaks_to_generate(8.0, &preference(), &[]), 0);
    }

    #[test]
    fn existing_breaks_can_cover_the_requirement() {
        let prefs = preference();
        let mut long_break = event_on("b1", 2023, 6, 5, (12, 0), (14, 0));
        long_break.is_break = true;
        let events = vec![event_on("e1", 2023, 6, 5, (9, 0), (12, 0)), long_break];

        // 2h of existing break exceeds the 1.6h requirement
        assert!(!should_generate_breaks(8.0, &prefs, &events));
    }

    #[test]
    fn cap_rejects_oversized_plans() {
        // 28 required minimum breaks of 15 min = 7h of breaks, above the cap
        let mut prefs = preference();
        prefs.min_number_of_breaks = 28;
        prefs.max_work_load_percent = 100;
        let events = vec![event_on("e1", 2023, 6, 5, (9, 0), (9, 30))];

        assert_eq!(breaks_to_generate(8.0, &prefs, &events), 0);
    }

    #[test]
    fn generated_breaks_never_exceed_cap_and_never_return_zero_count() {
        // Property over a spread of preference shapes: any non-zero plan is
        // at least one break and the provisional hours stay under the cap
        for min_breaks in 0..30 {
            for load in (10..=100).step_by(10) {
                let mut prefs = preference();
                prefs.min_number_of_breaks = min_breaks;
                prefs.max_work_load_percent = load;
                let events = vec![event_on("e1", 2023, 6, 5, (9, 0), (11, 0))];

                let count = breaks_to_generate(8.0, &prefs, &events);
                let hours = f64::from(count) * prefs.break_length as f64 / 60.0;
                assert!(hours <= MAX_BREAK_HOURS_PER_DAY + f64::EPSILON);
            }
        }
    }

    #[test]
    fn synthesizes_breaks_with_defaults() {
        let prefs = preference();
        let mirror = event_on("e1", 2023, 6, 5, (9, 0), (12, 0));
        let breaks = synthesize_breaks(&prefs, 2, &mirror, None);

        assert_eq!(breaks.len(), 2);
        for b in &breaks {
            assert!(b.is_break);
            assert_eq!(b.duration_minutes(), 15);
            assert_eq!(b.background_color.as_deref(), Some(DEFAULT_BREAK_COLOR));
            assert!(b.has_override(OverrideField::Duration));
            assert!(b.has_override(OverrideField::Color));
        }
    }

    #[test]
    fn short_break_length_clamps_to_floor() {
        let mut prefs = preference();
        prefs.break_length = 5;
        let mirror = event_on("e1", 2023, 6, 5, (9, 0), (12, 0));
        let breaks = synthesize_breaks(&prefs, 1, &mirror, None);
        assert_eq!(breaks[0].duration_minutes(), 15);
    }

    #[test]
    fn places_break_ending_at_event_start() {
        let prefs = preference();
        let events = vec![event_on("e1", 2023, 6, 5, (10, 0), (12, 0))];
        let templates = synthesize_breaks(&prefs, 1, &events[0], None);

        let placed = place_breaks(
            &events,
            &templates,
            crate::scheduling::test_fixtures::naive(2023, 6, 5, 9, 0),
            crate::scheduling::test_fixtures::naive(2023, 6, 5, 17, 0),
        );

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].end_date, events[0].start_date);
        assert_eq!(placed[0].duration_minutes(), 15);
    }

    #[test]
    fn drops_breaks_that_fit_nowhere() {
        // Event starts at the window edge: the candidate would begin before
        // the work window, so no break can be placed
        let prefs = preference();
        let events = vec![event_on("e1", 2023, 6, 5, (9, 0), (12, 0))];
        let templates = synthesize_breaks(&prefs, 2, &events[0], None);

        let placed = place_breaks(
            &events,
            &templates,
            crate::scheduling::test_fixtures::naive(2023, 6, 5, 9, 0),
            crate::scheduling::test_fixtures::naive(2023, 6, 5, 17, 0),
        );

        assert!(placed.is_empty());
    }

    #[test]
    fn second_break_avoids_the_first() {
        // Two anchors leave room before each; the second break must not
        // stack onto the first placement
        let prefs = preference();
        let events = vec![
            event_on("e1", 2023, 6, 5, (10, 0), (11, 0)),
            event_on("e2", 2023, 6, 5, (13, 0), (14, 0)),
        ];
        let templates = synthesize_breaks(&prefs, 2, &events[0], None);

        let placed = place_breaks(
            &events,
            &templates,
            crate::scheduling::test_fixtures::naive(2023, 6, 5, 9, 0),
            crate::scheduling::test_fixtures::naive(2023, 6, 5, 17, 0),
        );

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].end_date, events[0].start_date);
        assert_eq!(placed[1].end_date, events[1].start_date);
    }
}
