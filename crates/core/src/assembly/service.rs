//! Request assembly
//!
//! Runs the preparation chain once per attendee population (host-only,
//! internal attendees, external attendees), then concatenates and
//! deduplicates the results into one solver plan. Slots, user bodies and
//! breaks dedup by deep equality; events by id; event parts by
//! (event id, part). An empty event-part, timeslot or user list after
//! assembly is fatal: there is nothing meaningful to solve.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};
use tessera_domain::constants::{
    EXTERNAL_MAX_NUMBER_OF_MEETINGS, EXTERNAL_MAX_WORKLOAD_PERCENT,
    EXTERNAL_MIN_NUMBER_OF_BREAKS,
};
use tessera_domain::utils::clock::{anchor_in_tz, floor_to_granularity, iso_weekday, render_in};
use tessera_domain::{
    AssembledPlan, BufferTimeObject, DayOfWeek, Event, EventPart, Granularity,
    MeetingAssistAttendee, MonthDay, PartedEvent, PlannerTimeRange, Reminder, Result,
    TesseraError, TimeSlot, UserPlannerRequestBody, UserPreference, WorkTime,
};
use tracing::{debug, warn};

use super::ports::SchedulingStore;
use crate::scheduling::breaks::BreakPlanner;
use crate::scheduling::partition::{merge_buffer_parts, partition_event};
use crate::scheduling::time_slots::{generate_time_slots, generate_time_slots_lite};
use crate::scheduling::validate::{validate_event_window, validate_event_window_external};
use crate::scheduling::work_times::{
    build_work_times, build_work_times_from_events, total_working_hours,
    total_working_hours_from_events,
};

/// One complete scheduling-preparation invocation.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub host_id: String,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub host_timezone: Tz,
    pub internal_attendees: Vec<MeetingAssistAttendee>,
    pub external_attendees: Vec<MeetingAssistAttendee>,
    /// Host-authored meeting events not yet in the calendar store
    pub new_host_events: Vec<Event>,
    /// Prior plan's events, persisted alongside for solver-side diffing
    pub old_events: Vec<Event>,
    pub host_buffer_times: Vec<BufferTimeObject>,
    pub host_reminders: Vec<Reminder>,
    pub granularity: Granularity,
}

/// Per-population assembly output prior to dedup
#[derive(Debug, Default)]
struct Contribution {
    timeslots: Vec<TimeSlot>,
    user_list: Vec<UserPlannerRequestBody>,
    event_parts: Vec<EventPart>,
    all_events: Vec<Event>,
    breaks: Vec<Event>,
    old_attendee_events: Vec<Event>,
}

/// Assembles the deduplicated solver plan for a run.
pub struct RequestAssembler {
    store: Arc<dyn SchedulingStore>,
    break_planner: BreakPlanner,
    concurrency: usize,
}

impl RequestAssembler {
    pub fn new(
        store: Arc<dyn SchedulingStore>,
        break_planner: BreakPlanner,
        concurrency: usize,
    ) -> Self {
        Self { store, break_planner, concurrency: concurrency.max(1) }
    }

    /// Assemble the plan across all three attendee populations.
    pub async fn assemble(&self, request: &AssemblyRequest) -> Result<AssembledPlan> {
        let host_is_internal =
            request.internal_attendees.iter().any(|a| a.user_id == request.host_id);

        let mut contributions: Vec<Contribution> = Vec::new();

        if !host_is_internal {
            if let Some(host) = self.host_contribution(request).await? {
                contributions.push(host);
            }
        }

        // Per-attendee fetches are independent; fan out with a bounded pool
        // and join in attendee order before dedup
        let internal: Vec<Result<Option<Contribution>>> =
            stream::iter(request.internal_attendees.iter())
                .map(|attendee| self.internal_contribution(request, attendee))
                .buffered(self.concurrency)
                .collect()
                .await;
        for contribution in internal {
            if let Some(c) = contribution? {
                contributions.push(c);
            }
        }

        let external: Vec<Result<Option<Contribution>>> =
            stream::iter(request.external_attendees.iter())
                .map(|attendee| self.external_contribution(request, attendee))
                .buffered(self.concurrency)
                .collect()
                .await;
        for contribution in external {
            if let Some(c) = contribution? {
                contributions.push(c);
            }
        }

        let mut timeslots = Vec::new();
        let mut user_list = Vec::new();
        let mut event_parts = Vec::new();
        let mut all_events = Vec::new();
        let mut breaks = Vec::new();
        let mut old_attendee_events = Vec::new();
        for contribution in contributions {
            timeslots.extend(contribution.timeslots);
            user_list.extend(contribution.user_list);
            event_parts.extend(contribution.event_parts);
            all_events.extend(contribution.all_events);
            breaks.extend(contribution.breaks);
            old_attendee_events.extend(contribution.old_attendee_events);
        }

        let timeslots = dedup_by_equality(timeslots);
        let user_list = dedup_by_equality(user_list);
        let breaks = dedup_by_equality(breaks);
        let all_events = dedup_by_key(all_events, |e: &Event| e.id.clone());
        let event_parts =
            dedup_by_key(event_parts, |p: &EventPart| (p.event_id.clone(), p.part));
        let old_attendee_events = dedup_by_key(old_attendee_events, |e: &Event| e.id.clone());

        if event_parts.is_empty() {
            return Err(TesseraError::InvalidInput("no event parts after assembly".into()));
        }
        if timeslots.is_empty() {
            return Err(TesseraError::InvalidInput("no timeslots after assembly".into()));
        }
        if user_list.is_empty() {
            return Err(TesseraError::InvalidInput("no users after assembly".into()));
        }

        Ok(AssembledPlan {
            host_id: request.host_id.clone(),
            host_timezone: request.host_timezone,
            window_start_date: request.window_start,
            window_end_date: request.window_end,
            timeslots,
            user_list,
            event_parts,
            all_events,
            breaks,
            old_events: request.old_events.clone(),
            old_attendee_events,
            new_host_buffer_times: request.host_buffer_times.clone(),
            new_host_reminders: request.host_reminders.clone(),
        })
    }

    /// Host-only population: the host is not among the internal attendees.
    async fn host_contribution(&self, request: &AssemblyRequest) -> Result<Option<Contribution>> {
        let Some(preference) = self.store.get_user_preference(&request.host_id).await? else {
            return Err(TesseraError::NotFound(format!(
                "no preference profile for host {}",
                request.host_id
            )));
        };

        self.preference_contribution(request, &request.host_id, request.host_timezone, &preference)
            .await
            .map(Some)
    }

    /// One internal attendee's contribution; attendees without a stored
    /// preference are skipped (they are external by definition).
    async fn internal_contribution(
        &self,
        request: &AssemblyRequest,
        attendee: &MeetingAssistAttendee,
    ) -> Result<Option<Contribution>> {
        let preference = match self.store.get_user_preference(&attendee.user_id).await {
            Ok(Some(preference)) => preference,
            Ok(None) => {
                warn!(user_id = %attendee.user_id, "internal attendee has no preference; skipping");
                return Ok(None);
            }
            Err(err) => {
                warn!(user_id = %attendee.user_id, error = %err, "preference fetch failed; skipping");
                return Ok(None);
            }
        };

        self.preference_contribution(request, &attendee.user_id, attendee.timezone, &preference)
            .await
            .map(Some)
    }

    /// Shared path for any participant with a stored preference.
    async fn preference_contribution(
        &self,
        request: &AssemblyRequest,
        user_id: &str,
        user_timezone: Tz,
        preference: &UserPreference,
    ) -> Result<Contribution> {
        let calendar_id = match self.store.get_primary_calendar_id(user_id).await {
            Ok(id) => id,
            Err(err) => {
                warn!(%user_id, error = %err, "primary calendar lookup failed");
                None
            }
        };

        let mut events = match self
            .store
            .list_events_for_window(user_id, request.window_start, request.window_end, user_timezone)
            .await
        {
            Ok(events) => events,
            Err(err) => {
                warn!(%user_id, error = %err, "event fetch failed; continuing with empty calendar");
                Vec::new()
            }
        };

        // The host's new meeting events and woven buffers join their calendar
        if user_id == request.host_id {
            events.extend(request.new_host_events.iter().cloned());
            for buffer in &request.host_buffer_times {
                if let Some(before) = &buffer.before_event {
                    events.push(before.clone());
                }
                if let Some(after) = &buffer.after_event {
                    events.push(after.clone());
                }
            }
        }

        let breaks = self
            .break_planner
            .generate_breaks_for_window(
                preference,
                user_id,
                request.window_start,
                request.window_end,
                request.host_timezone,
                calendar_id.as_deref(),
            )
            .await?;

        let mut valid_events: Vec<Event> = events
            .into_iter()
            .filter(|e| e.is_buffer() || validate_event_window(e, preference))
            .collect();
        valid_events.extend(breaks.iter().cloned());

        let work_times = build_work_times(
            preference,
            &request.host_id,
            user_id,
            request.host_timezone,
            user_timezone,
            request.window_start.date(),
        )?;

        let timeslots = self.window_timeslots(request, preference, user_timezone)?;

        let user_body = UserPlannerRequestBody {
            id: user_id.to_string(),
            host_id: request.host_id.clone(),
            max_work_load_percent: preference.max_work_load_percent,
            back_to_back_meetings: preference.back_to_back_meetings,
            max_number_of_meetings: preference.max_number_of_meetings,
            min_number_of_breaks: preference.min_number_of_breaks,
            work_times: work_times.clone(),
        };

        let parted: Vec<PartedEvent> = valid_events
            .iter()
            .flat_map(|e| partition_event(e, &request.host_id, request.granularity))
            .collect();
        let merged = merge_buffer_parts(parted);

        let event_parts: Vec<EventPart> = merged
            .iter()
            .filter_map(|p| {
                let hours = total_working_hours(preference, p.event.start_date).unwrap_or(0.0);
                format_event_part(p, &user_body, hours, request.host_timezone)
            })
            .collect();

        Ok(Contribution {
            timeslots,
            user_list: vec![user_body],
            event_parts,
            all_events: valid_events,
            breaks,
            old_attendee_events: Vec::new(),
        })
    }

    /// External attendee: no stored preference. A permissive profile is
    /// substituted and the work times come from the spread of their own
    /// events. Slot sets are generated fresh for every day of the window.
    async fn external_contribution(
        &self,
        request: &AssemblyRequest,
        attendee: &MeetingAssistAttendee,
    ) -> Result<Option<Contribution>> {
        let events = match self
            .store
            .list_meeting_events_for_attendee(
                &attendee.id,
                request.window_start,
                request.window_end,
                attendee.timezone,
            )
            .await
        {
            Ok(events) => events,
            Err(err) => {
                warn!(attendee_id = %attendee.id, error = %err, "attendee event fetch failed");
                Vec::new()
            }
        };

        let valid_events: Vec<Event> =
            events.into_iter().filter(validate_event_window_external).collect();
        if valid_events.is_empty() {
            debug!(attendee_id = %attendee.id, "external attendee has no usable events");
            return Ok(None);
        }

        let work_times = build_work_times_from_events(
            &request.host_id,
            &attendee.user_id,
            &valid_events,
            request.host_timezone,
        )?;

        let timeslots = external_window_timeslots(
            &work_times,
            request.window_start,
            request.window_end,
            &request.host_id,
            request.granularity,
        );

        let user_body = UserPlannerRequestBody {
            id: attendee.user_id.clone(),
            host_id: request.host_id.clone(),
            max_work_load_percent: EXTERNAL_MAX_WORKLOAD_PERCENT,
            back_to_back_meetings: false,
            max_number_of_meetings: EXTERNAL_MAX_NUMBER_OF_MEETINGS,
            min_number_of_breaks: EXTERNAL_MIN_NUMBER_OF_BREAKS,
            work_times: work_times.clone(),
        };

        let parted: Vec<PartedEvent> = valid_events
            .iter()
            .flat_map(|e| partition_event(e, &request.host_id, request.granularity))
            .collect();
        let merged = merge_buffer_parts(parted);

        let event_parts: Vec<EventPart> = merged
            .iter()
            .filter_map(|p| {
                let hours = total_working_hours_from_events(
                    &valid_events,
                    p.event.start_date,
                    request.host_timezone,
                );
                format_event_part(p, &user_body, hours, request.host_timezone)
            })
            .collect();

        Ok(Some(Contribution {
            timeslots,
            user_list: vec![user_body],
            event_parts,
            all_events: valid_events.clone(),
            breaks: Vec::new(),
            old_attendee_events: valid_events,
        }))
    }

    /// Timeslots for every day of the window, first day honoring its
    /// mid-window start.
    fn window_timeslots(
        &self,
        request: &AssemblyRequest,
        preference: &UserPreference,
        user_timezone: Tz,
    ) -> Result<Vec<TimeSlot>> {
        let days = (request.window_end - request.window_start).num_days();
        let mut slots = Vec::new();

        for day_index in 0..=days {
            let day_start = request.window_start + Duration::days(day_index);
            let generated = match request.granularity {
                Granularity::Fine => generate_time_slots(
                    day_start,
                    &request.host_id,
                    preference,
                    request.host_timezone,
                    user_timezone,
                    day_index == 0,
                ),
                Granularity::Lite => generate_time_slots_lite(
                    day_start,
                    &request.host_id,
                    preference,
                    request.host_timezone,
                    user_timezone,
                    day_index == 0,
                ),
            };
            match generated {
                Ok(day_slots) => slots.extend(day_slots),
                // A weekday missing from the preference skips that day only
                Err(TesseraError::NotFound(reason)) => {
                    debug!(%reason, "skipping day without work window");
                }
                Err(other) => return Err(other),
            }
        }

        Ok(slots)
    }
}

/// Tile each day of the window from the attendee's empirical work times.
fn external_window_timeslots(
    work_times: &[WorkTime],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    host_id: &str,
    granularity: Granularity,
) -> Vec<TimeSlot> {
    let days = (window_end - window_start).num_days();
    let mut slots = Vec::new();

    for day_index in 0..=days {
        let day_start = window_start + Duration::days(day_index);
        let weekday = iso_weekday(day_start);
        let Some(work_time) = work_times.iter().find(|w| w.day_of_week.iso() == weekday) else {
            continue;
        };

        let instant = if day_index == 0 { Some(day_start) } else { None };
        slots.extend(tile_work_time(work_time, day_start.date(), host_id, granularity, instant));
    }

    slots
}

/// Tile one day's work window; on the first day the tiling starts at the
/// instant's granularity boundary and is skipped when the window is past.
fn tile_work_time(
    work_time: &WorkTime,
    date: NaiveDate,
    host_id: &str,
    granularity: Granularity,
    first_day_instant: Option<NaiveDateTime>,
) -> Vec<TimeSlot> {
    let mut start = date.and_time(work_time.start_time);
    let end = date.and_time(work_time.end_time);

    if let Some(instant) = first_day_instant {
        if instant > end {
            return Vec::new();
        }
        if instant > start {
            start = floor_to_granularity(instant, granularity.minutes());
        }
    }

    let day_of_week = DayOfWeek::from(chrono::Datelike::weekday(&date));
    let month_day = MonthDay::from_date(date);
    let step = granularity.minutes();
    let total = (end - start).num_minutes();

    let mut slots = Vec::new();
    let mut offset = 0;
    while offset < total {
        let slot_start = start + Duration::minutes(offset);
        slots.push(TimeSlot {
            day_of_week,
            start_time: slot_start.time(),
            end_time: (slot_start + Duration::minutes(step)).time(),
            host_id: host_id.to_string(),
            month_day: month_day.clone(),
            date,
        });
        offset += step;
    }

    slots
}

/// Format one parted event into its solver-facing record. All-day events are
/// excluded from scheduling.
fn format_event_part(
    parted: &PartedEvent,
    user: &UserPlannerRequestBody,
    total_working_hours: f64,
    host_timezone: Tz,
) -> Option<EventPart> {
    let event = &parted.event;
    if event.all_day {
        return None;
    }

    Some(EventPart {
        group_id: parted.group_id.clone(),
        event_id: event.id.clone(),
        part: parted.part,
        last_part: parted.last_part,
        meeting_part: parted.meeting_part,
        meeting_last_part: parted.meeting_last_part,
        start_date: event.start_date,
        end_date: event.end_date,
        user_id: event.user_id.clone(),
        host_id: parted.host_id.clone(),
        user: user.clone(),
        priority: event.priority,
        modifiable: event.modifiable,
        is_pre_event: event.is_pre_event,
        is_post_event: event.is_post_event,
        for_event_id: event.for_event_id.clone(),
        is_meeting: event.is_meeting,
        is_external_meeting: event.is_external_meeting,
        is_meeting_modifiable: event.is_meeting_modifiable,
        is_external_meeting_modifiable: event.is_external_meeting_modifiable,
        gap: event.is_break,
        preferred_time_ranges: translate_time_ranges(event, &parted.host_id, host_timezone),
        total_working_hours,
        recurring_event_id: event.recurring_event_id.clone(),
        meeting_id: event.meeting_id.clone(),
    })
}

/// Render an event's preferred windows on the host's wall clock.
fn translate_time_ranges(event: &Event, host_id: &str, host_timezone: Tz) -> Vec<PlannerTimeRange> {
    event
        .preferred_time_ranges
        .iter()
        .filter_map(|range| {
            let start =
                anchor_in_tz(event.start_date.date().and_time(range.start_time), event.timezone)
                    .ok()?;
            let end =
                anchor_in_tz(event.start_date.date().and_time(range.end_time), event.timezone)
                    .ok()?;
            let day_of_week =
                range.day_of_week.and_then(|day| DayOfWeek::from_iso(day).ok());
            Some(PlannerTimeRange {
                day_of_week,
                start_time: render_in(start, host_timezone).time(),
                end_time: render_in(end, host_timezone).time(),
                event_id: event.id.clone(),
                user_id: event.user_id.clone(),
                host_id: host_id.to_string(),
            })
        })
        .collect()
}

/// Order-preserving dedup by deep equality.
fn dedup_by_equality<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Order-preserving dedup by extracted key.
fn dedup_by_key<T, K: std::hash::Hash + Eq>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::scheduling::test_fixtures::{event_on, naive};

    #[test]
    fn dedup_by_equality_is_idempotent() {
        let slots = vec![1, 2, 2, 3, 1];
        let once = dedup_by_equality(slots.clone());
        let mut doubled = once.clone();
        doubled.extend(once.clone());
        assert_eq!(dedup_by_equality(doubled), once);
        assert_eq!(once, vec![1, 2, 3]);
    }

    #[test]
    fn tiles_external_work_time_with_first_day_clamp() {
        let work_time = WorkTime {
            day_of_week: DayOfWeek::Monday,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            host_id: "host-1".into(),
            user_id: "ext-1".into(),
        };
        let date = chrono::NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();

        let full = tile_work_time(&work_time, date, "host-1", Granularity::Fine, None);
        assert_eq!(full.len(), 12);

        let clamped = tile_work_time(
            &work_time,
            date,
            "host-1",
            Granularity::Fine,
            Some(naive(2023, 6, 5, 10, 7)),
        );
        assert_eq!(clamped[0].start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(clamped.len(), 8);

        let exhausted = tile_work_time(
            &work_time,
            date,
            "host-1",
            Granularity::Fine,
            Some(naive(2023, 6, 5, 13, 0)),
        );
        assert!(exhausted.is_empty());
    }

    #[test]
    fn all_day_events_are_excluded_from_formatting() {
        let mut e = event_on("e1", 2023, 6, 5, (9, 0), (10, 0));
        e.all_day = true;
        let parted = partition_event(&e, "host-1", Granularity::Fine);
        let user = UserPlannerRequestBody {
            id: "user-1".into(),
            host_id: "host-1".into(),
            max_work_load_percent: 80,
            back_to_back_meetings: false,
            max_number_of_meetings: 6,
            min_number_of_breaks: 2,
            work_times: Vec::new(),
        };
        assert!(format_event_part(&parted[0], &user, 8.0, chrono_tz::UTC).is_none());
    }
}
