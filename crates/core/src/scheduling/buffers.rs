//! Buffer ("time-blocking") event synthesis
//!
//! Weaves pre/post shadow events around a real event from a buffer
//! specification sourced from a category or user defaults. A pre-buffer ends
//! exactly at the event's start; a post-buffer starts exactly at its end.
//! Links are bidirectional: the real event gains `pre_event_id` /
//! `post_event_id` pointers and each buffer carries `for_event_id` back.
//! Buffer events are never themselves buffered.

use chrono::Duration;
use tessera_domain::constants::BUFFER_TITLE;
use tessera_domain::{BufferTimeObject, BufferTimes, Event, PersistMethod};
use uuid::Uuid;

/// Weave pre/post buffer events around `event`.
///
/// A side with an existing pointer is re-issued as an update of that buffer
/// rather than a new event; a side with no requested minutes is left alone.
pub fn weave_buffer_times(event: &Event, buffer: &BufferTimes) -> BufferTimeObject {
    let mut result = BufferTimeObject {
        before_event: None,
        after_event: None,
        new_event: event.clone(),
    };

    // A buffer is never itself buffered
    if event.is_buffer() {
        return result;
    }

    if let Some(minutes) = buffer.before_event.filter(|m| *m > 0) {
        let (id, method) = match &event.pre_event_id {
            Some(existing) => (existing.clone(), PersistMethod::Update),
            None => (Uuid::new_v4().to_string(), PersistMethod::Create),
        };

        let mut before = synthetic_buffer(event, &id, method);
        before.is_pre_event = true;
        before.start_date = event.start_date - Duration::minutes(minutes);
        before.end_date = event.start_date;

        result.new_event.pre_event_id = Some(id);
        result.new_event.buffer_times.before_event = Some(minutes);
        result.before_event = Some(before);
    }

    if let Some(minutes) = buffer.after_event.filter(|m| *m > 0) {
        let (id, method) = match &event.post_event_id {
            Some(existing) => (existing.clone(), PersistMethod::Update),
            None => (Uuid::new_v4().to_string(), PersistMethod::Create),
        };

        let mut after = synthetic_buffer(event, &id, method);
        after.is_post_event = true;
        after.start_date = event.end_date;
        after.end_date = event.end_date + Duration::minutes(minutes);

        result.new_event.post_event_id = Some(id);
        result.new_event.buffer_times.after_event = Some(minutes);
        result.after_event = Some(after);
    }

    result
}

fn synthetic_buffer(event: &Event, id: &str, method: PersistMethod) -> Event {
    Event {
        id: id.to_string(),
        summary: Some(BUFFER_TITLE.to_string()),
        notes: Some(BUFFER_TITLE.to_string()),
        for_event_id: Some(event.id.clone()),
        is_pre_event: false,
        is_post_event: false,
        pre_event_id: None,
        post_event_id: None,
        modifiable: true,
        priority: 1,
        is_break: false,
        is_meeting: false,
        is_external_meeting: false,
        recurring_event_id: None,
        meeting_id: None,
        buffer_times: BufferTimes::default(),
        preferred_time_ranges: Vec::new(),
        overrides: Default::default(),
        method,
        ..event.clone()
    }
}
