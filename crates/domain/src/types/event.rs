//! Calendar event model
//!
//! Events are read from the calendar store, mutated in memory by the
//! defaulting/buffer/partition stages, and never persisted back by this
//! pipeline. Times are naive wall-clock values paired with an IANA timezone.

use std::collections::BTreeSet;

use chrono::{NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Calendar availability as exposed to others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transparency {
    Opaque,
    Transparent,
}

/// Whether a synthetic event should be created or replaces an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistMethod {
    Create,
    Update,
}

/// Fields a user has explicitly set; category and previous-event defaults
/// never overwrite a field present in this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverrideField {
    Availability,
    PriorityLevel,
    Modifiable,
    IsBreak,
    IsMeeting,
    IsExternalMeeting,
    Color,
    TimePreference,
    Duration,
    Reminders,
    TimeBlocking,
}

/// A preferred placement window for an event (day optional for daily ranges)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredTimeRange {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    /// ISO weekday 1..=7; None applies the range to every day
    pub day_of_week: Option<u8>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Pre/post buffer minutes requested around an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferTimes {
    pub before_event: Option<i64>,
    pub after_event: Option<i64>,
}

impl BufferTimes {
    pub fn is_empty(&self) -> bool {
        !matches!(self.before_event, Some(m) if m > 0)
            && !matches!(self.after_event, Some(m) if m > 0)
    }
}

/// A calendar item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub calendar_id: String,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub timezone: Tz,
    pub all_day: bool,
    pub modifiable: bool,
    pub priority: i32,
    pub transparency: Transparency,
    pub background_color: Option<String>,
    pub is_break: bool,
    pub is_meeting: bool,
    pub is_external_meeting: bool,
    pub is_meeting_modifiable: bool,
    pub is_external_meeting_modifiable: bool,
    pub is_pre_event: bool,
    pub is_post_event: bool,
    /// Forward link to a pre-buffer shadow event
    pub pre_event_id: Option<String>,
    /// Forward link to a post-buffer shadow event
    pub post_event_id: Option<String>,
    /// Back link from a buffer to the real event it shadows
    pub for_event_id: Option<String>,
    pub recurring_event_id: Option<String>,
    pub meeting_id: Option<String>,
    /// Requested buffer minutes, populated by category defaulting
    #[serde(default)]
    pub buffer_times: BufferTimes,
    #[serde(default)]
    pub preferred_time_ranges: Vec<PreferredTimeRange>,
    /// Fields the user has set explicitly; defaults never clobber these
    #[serde(default)]
    pub overrides: BTreeSet<OverrideField>,
    pub method: PersistMethod,
}

impl Event {
    /// Duration in whole minutes; wall-clock difference within the event's
    /// own timezone.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_date - self.start_date).num_minutes()
    }

    pub fn is_buffer(&self) -> bool {
        self.is_pre_event || self.is_post_event
    }

    pub fn has_override(&self, field: OverrideField) -> bool {
        self.overrides.contains(&field)
    }
}

/// Result of weaving buffers around one real event: the synthetic shadow
/// events plus the real event updated with its pointer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferTimeObject {
    pub before_event: Option<Event>,
    pub after_event: Option<Event>,
    pub new_event: Event,
}

/// Notification offset attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub timezone: Tz,
    pub minutes: i64,
    pub use_default: bool,
}

impl Reminder {
    pub fn new(event_id: &str, user_id: &str, timezone: Tz, minutes: i64, use_default: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            timezone,
            minutes,
            use_default,
        }
    }
}
