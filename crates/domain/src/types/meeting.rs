//! Meeting negotiation records
//!
//! A `MeetingAssist` is one meeting negotiation: the scheduling window plus
//! its attendee list. Internal attendees have a stored `UserPreference`;
//! external attendees do not and receive an inferred/permissive profile.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::event::PreferredTimeRange;

/// A meeting negotiation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAssist {
    pub id: String,
    /// Host user id
    pub user_id: String,
    pub window_start_date: NaiveDateTime,
    pub window_end_date: NaiveDateTime,
    pub timezone: Tz,
    pub duration_minutes: i64,
    pub min_threshold_count: Option<i32>,
    pub attendee_count: Option<i32>,
}

/// One attendee of a meeting negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAssistAttendee {
    pub id: String,
    /// Internal attendees carry the user id of their preference profile;
    /// external attendees carry a generated id
    pub user_id: String,
    pub host_id: String,
    pub meeting_id: String,
    pub name: Option<String>,
    pub primary_email: Option<String>,
    pub timezone: Tz,
    pub external_attendee: bool,
    #[serde(default)]
    pub preferred_time_ranges: Vec<PreferredTimeRange>,
}
