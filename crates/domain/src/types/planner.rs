//! Solver request bodies and persisted payloads

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::event::{BufferTimeObject, Event, Reminder};
use super::parts::EventPart;
use super::schedule::{TimeSlot, WorkTime};

/// Per-participant constraints submitted to the solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlannerRequestBody {
    pub id: String,
    pub host_id: String,
    pub max_work_load_percent: i32,
    pub back_to_back_meetings: bool,
    pub max_number_of_meetings: i32,
    pub min_number_of_breaks: i32,
    pub work_times: Vec<WorkTime>,
}

/// The final, deduplicated payload submitted to the solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerRequestBody {
    pub singleton_id: String,
    pub host_id: String,
    pub timeslots: Vec<TimeSlot>,
    pub user_list: Vec<UserPlannerRequestBody>,
    pub event_parts: Vec<EventPart>,
    pub file_key: String,
    /// Duration budget in seconds
    pub delay: u64,
    pub call_back_url: String,
}

/// Assembly output prior to dispatch: the solver fields plus the diffing
/// context persisted alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPlan {
    pub host_id: String,
    pub host_timezone: Tz,
    pub window_start_date: chrono::NaiveDateTime,
    pub window_end_date: chrono::NaiveDateTime,
    pub timeslots: Vec<TimeSlot>,
    pub user_list: Vec<UserPlannerRequestBody>,
    pub event_parts: Vec<EventPart>,
    pub all_events: Vec<Event>,
    pub breaks: Vec<Event>,
    pub old_events: Vec<Event>,
    pub old_attendee_events: Vec<Event>,
    pub new_host_buffer_times: Vec<BufferTimeObject>,
    pub new_host_reminders: Vec<Reminder>,
}

/// Superset payload written to the blob store for solver-side diffing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerPayload {
    pub singleton_id: String,
    pub host_id: String,
    pub event_parts: Vec<EventPart>,
    pub all_events: Vec<Event>,
    pub breaks: Vec<Event>,
    pub old_events: Vec<Event>,
    pub old_attendee_events: Vec<Event>,
    pub new_host_buffer_times: Vec<BufferTimeObject>,
    pub new_host_reminders: Vec<Reminder>,
    pub host_timezone: Tz,
}

/// Proof of a dispatched run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReceipt {
    pub singleton_id: String,
    pub file_key: String,
}
