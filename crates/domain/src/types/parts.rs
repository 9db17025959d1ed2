//! Event part types
//!
//! The solver never sees whole events; it places fixed-size slices. A
//! `PartedEvent` is the in-pipeline slice (the source event plus its part
//! numbering); an `EventPart` is the solver-facing record with every
//! scheduling-relevant scalar translated into the host timezone.
//!
//! Invariant: for a given event id, all parts share the same `last_part` and
//! their `part` values form a contiguous `1..=last_part` sequence (buffers
//! merged into the chain extend, never break, the sequence).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::planner::UserPlannerRequestBody;
use super::schedule::DayOfWeek;

/// One granularity-sized slice of an event, prior to solver formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartedEvent {
    /// Parts merged into one pre/real/post chain share a group id
    pub group_id: String,
    pub event: Event,
    pub part: u32,
    pub last_part: u32,
    pub meeting_part: u32,
    pub meeting_last_part: u32,
    pub host_id: String,
}

/// A preferred window rendered in host wall-clock time for the solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerTimeRange {
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub event_id: String,
    pub user_id: String,
    pub host_id: String,
}

/// Solver-facing slice of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPart {
    pub group_id: String,
    pub event_id: String,
    pub part: u32,
    pub last_part: u32,
    pub meeting_part: u32,
    pub meeting_last_part: u32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub user_id: String,
    pub host_id: String,
    pub user: UserPlannerRequestBody,
    pub priority: i32,
    pub modifiable: bool,
    pub is_pre_event: bool,
    pub is_post_event: bool,
    pub for_event_id: Option<String>,
    pub is_meeting: bool,
    pub is_external_meeting: bool,
    pub is_meeting_modifiable: bool,
    pub is_external_meeting_modifiable: bool,
    /// Break slices are schedulable gaps for the solver
    pub gap: bool,
    pub preferred_time_ranges: Vec<PlannerTimeRange>,
    pub total_working_hours: f64,
    pub recurring_event_id: Option<String>,
    pub meeting_id: Option<String>,
}
