//! Port interfaces for the pipeline's remote collaborators
//!
//! Every network dependency is a trait here; infra provides the HTTP
//! adapters and tests provide in-memory mocks. All implementations are
//! injected as `Arc<dyn ..>` handles constructed once at process start.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tessera_domain::{
    Category, Event, MeetingAssist, MeetingAssistAttendee, PlannerPayload, PlannerRequestBody,
    Result, UserPreference,
};

/// Calendar/preferences store. All reads are by (user, date-range) or id;
/// the only writes this pipeline issues are the category-link upsert and the
/// usage decrement, both fire-and-forget at the call sites.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Stored preference profile; `None` marks an external user.
    async fn get_user_preference(&self, user_id: &str) -> Result<Option<UserPreference>>;

    /// The user's primary calendar id, if any.
    async fn get_primary_calendar_id(&self, user_id: &str) -> Result<Option<String>>;

    /// Events overlapping one work day, naive wall-clock bounds in `timezone`.
    async fn list_events_for_date(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<Event>>;

    /// Events overlapping the whole scheduling window.
    async fn list_events_for_window(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<Event>>;

    /// External attendees' own calendar items for the window, keyed by
    /// attendee id (externals have no user record in this system).
    async fn list_meeting_events_for_attendee(
        &self,
        attendee_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timezone: Tz,
    ) -> Result<Vec<Event>>;

    async fn get_meeting_assist(&self, meeting_id: &str) -> Result<Option<MeetingAssist>>;

    async fn list_attendees(&self, meeting_id: &str) -> Result<Vec<MeetingAssistAttendee>>;

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>>;

    /// Upsert category-to-event links (fire-and-forget at call sites).
    async fn link_categories_to_event(
        &self,
        event_id: &str,
        category_ids: &[String],
    ) -> Result<()>;

    /// Decrement the freemium usage counter (fire-and-forget at call sites).
    async fn decrement_usage(&self, user_id: &str) -> Result<()>;
}

/// Blob store persisting the assembled payload for solver-side diffing and
/// external reconciliation.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    async fn put_payload(&self, key: &str, payload: &PlannerPayload) -> Result<()>;
}

/// Constraint-solving service. Submission is fire-and-forget; results arrive
/// later via the callback URL, which is out of scope here.
#[async_trait]
pub trait SolverClient: Send + Sync {
    async fn solve_day(&self, request: &PlannerRequestBody) -> Result<()>;
}

/// Text-to-vector capability consumed for semantic search parity; not
/// exercised by the preparation chain itself.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
