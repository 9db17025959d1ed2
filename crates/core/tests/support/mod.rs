//! In-memory port mocks for assembly/service tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tessera_core::assembly::ports::{PayloadStore, SchedulingStore, SolverClient};
use tessera_core::category::ports::Classifier;
use tessera_domain::{
    Category, ClassificationScores, Event, MeetingAssist, MeetingAssistAttendee, PlannerPayload,
    PlannerRequestBody, Result, TesseraError, UserPreference,
};

/// In-memory `SchedulingStore` seeded per user.
#[derive(Default)]
pub struct InMemoryStore {
    pub preferences: HashMap<String, UserPreference>,
    pub events: HashMap<String, Vec<Event>>,
    pub attendee_events: HashMap<String, Vec<Event>>,
    pub categories: HashMap<String, Vec<Category>>,
    pub calendars: HashMap<String, String>,
    pub meeting_assists: HashMap<String, MeetingAssist>,
    pub attendees: HashMap<String, Vec<MeetingAssistAttendee>>,
    pub linked_categories: Mutex<Vec<(String, Vec<String>)>>,
    pub usage_decrements: Mutex<Vec<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preference(mut self, preference: UserPreference) -> Self {
        self.preferences.insert(preference.user_id.clone(), preference);
        self
    }

    pub fn with_events(mut self, user_id: &str, events: Vec<Event>) -> Self {
        self.events.insert(user_id.to_string(), events);
        self
    }

    pub fn with_attendee_events(mut self, attendee_id: &str, events: Vec<Event>) -> Self {
        self.attendee_events.insert(attendee_id.to_string(), events);
        self
    }

    pub fn with_meeting(
        mut self,
        meeting: MeetingAssist,
        attendees: Vec<MeetingAssistAttendee>,
    ) -> Self {
        self.attendees.insert(meeting.id.clone(), attendees);
        self.meeting_assists.insert(meeting.id.clone(), meeting);
        self
    }

    fn overlapping(events: Option<&Vec<Event>>, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
        events
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.start_date < end && e.end_date > start)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn get_user_preference(&self, user_id: &str) -> Result<Option<UserPreference>> {
        Ok(self.preferences.get(user_id).cloned())
    }

    async fn get_primary_calendar_id(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.calendars.get(user_id).cloned())
    }

    async fn list_events_for_date(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        _timezone: Tz,
    ) -> Result<Vec<Event>> {
        Ok(Self::overlapping(self.events.get(user_id), start, end))
    }

    async fn list_events_for_window(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        _timezone: Tz,
    ) -> Result<Vec<Event>> {
        Ok(Self::overlapping(self.events.get(user_id), start, end))
    }

    async fn list_meeting_events_for_attendee(
        &self,
        attendee_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        _timezone: Tz,
    ) -> Result<Vec<Event>> {
        Ok(Self::overlapping(self.attendee_events.get(attendee_id), start, end))
    }

    async fn get_meeting_assist(&self, meeting_id: &str) -> Result<Option<MeetingAssist>> {
        Ok(self.meeting_assists.get(meeting_id).cloned())
    }

    async fn list_attendees(&self, meeting_id: &str) -> Result<Vec<MeetingAssistAttendee>> {
        Ok(self.attendees.get(meeting_id).cloned().unwrap_or_default())
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        Ok(self.categories.get(user_id).cloned().unwrap_or_default())
    }

    async fn link_categories_to_event(
        &self,
        event_id: &str,
        category_ids: &[String],
    ) -> Result<()> {
        self.linked_categories
            .lock()
            .unwrap()
            .push((event_id.to_string(), category_ids.to_vec()));
        Ok(())
    }

    async fn decrement_usage(&self, user_id: &str) -> Result<()> {
        self.usage_decrements.lock().unwrap().push(user_id.to_string());
        Ok(())
    }
}

/// Records persisted payloads; optionally fails every write.
#[derive(Default)]
pub struct RecordingPayloadStore {
    pub payloads: Mutex<Vec<(String, PlannerPayload)>>,
    pub fail: bool,
}

#[async_trait]
impl PayloadStore for RecordingPayloadStore {
    async fn put_payload(&self, key: &str, payload: &PlannerPayload) -> Result<()> {
        if self.fail {
            return Err(TesseraError::Network("payload store unavailable".into()));
        }
        self.payloads.lock().unwrap().push((key.to_string(), payload.clone()));
        Ok(())
    }
}

/// Records solve submissions; optionally fails every POST.
#[derive(Default)]
pub struct RecordingSolver {
    pub requests: Mutex<Vec<PlannerRequestBody>>,
    pub fail: bool,
}

#[async_trait]
impl SolverClient for RecordingSolver {
    async fn solve_day(&self, request: &PlannerRequestBody) -> Result<()> {
        if self.fail {
            return Err(TesseraError::Network("solver unavailable".into()));
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Classifier returning fixed scores for every call.
pub struct StaticClassifier {
    pub scores: Vec<(String, f64)>,
}

#[async_trait]
impl Classifier for StaticClassifier {
    async fn classify(&self, _sentence: &str, _labels: &[String]) -> Result<ClassificationScores> {
        Ok(ClassificationScores {
            labels: self.scores.iter().map(|(l, _)| l.clone()).collect(),
            scores: self.scores.iter().map(|(_, s)| *s).collect(),
        })
    }
}
