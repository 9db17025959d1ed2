//! Category classification and defaulting
//!
//! Classifies an event's text against the user's category labels and applies
//! the winning category's defaults. Every default is gated on the event's
//! override set: a field the user has set explicitly is preserved verbatim.
//! The reserved "Meeting"/"External Meeting" labels join the matched set
//! whenever their score clears the threshold or the event is already flagged
//! as such; buffer and reminder synthesis runs once per matched category,
//! earlier categories winning.

use std::sync::Arc;

use tessera_domain::constants::{EXTERNAL_MEETING_LABEL, MEETING_LABEL};
use tessera_domain::{
    BufferTimeObject, BufferTimes, Category, ClassificationScores, ClassifierConfig, Event,
    OverrideField, PreferredTimeRange, Reminder, Result, Transparency, UserPreference,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::ports::Classifier;
use crate::assembly::ports::SchedulingStore;
use crate::scheduling::buffers::weave_buffer_times;

/// Outcome of running one event through classification and defaulting
#[derive(Debug, Clone)]
pub struct CategorizedEvent {
    pub event: Event,
    pub reminders: Vec<Reminder>,
    pub buffer: Option<BufferTimeObject>,
    pub matched: Vec<Category>,
}

impl CategorizedEvent {
    fn passthrough(event: Event) -> Self {
        Self { event, reminders: Vec::new(), buffer: None, matched: Vec::new() }
    }
}

/// Classification + defaulting service
pub struct CategoryService {
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn SchedulingStore>,
    config: ClassifierConfig,
}

impl CategoryService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn SchedulingStore>,
        config: ClassifierConfig,
    ) -> Self {
        Self { classifier, store, config }
    }

    /// Classify one event and apply its best-match category defaults.
    ///
    /// Missing categories and classifier failures are not errors: the event
    /// passes through unchanged.
    pub async fn apply_defaults_for_event(&self, event: Event) -> Result<CategorizedEvent> {
        let categories = match self.store.list_categories(&event.user_id).await {
            Ok(categories) => categories,
            Err(err) => {
                warn!(user_id = %event.user_id, error = %err, "failed to list categories");
                return Ok(CategorizedEvent::passthrough(event));
            }
        };
        if categories.is_empty() {
            debug!(event_id = %event.id, "no categories configured; skipping defaulting");
            return Ok(CategorizedEvent::passthrough(event));
        }

        let sentence = classification_sentence(&event);
        if sentence.is_empty() {
            return Ok(CategorizedEvent::passthrough(event));
        }

        let labels: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
        let scores = match self.classifier.classify(&sentence, &labels).await {
            Ok(scores) => scores,
            Err(err) => {
                // Classifier failure degrades to "no match"
                warn!(event_id = %event.id, error = %err, "classification failed");
                return Ok(CategorizedEvent::passthrough(event));
            }
        };

        let Some(best_name) = best_match_label(&scores, self.config.min_score) else {
            return Ok(CategorizedEvent::passthrough(event));
        };
        let Some(best) = categories.iter().find(|c| c.name == best_name) else {
            return Ok(CategorizedEvent::passthrough(event));
        };

        let matched =
            matched_categories(&event, best, &scores, &categories, self.config.min_score);

        let mut new_event = apply_category_defaults(event, best);
        let reminders = reminders_from_categories(&new_event, &matched);
        let buffer = buffers_from_categories(&new_event, &matched);
        if let Some(buffer) = &buffer {
            new_event = buffer.new_event.clone();
        }

        // Link upsert is fire-and-forget relative to the run
        let category_ids: Vec<String> = matched.iter().map(|c| c.id.clone()).collect();
        if let Err(err) =
            self.store.link_categories_to_event(&new_event.id, &category_ids).await
        {
            warn!(event_id = %new_event.id, error = %err, "failed to link categories");
        }

        Ok(CategorizedEvent { event: new_event, reminders, buffer, matched })
    }
}

/// Sentence submitted to the classifier: `summary` or `summary: notes`.
pub fn classification_sentence(event: &Event) -> String {
    let summary = event.summary.as_deref().unwrap_or("").trim();
    match event.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) if !summary.is_empty() => format!("{summary}: {notes}"),
        _ => summary.to_string(),
    }
}

/// Highest-scoring label above the threshold, if any.
pub fn best_match_label(scores: &ClassificationScores, min_score: f64) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (label, score) in scores.labels.iter().zip(scores.scores.iter()) {
        if *score > min_score && best.map_or(true, |(_, s)| *score > s) {
            best = Some((label, *score));
        }
    }
    best.map(|(label, _)| label.to_string())
}

/// The best match unioned with the reserved meeting labels (matched by score
/// or by the event's own flags), deduplicated by category id.
pub fn matched_categories(
    event: &Event,
    best: &Category,
    scores: &ClassificationScores,
    categories: &[Category],
    min_score: f64,
) -> Vec<Category> {
    let mut matched: Vec<Category> = Vec::new();

    let mut push_label = |name: &str| {
        if let Some(category) = categories.iter().find(|c| c.name == name) {
            matched.push(category.clone());
        }
    };

    if scores.score_for(MEETING_LABEL).is_some_and(|s| s > min_score) || event.is_meeting {
        push_label(MEETING_LABEL);
    }
    if scores.score_for(EXTERNAL_MEETING_LABEL).is_some_and(|s| s > min_score)
        || event.is_external_meeting
    {
        push_label(EXTERNAL_MEETING_LABEL);
    }
    matched.push(best.clone());

    let mut seen = std::collections::HashSet::new();
    matched.retain(|c| seen.insert(c.id.clone()));
    matched
}

/// Apply one category's defaults, preserving every field in the event's
/// override set verbatim.
pub fn apply_category_defaults(mut event: Event, category: &Category) -> Event {
    let defaults = &category.defaults;

    if !event.has_override(OverrideField::Availability) {
        event.transparency =
            if defaults.availability { Transparency::Transparent } else { Transparency::Opaque };
    }
    if !event.has_override(OverrideField::PriorityLevel) {
        if let Some(priority) = defaults.priority_level {
            event.priority = priority.max(1);
        }
    }
    if !event.has_override(OverrideField::Modifiable) {
        if let Some(modifiable) = defaults.modifiable {
            event.modifiable = modifiable;
        }
        if let Some(modifiable) = defaults.meeting_modifiable {
            event.is_meeting_modifiable = modifiable;
        }
        if let Some(modifiable) = defaults.external_meeting_modifiable {
            event.is_external_meeting_modifiable = modifiable;
        }
    }
    if !event.has_override(OverrideField::IsBreak) {
        if let Some(is_break) = defaults.is_break {
            event.is_break = is_break;
        }
    }
    if !event.has_override(OverrideField::IsMeeting) {
        if let Some(is_meeting) = defaults.is_meeting {
            event.is_meeting = is_meeting;
        } else if category.name == MEETING_LABEL {
            event.is_meeting = true;
        }
    }
    if !event.has_override(OverrideField::IsExternalMeeting) {
        if let Some(is_external) = defaults.is_external_meeting {
            event.is_external_meeting = is_external;
        } else if category.name == EXTERNAL_MEETING_LABEL {
            event.is_external_meeting = true;
        }
    }
    if !event.has_override(OverrideField::Color) {
        if let Some(color) = &category.color {
            event.background_color = Some(color.clone());
        }
    }
    if !event.has_override(OverrideField::TimePreference) && !defaults.time_preference.is_empty()
    {
        event.preferred_time_ranges = defaults
            .time_preference
            .iter()
            .map(|tp| PreferredTimeRange {
                id: Uuid::new_v4().to_string(),
                event_id: event.id.clone(),
                user_id: event.user_id.clone(),
                day_of_week: tp.day_of_week,
                start_time: tp.start_time,
                end_time: tp.end_time,
            })
            .collect();
    }

    event
}

/// Prefer a previous occurrence's values over already-applied category
/// defaults for fields the user preference or category marks copyable.
/// Override flags still win over both. Call after
/// [`apply_category_defaults`].
pub fn apply_previous_event_defaults(
    mut event: Event,
    previous: &Event,
    preference: &UserPreference,
    category: Option<&Category>,
) -> Event {
    let copy = |pref_flag: bool, category_flag: fn(&Category) -> bool| {
        pref_flag || category.map(category_flag).unwrap_or(false)
    };

    if !event.has_override(OverrideField::Availability)
        && copy(preference.copy_availability, |c| c.copy.availability)
    {
        event.transparency = previous.transparency;
    }
    if !event.has_override(OverrideField::PriorityLevel)
        && copy(preference.copy_priority_level, |c| c.copy.priority_level)
    {
        event.priority = previous.priority.max(1);
    }
    if !event.has_override(OverrideField::Modifiable)
        && copy(preference.copy_modifiable, |c| c.copy.modifiable)
    {
        event.modifiable = previous.modifiable;
    }
    if !event.has_override(OverrideField::IsBreak)
        && copy(preference.copy_is_break, |c| c.copy.is_break)
    {
        event.is_break = previous.is_break;
    }
    if !event.has_override(OverrideField::IsMeeting)
        && copy(preference.copy_is_meeting, |c| c.copy.is_meeting)
    {
        event.is_meeting = previous.is_meeting;
    }
    if !event.has_override(OverrideField::IsExternalMeeting)
        && copy(preference.copy_is_external_meeting, |c| c.copy.is_external_meeting)
    {
        event.is_external_meeting = previous.is_external_meeting;
    }
    if !event.has_override(OverrideField::Color)
        && copy(preference.copy_color, |c| c.copy.color)
    {
        if let Some(color) = &previous.background_color {
            event.background_color = Some(color.clone());
        }
    }
    if !event.has_override(OverrideField::TimeBlocking)
        && copy(preference.copy_time_blocking, |c| c.copy.time_blocking)
        && !previous.buffer_times.is_empty()
    {
        event.buffer_times = previous.buffer_times;
    }
    if !event.has_override(OverrideField::TimePreference)
        && copy(preference.copy_time_preference, |c| c.copy.time_preference)
        && !previous.preferred_time_ranges.is_empty()
    {
        event.preferred_time_ranges = previous
            .preferred_time_ranges
            .iter()
            .map(|tp| PreferredTimeRange {
                id: Uuid::new_v4().to_string(),
                event_id: event.id.clone(),
                user_id: event.user_id.clone(),
                ..tp.clone()
            })
            .collect();
    }

    event
}

/// Reminders from the first matched category carrying reminder defaults.
fn reminders_from_categories(event: &Event, matched: &[Category]) -> Vec<Reminder> {
    if event.has_override(OverrideField::Reminders) {
        return Vec::new();
    }

    matched
        .iter()
        .find(|c| !c.defaults.reminders.is_empty())
        .map(|category| {
            category
                .defaults
                .reminders
                .iter()
                .map(|minutes| {
                    Reminder::new(&event.id, &event.user_id, event.timezone, *minutes, false)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Weave buffer events from the matched categories' time-blocking defaults:
/// each side is taken from the first category that requests it, so later
/// categories never overwrite an earlier non-empty side.
fn buffers_from_categories(event: &Event, matched: &[Category]) -> Option<BufferTimeObject> {
    if event.has_override(OverrideField::TimeBlocking) {
        return None;
    }

    let mut combined = BufferTimes::default();
    for category in matched {
        let Some(blocking) = category.defaults.time_blocking else {
            continue;
        };
        if combined.before_event.is_none() {
            combined.before_event = blocking.before_event.filter(|m| *m > 0);
        }
        if combined.after_event.is_none() {
            combined.after_event = blocking.after_event.filter(|m| *m > 0);
        }
    }

    if combined.is_empty() {
        return None;
    }
    Some(weave_buffer_times(event, &combined))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use chrono_tz::UTC;
    use tessera_domain::{CategoryDefaults, MeetingAssist, MeetingAssistAttendee, TesseraError};

    use super::*;
    use crate::scheduling::test_fixtures::{event, naive};

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            user_id: "user-1".into(),
            name: name.to_string(),
            color: Some("#123456".into()),
            defaults: CategoryDefaults::default(),
            copy: Default::default(),
        }
    }

    fn scores(pairs: &[(&str, f64)]) -> ClassificationScores {
        ClassificationScores {
            labels: pairs.iter().map(|(l, _)| l.to_string()).collect(),
            scores: pairs.iter().map(|(_, s)| *s).collect(),
        }
    }

    struct FixedClassifier(std::result::Result<ClassificationScores, ()>);

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(
            &self,
            _sentence: &str,
            _labels: &[String],
        ) -> Result<ClassificationScores> {
            self.0
                .clone()
                .map_err(|_| TesseraError::Network("classifier unavailable".into()))
        }
    }

    struct FixedStore {
        categories: Vec<Category>,
    }

    #[async_trait]
    impl SchedulingStore for FixedStore {
        async fn get_user_preference(&self, _: &str) -> Result<Option<UserPreference>> {
            Ok(None)
        }
        async fn get_primary_calendar_id(&self, _: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn list_events_for_date(
            &self,
            _: &str,
            _: NaiveDateTime,
            _: NaiveDateTime,
            _: chrono_tz::Tz,
        ) -> Result<Vec<Event>> {
            Ok(Vec::new())
        }
        async fn list_events_for_window(
            &self,
            _: &str,
            _: NaiveDateTime,
            _: NaiveDateTime,
            _: chrono_tz::Tz,
        ) -> Result<Vec<Event>> {
            Ok(Vec::new())
        }
        async fn list_meeting_events_for_attendee(
            &self,
            _: &str,
            _: NaiveDateTime,
            _: NaiveDateTime,
            _: chrono_tz::Tz,
        ) -> Result<Vec<Event>> {
            Ok(Vec::new())
        }
        async fn get_meeting_assist(&self, _: &str) -> Result<Option<MeetingAssist>> {
            Ok(None)
        }
        async fn list_attendees(&self, _: &str) -> Result<Vec<MeetingAssistAttendee>> {
            Ok(Vec::new())
        }
        async fn list_categories(&self, _: &str) -> Result<Vec<Category>> {
            Ok(self.categories.clone())
        }
        async fn link_categories_to_event(&self, _: &str, _: &[String]) -> Result<()> {
            Ok(())
        }
        async fn decrement_usage(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn service(
        categories: Vec<Category>,
        classification: std::result::Result<ClassificationScores, ()>,
    ) -> CategoryService {
        CategoryService::new(
            Arc::new(FixedClassifier(classification)),
            Arc::new(FixedStore { categories }),
            ClassifierConfig::new("http://localhost"),
        )
    }

    #[test]
    fn sentence_joins_summary_and_notes() {
        let mut e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        e.summary = Some("Budget review".into());
        e.notes = Some("Q3 numbers".into());
        assert_eq!(classification_sentence(&e), "Budget review: Q3 numbers");

        e.notes = None;
        assert_eq!(classification_sentence(&e), "Budget review");
    }

    #[test]
    fn best_match_requires_threshold() {
        let s = scores(&[("Deep Work", 0.55), ("Admin", 0.4)]);
        assert_eq!(best_match_label(&s, 0.6), None);

        let s = scores(&[("Deep Work", 0.9), ("Admin", 0.7)]);
        assert_eq!(best_match_label(&s, 0.6).as_deref(), Some("Deep Work"));
    }

    #[test]
    fn defaults_respect_override_set() {
        let mut cat = category("c1", "Deep Work");
        cat.defaults.priority_level = Some(5);
        cat.defaults.modifiable = Some(false);

        let mut e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        e.overrides = BTreeSet::from([OverrideField::PriorityLevel]);

        let applied = apply_category_defaults(e, &cat);
        assert_eq!(applied.priority, 1); // preserved
        assert!(!applied.modifiable); // defaulted
        assert_eq!(applied.background_color.as_deref(), Some("#123456"));
    }

    #[test]
    fn defaulting_is_identity_when_everything_is_overridden() {
        let mut cat = category("c1", MEETING_LABEL);
        cat.defaults.priority_level = Some(7);
        cat.defaults.availability = true;
        cat.defaults.is_meeting = Some(true);
        cat.defaults.is_break = Some(true);
        cat.defaults.modifiable = Some(false);
        cat.defaults.meeting_modifiable = Some(true);
        cat.defaults.external_meeting_modifiable = Some(true);
        cat.defaults.time_preference = vec![tessera_domain::CategoryTimePreference {
            day_of_week: Some(1),
            start_time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        }];

        let mut e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        e.overrides = BTreeSet::from([
            OverrideField::Availability,
            OverrideField::PriorityLevel,
            OverrideField::Modifiable,
            OverrideField::IsBreak,
            OverrideField::IsMeeting,
            OverrideField::IsExternalMeeting,
            OverrideField::Color,
            OverrideField::TimePreference,
            OverrideField::Duration,
            OverrideField::Reminders,
            OverrideField::TimeBlocking,
        ]);

        let before = e.clone();
        assert_eq!(apply_category_defaults(e, &cat), before);
    }

    #[test]
    fn meeting_flag_unions_matched_categories() {
        let best = category("c1", "Deep Work");
        let categories =
            vec![best.clone(), category("c2", MEETING_LABEL), category("c3", EXTERNAL_MEETING_LABEL)];
        let s = scores(&[("Deep Work", 0.9), (MEETING_LABEL, 0.2), (EXTERNAL_MEETING_LABEL, 0.1)]);

        let mut e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        e.is_meeting = true;

        let matched = matched_categories(&e, &best, &s, &categories, 0.6);
        let names: Vec<&str> = matched.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![MEETING_LABEL, "Deep Work"]);
    }

    #[test]
    fn previous_event_values_win_when_copyable() {
        let mut prefs = crate::scheduling::test_fixtures::preference();
        prefs.copy_priority_level = true;

        let mut previous = event("e0", naive(2023, 5, 30, 10, 0), naive(2023, 5, 30, 11, 0), UTC);
        previous.priority = 4;

        let e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        let applied = apply_previous_event_defaults(e, &previous, &prefs, None);
        assert_eq!(applied.priority, 4);
    }

    #[tokio::test]
    async fn no_categories_passes_event_through() {
        let svc = service(Vec::new(), Ok(scores(&[])));
        let e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        let outcome = svc.apply_defaults_for_event(e.clone()).await.unwrap();
        assert_eq!(outcome.event, e);
        assert!(outcome.matched.is_empty());
    }

    #[tokio::test]
    async fn classifier_failure_degrades_to_no_match() {
        let svc = service(vec![category("c1", "Deep Work")], Err(()));
        let e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        let outcome = svc.apply_defaults_for_event(e.clone()).await.unwrap();
        assert_eq!(outcome.event, e);
    }

    #[tokio::test]
    async fn best_match_applies_defaults_and_buffers() {
        let mut cat = category("c1", "Deep Work");
        cat.defaults.priority_level = Some(3);
        cat.defaults.time_blocking =
            Some(BufferTimes { before_event: Some(15), after_event: None });
        cat.defaults.reminders = vec![10, 30];

        let svc = service(vec![cat], Ok(scores(&[("Deep Work", 0.9)])));
        let e = event("e1", naive(2023, 6, 6, 10, 0), naive(2023, 6, 6, 11, 0), UTC);
        let outcome = svc.apply_defaults_for_event(e).await.unwrap();

        assert_eq!(outcome.event.priority, 3);
        assert_eq!(outcome.reminders.len(), 2);
        let buffer = outcome.buffer.expect("buffer woven");
        assert!(buffer.before_event.is_some());
        assert!(outcome.event.pre_event_id.is_some());
    }
}
