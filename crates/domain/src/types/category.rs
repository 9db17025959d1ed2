//! Classification categories
//!
//! A category is a classification label carrying default scheduling
//! attributes and copy-vs-default policy flags. Categories are read-only for
//! a run.

use serde::{Deserialize, Serialize};

use super::event::BufferTimes;

/// Default values a category may apply to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefaults {
    /// `true` renders matched events as transparent (free) time
    #[serde(default)]
    pub availability: bool,
    pub priority_level: Option<i32>,
    pub modifiable: Option<bool>,
    pub is_break: Option<bool>,
    pub is_meeting: Option<bool>,
    pub is_external_meeting: Option<bool>,
    pub meeting_modifiable: Option<bool>,
    pub external_meeting_modifiable: Option<bool>,
    /// Pre/post buffer minutes to weave around matched events
    pub time_blocking: Option<BufferTimes>,
    /// Reminder minute offsets
    #[serde(default)]
    pub reminders: Vec<i64>,
    /// Preferred windows, as (ISO weekday or None, start, end) wall times
    #[serde(default)]
    pub time_preference: Vec<CategoryTimePreference>,
}

/// A preferred window carried by a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTimePreference {
    pub day_of_week: Option<u8>,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

/// Copy policy: prefer a previous occurrence's value over this category's
/// default for the flagged field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCopyFlags {
    #[serde(default)]
    pub availability: bool,
    #[serde(default)]
    pub time_blocking: bool,
    #[serde(default)]
    pub time_preference: bool,
    #[serde(default)]
    pub reminders: bool,
    #[serde(default)]
    pub priority_level: bool,
    #[serde(default)]
    pub modifiable: bool,
    #[serde(default)]
    pub is_break: bool,
    #[serde(default)]
    pub is_meeting: bool,
    #[serde(default)]
    pub is_external_meeting: bool,
    #[serde(default)]
    pub color: bool,
}

/// A classification label with its default attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub defaults: CategoryDefaults,
    #[serde(default)]
    pub copy: CategoryCopyFlags,
}

/// Index-aligned label scores returned by the classifier service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationScores {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ClassificationScores {
    /// Score for a label, if the classifier returned it.
    pub fn score_for(&self, label: &str) -> Option<f64> {
        self.labels.iter().position(|l| l == label).and_then(|i| self.scores.get(i)).copied()
    }
}
