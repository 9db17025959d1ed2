//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! pipeline.

// Slot granularities (minutes)
pub const FINE_GRANULARITY_MINUTES: i64 = 15;
pub const LITE_GRANULARITY_MINUTES: i64 = 30;

// Break synthesis
pub const MIN_BREAK_LENGTH_MINUTES: i64 = 15;
pub const MAX_BREAK_HOURS_PER_DAY: f64 = 6.0;
pub const DEFAULT_BREAK_COLOR: &str = "#F7EBF7";
pub const BREAK_TITLE: &str = "Break";

// Buffer synthesis
pub const BUFFER_TITLE: &str = "Buffer time";

// Reserved classification labels
pub const MEETING_LABEL: &str = "Meeting";
pub const EXTERNAL_MEETING_LABEL: &str = "External Meeting";

// Classifier defaults
pub const DEFAULT_MIN_CLASSIFICATION_SCORE: f64 = 0.6;

// Permissive profile substituted for attendees without a stored preference
pub const EXTERNAL_MAX_WORKLOAD_PERCENT: i32 = 100;
pub const EXTERNAL_MAX_NUMBER_OF_MEETINGS: i32 = 99;
pub const EXTERNAL_MIN_NUMBER_OF_BREAKS: i32 = 0;

// Event window validation
pub const MAX_EVENT_HOURS: i64 = 23;

// Solver duration budget tiers (seconds); short budget applies when the
// scheduling window spans fewer than SHORT_WINDOW_DAYS days
pub const DEFAULT_SOLVER_SHORT_DURATION_SECS: u64 = 120;
pub const DEFAULT_SOLVER_DURATION_SECS: u64 = 420;
pub const SHORT_WINDOW_DAYS: i64 = 2;
