//! Configuration structures
//!
//! Typed configuration for the pipeline and its remote collaborators. The
//! environment loader lives in the infra crate; these structs stay pure so
//! tests can construct them directly.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MIN_CLASSIFICATION_SCORE, DEFAULT_SOLVER_DURATION_SECS,
    DEFAULT_SOLVER_SHORT_DURATION_SECS,
};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub classifier: ClassifierConfig,
    pub blob: BlobConfig,
    pub solver: SolverConfig,
    pub pipeline: PipelineConfig,
}

/// Calendar/preferences store endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub admin_secret: String,
}

/// Zero-shot classification service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub base_url: String,
    /// Minimum score for a label to count as a category match
    pub min_score: f64,
}

impl ClassifierConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), min_score: DEFAULT_MIN_CLASSIFICATION_SCORE }
    }
}

/// Blob store used to persist assembled payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    pub base_url: String,
    pub bucket: String,
    pub api_key: Option<String>,
}

/// Constraint-solver service endpoint and duration budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub callback_url: String,
    /// Budget for windows spanning fewer than two days
    pub short_duration_secs: u64,
    /// Budget for wider windows
    pub duration_secs: u64,
}

impl SolverConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            callback_url: callback_url.into(),
            short_duration_secs: DEFAULT_SOLVER_SHORT_DURATION_SECS,
            duration_secs: DEFAULT_SOLVER_DURATION_SECS,
        }
    }
}

/// Pipeline execution knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bound for per-attendee fan-out
    pub concurrency: usize,
    /// Timeout applied to every remote call
    pub http_timeout_secs: u64,
    /// Total attempts (initial try + retries) for retryable calls
    pub http_max_attempts: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { concurrency: 4, http_timeout_secs: 30, http_max_attempts: 3 }
    }
}
