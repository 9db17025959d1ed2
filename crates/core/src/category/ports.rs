//! Port interface for the zero-shot classification service

use async_trait::async_trait;
use tessera_domain::{ClassificationScores, Result};

/// Zero-shot text classifier: scores a sentence against candidate labels.
/// The response is index-aligned with the submitted labels.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, sentence: &str, labels: &[String]) -> Result<ClassificationScores>;
}
