//! HTTP adapter for the zero-shot classification service
//!
//! Contract: `POST /classify {sentence, labels}` returns index-aligned
//! `{labels, scores}`. Callers treat failures as "no category match", so this
//! adapter only reports them; it never fabricates scores.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tessera_core::category::ports::Classifier;
use tessera_domain::{ClassificationScores, ClassifierConfig, Result};
use tracing::debug;

use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    sentence: &'a str,
    labels: &'a [String],
}

#[derive(Deserialize)]
struct ClassifyResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

/// Classification service client
pub struct ClassifierClient {
    http_client: HttpClient,
    base_url: String,
}

impl ClassifierClient {
    pub fn new(config: &ClassifierConfig, http_client: HttpClient) -> Self {
        Self { http_client, base_url: config.base_url.trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify(&self, sentence: &str, labels: &[String]) -> Result<ClassificationScores> {
        let request = self
            .http_client
            .request(Method::POST, format!("{}/classify", self.base_url))
            .json(&ClassifyRequest { sentence, labels });

        let response = self.http_client.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let message =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError::Status { status: status.as_u16(), message }.into());
        }

        let body: ClassifyResponse =
            response.json().await.map_err(InfraError::from)?;
        debug!(labels = body.labels.len(), "classification scores received");

        Ok(ClassificationScores { labels: body.labels, scores: body.scores })
    }
}
