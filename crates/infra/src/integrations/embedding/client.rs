//! HTTP adapter for the text-to-vector embedding service
//!
//! A plain `(text) -> vector` capability consumed for semantic search over
//! event summaries; the preparation chain itself never blocks on it.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tessera_core::assembly::ports::Embedder;
use tessera_domain::Result;

use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    vector: Vec<f32>,
}

/// Embedding service client
pub struct EmbeddingClient {
    http_client: HttpClient,
    base_url: String,
}

impl EmbeddingClient {
    pub fn new(base_url: impl Into<String>, http_client: HttpClient) -> Self {
        let base_url: String = base_url.into();
        Self { http_client, base_url: base_url.trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = self
            .http_client
            .request(Method::POST, format!("{}/embed", self.base_url))
            .json(&EmbedRequest { text });

        let response = self.http_client.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let message =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError::Status { status: status.as_u16(), message }.into());
        }

        let body: EmbedResponse = response.json().await.map_err(InfraError::from)?;
        Ok(body.vector)
    }
}
