//! HTTP adapter for the blob store
//!
//! The assembled payload superset is persisted under
//! `{bucket}/{host_id}/{singleton_id}.json` before dispatch; the retrying
//! HTTP client makes the write effectively at-least-once.

use async_trait::async_trait;
use reqwest::Method;
use tessera_core::assembly::ports::PayloadStore;
use tessera_domain::{BlobConfig, PlannerPayload, Result};
use tracing::info;

use crate::errors::InfraError;
use crate::http::HttpClient;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Blob store client
pub struct BlobStoreClient {
    http_client: HttpClient,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl BlobStoreClient {
    pub fn new(config: &BlobConfig, http_client: HttpClient) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl PayloadStore for BlobStoreClient {
    async fn put_payload(&self, key: &str, payload: &PlannerPayload) -> Result<()> {
        let url = format!("{}/{}/{}", self.base_url, self.bucket, key);
        let mut request = self
            .http_client
            .request(Method::PUT, &url)
            .header("Content-Type", "application/json")
            .json(payload);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = self.http_client.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let message =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError::Status { status: status.as_u16(), message }.into());
        }

        info!(%key, "payload persisted");
        Ok(())
    }
}
