//! HTTP adapter for the constraint-solving service
//!
//! Submits `POST /timeTable/admin/solve-day` with HTTP Basic auth. The
//! response body is ignored: results arrive asynchronously via the payload's
//! callback URL. This client's contract ends at successful submission.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Method;
use tessera_core::assembly::ports::SolverClient;
use tessera_domain::{PlannerRequestBody, Result, SolverConfig};
use tracing::info;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Solver service client
pub struct SolverHttpClient {
    http_client: HttpClient,
    base_url: String,
    authorization: String,
}

impl SolverHttpClient {
    pub fn new(config: &SolverConfig, http_client: HttpClient) -> Self {
        let credentials = BASE64.encode(format!("{}:{}", config.username, config.password));
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {credentials}"),
        }
    }
}

#[async_trait]
impl SolverClient for SolverHttpClient {
    async fn solve_day(&self, request: &PlannerRequestBody) -> Result<()> {
        let http_request = self
            .http_client
            .request(Method::POST, format!("{}/timeTable/admin/solve-day", self.base_url))
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .json(request);

        let response = self.http_client.send(http_request).await?;
        let status = response.status();
        if !status.is_success() {
            let message =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError::Status { status: status.as_u16(), message }.into());
        }

        info!(singleton_id = %request.singleton_id, "solve request submitted");
        Ok(())
    }
}
