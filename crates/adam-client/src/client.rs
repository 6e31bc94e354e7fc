//! HTTP client for the scoring API.

use crate::error::ClientError;
use crate::wire::{
    self, AnalysisResponse, AnalyzeRequest, CompareRequest, CompareResponse, HealthStatus,
    QuickAnalyzeRequest,
};
use adam_capture::CapturedImage;
use adam_core::catalog::ModelInfo;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const API_PREFIX: &str = "/api/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Operations the application needs from the scoring service.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Full analysis of a front/side pair with one model.
    async fn analyze(
        &self,
        front: &CapturedImage,
        side: &CapturedImage,
        model: &str,
    ) -> Result<AnalysisResponse, ClientError>;

    /// Front photo only; less precise, faster.
    async fn analyze_quick(
        &self,
        front: &CapturedImage,
        model: &str,
    ) -> Result<AnalysisResponse, ClientError>;

    /// Run every backend model on the same photos.
    async fn compare(
        &self,
        front: &CapturedImage,
        side: Option<&CapturedImage>,
    ) -> Result<CompareResponse, ClientError>;

    async fn health(&self) -> Result<HealthStatus, ClientError>;

    async fn models(&self) -> Result<Vec<ModelInfo>, ClientError>;
}

/// [`ScoringService`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScoringClient {
    /// `timeout` bounds each whole request; analyses can take tens of seconds.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ClientError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::read_body(path, response).await
    }

    async fn get(&self, path: &str) -> Result<String, ClientError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::read_body(path, response).await
    }

    /// Body of a 2xx response; anything else becomes [`ClientError::Status`].
    async fn read_body(path: &str, response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let err = wire::status_error(status.as_u16(), status.canonical_reason(), &body);
            tracing::debug!(path, status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }
        tracing::debug!(path, status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body)
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn analyze(
        &self,
        front: &CapturedImage,
        side: &CapturedImage,
        model: &str,
    ) -> Result<AnalysisResponse, ClientError> {
        let request = AnalyzeRequest {
            front_image: front,
            side_image: side,
            model,
        };
        let body = self.post("/analyze", &request).await?;
        wire::parse_analysis(&body)
    }

    async fn analyze_quick(
        &self,
        front: &CapturedImage,
        model: &str,
    ) -> Result<AnalysisResponse, ClientError> {
        let request = QuickAnalyzeRequest {
            front_image: front,
            model,
        };
        let body = self.post("/analyze/quick", &request).await?;
        wire::parse_analysis(&body)
    }

    async fn compare(
        &self,
        front: &CapturedImage,
        side: Option<&CapturedImage>,
    ) -> Result<CompareResponse, ClientError> {
        let request = CompareRequest {
            front_image: front,
            side_image: side,
        };
        let body = self.post("/analyze/compare", &request).await?;
        wire::parse_compare(&body)
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let body = self.get("/health").await?;
        wire::parse_health(&body)
    }

    async fn models(&self) -> Result<Vec<ModelInfo>, ClientError> {
        let body = self.get("/models").await?;
        wire::parse_models(&body)
    }
}
