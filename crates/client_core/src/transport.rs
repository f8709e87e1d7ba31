//! HTTP access to the analysis service.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client};
use shared::{
    domain::AnalysisResult,
    error::{
        SessionError, GENERIC_FAILURE_MESSAGE, MALFORMED_RESPONSE_MESSAGE, TIMEOUT_MESSAGE,
    },
    protocol::{AnalyzeResponse, ErrorBody, HealthResponse, ANALYZE_PATH, FILE_FIELD, HEALTH_PATH},
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::ClientSettings, upload::SelectedFile};

/// Payload of one analysis call, detached from the selection it came from.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub mime_type: String,
    pub content: Arc<[u8]>,
}

impl AnalysisRequest {
    pub fn from_selected(file: &SelectedFile) -> Self {
        Self {
            file_name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            content: file.content().clone(),
        }
    }
}

#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, SessionError>;
}

pub struct HttpAnalysisTransport {
    http: Client,
    base_url: Url,
}

impl HttpAnalysisTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let base_url = settings.base_url()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        self.base_url.join(path).map_err(|err| {
            warn!(path, "failed to build endpoint url: {err}");
            SessionError::transport(GENERIC_FAILURE_MESSAGE)
        })
    }

    /// Probes `GET /health`, returning the status string the service reports.
    pub async fn check_health(&self) -> Result<String, SessionError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| transport_failure(&err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_failure(&err))?;
        if !status.is_success() {
            return Err(service_failure(status.as_u16(), &body));
        }
        let health: HealthResponse = serde_json::from_slice(&body).map_err(|err| {
            warn!("malformed health response: {err}");
            SessionError::transport(MALFORMED_RESPONSE_MESSAGE)
        })?;
        Ok(health.status)
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisTransport {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, SessionError> {
        let url = self.endpoint(ANALYZE_PATH)?;
        let part = multipart::Part::bytes(request.content.to_vec())
            .file_name(request.file_name.clone());
        // reqwest only rejects unparsable mime strings; those go out untyped.
        let part = match part.mime_str(&request.mime_type) {
            Ok(part) => part,
            Err(err) => {
                warn!(mime_type = %request.mime_type, "unusable mime type: {err}");
                multipart::Part::bytes(request.content.to_vec()).file_name(request.file_name)
            }
        };
        let form = multipart::Form::new().part(FILE_FIELD, part);

        debug!(%url, "posting analysis request");
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_failure(&err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_failure(&err))?;
        if status.is_success() {
            decode_success(&body)
        } else {
            Err(service_failure(status.as_u16(), &body))
        }
    }
}

pub fn decode_success(body: &[u8]) -> Result<AnalysisResult, SessionError> {
    serde_json::from_slice::<AnalyzeResponse>(body)
        .map(AnalysisResult::from)
        .map_err(|err| {
            warn!("malformed analysis response: {err}");
            SessionError::transport(MALFORMED_RESPONSE_MESSAGE)
        })
}

/// Maps a non-success response to a service error, preferring its `detail` string.
pub fn service_failure(status: u16, body: &[u8]) -> SessionError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail_message().map(str::to_string));
    match detail {
        Some(detail) => {
            warn!(status, %detail, "analysis service reported failure");
            SessionError::service(detail)
        }
        None => {
            warn!(status, "analysis service failed without detail");
            SessionError::service(format!("Request failed with status code {status}"))
        }
    }
}

pub fn transport_failure(err: &reqwest::Error) -> SessionError {
    warn!("analysis request failed in transport: {err}");
    if err.is_timeout() {
        SessionError::transport(TIMEOUT_MESSAGE)
    } else if err.is_decode() {
        SessionError::transport(MALFORMED_RESPONSE_MESSAGE)
    } else {
        SessionError::transport(GENERIC_FAILURE_MESSAGE)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
