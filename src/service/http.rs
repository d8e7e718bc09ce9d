//! HTTP implementation of the modernization service contract

use super::types::{
    AnalysisResponse, AnalyzeRequest, ConversionResponse, ConvertRequest, UploadResponse,
};
use super::{ModernizationService, ServiceError};
use crate::config::ReliftConfig;
use crate::files::SourceFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed client for the modernization service.
///
/// All endpoints hang off one fixed base path. Non-2xx responses are fully
/// consumed as text and JSON-decoded for an `error` field when possible, so
/// the caller always gets the service's own message rather than a bare
/// status code.
pub struct HttpModernizationService {
    client: Client,
    base_url: String,
}

impl HttpModernizationService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ReliftConfig) -> Self {
        Self::new(&config.service_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ModernizationService for HttpModernizationService {
    async fn health(&self) -> bool {
        match self.client.get(self.endpoint("health")).send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                debug!(status = %response.status(), healthy, "health probe answered");
                healthy
            }
            Err(err) => {
                debug!(error = %err, "health probe failed");
                false
            }
        }
    }

    async fn upload_sources(&self, files: &[SourceFile]) -> Result<String, ServiceError> {
        const ENDPOINT: &str = "upload-cobol-files";

        let mut form = Form::new();
        for file in files {
            let part = Part::text(file.content.clone()).file_name(file.name.clone());
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.endpoint(ENDPOINT))
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(ENDPOINT, err))?;
        let response = check_status(ENDPOINT, response).await?;

        let body: UploadResponse = decode_json(ENDPOINT, response).await?;
        body.project_id.ok_or(ServiceError::MissingProjectId)
    }

    async fn upload_standards(
        &self,
        project_id: &str,
        documents: &[(String, Vec<u8>)],
    ) -> Result<(), ServiceError> {
        const ENDPOINT: &str = "upload-standards-documents";

        let mut form = Form::new().text("project_id", project_id.to_string());
        for (name, data) in documents {
            let part = Part::bytes(data.clone()).file_name(name.clone());
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.endpoint(ENDPOINT))
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(ENDPOINT, err))?;
        check_status(ENDPOINT, response).await?;
        Ok(())
    }

    async fn analysis_status(&self) -> Result<Value, ServiceError> {
        const ENDPOINT: &str = "analysis-status";

        let response = self
            .client
            .get(self.endpoint(ENDPOINT))
            .send()
            .await
            .map_err(|err| transport_error(ENDPOINT, err))?;
        let response = check_status(ENDPOINT, response).await?;
        decode_json(ENDPOINT, response).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ServiceError> {
        const ENDPOINT: &str = "analyze-requirements";

        debug!(
            project_id = %request.project_id,
            files = request.file_data.len(),
            "sending analysis request"
        );
        let response = self
            .client
            .post(self.endpoint(ENDPOINT))
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error(ENDPOINT, err))?;
        let response = check_status(ENDPOINT, response).await?;
        decode_json(ENDPOINT, response).await
    }

    async fn convert(&self, request: &ConvertRequest) -> Result<ConversionResponse, ServiceError> {
        const ENDPOINT: &str = "convert";

        debug!(
            project_id = %request.project_id,
            files = request.source_code.len(),
            target = %request.target_language,
            "sending conversion request"
        );
        let response = self
            .client
            .post(self.endpoint(ENDPOINT))
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error(ENDPOINT, err))?;
        let response = check_status(ENDPOINT, response).await?;
        decode_json(ENDPOINT, response).await
    }
}

fn transport_error(endpoint: &'static str, err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout { endpoint }
    } else if err.is_connect() {
        ServiceError::Connection {
            endpoint,
            source: err,
        }
    } else {
        ServiceError::Transport {
            endpoint,
            source: err,
        }
    }
}

/// Passes 2xx responses through; otherwise consumes the body and surfaces
/// the most specific message it can find.
async fn check_status(endpoint: &'static str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(endpoint, status = status.as_u16(), "service returned an error status");
    Err(ServiceError::Status {
        endpoint,
        status: status.as_u16(),
        message: error_message(&body, status.as_u16()),
    })
}

/// Prefers the body's JSON `error` field, then the raw body, then the bare
/// status code
fn error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ServiceError> {
    response
        .json()
        .await
        .map_err(|err| ServiceError::MalformedResponse {
            endpoint,
            detail: err.to_string(),
        })
}
