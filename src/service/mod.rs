//! Remote modernization service contract
//!
//! [`ModernizationService`] is the seam between the workflow orchestrator and
//! the network. [`HttpModernizationService`] is the production implementation;
//! [`MockModernizationService`] scripts responses and counts calls for tests.

mod http;
mod mock;
mod types;

pub use http::HttpModernizationService;
pub use mock::MockModernizationService;
pub use types::{
    AnalysisResponse, AnalyzeRequest, ConversionResponse, ConvertRequest, ConvertedUnit,
    UploadResponse,
};

use crate::files::SourceFile;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from the service transport layer
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request timed out
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: &'static str },

    /// The service could not be reached
    #[error("Failed to reach the service at {endpoint}: {source}")]
    Connection {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport failure
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status
    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    /// The body was not the JSON shape the endpoint promises
    #[error("Malformed response from {endpoint}: {detail}")]
    MalformedResponse {
        endpoint: &'static str,
        detail: String,
    },

    /// An upload succeeded but the service assigned no project id
    #[error("Upload succeeded but no project id was assigned")]
    MissingProjectId,
}

/// Async contract for the remote analysis/conversion service.
///
/// One implementation talks HTTP; the mock drives tests. The orchestrator
/// only ever sees this trait.
#[async_trait]
pub trait ModernizationService: Send + Sync {
    /// Probes service availability. `true` means the service answered 200;
    /// any failure, including timeouts, is `false`.
    async fn health(&self) -> bool;

    /// Uploads a batch of legacy source files, returning the server-assigned
    /// project id.
    async fn upload_sources(&self, files: &[SourceFile]) -> Result<String, ServiceError>;

    /// Uploads standards documents against an existing project
    async fn upload_standards(
        &self,
        project_id: &str,
        documents: &[(String, Vec<u8>)],
    ) -> Result<(), ServiceError>;

    /// Fetches the current analysis status payload. The shape is
    /// service-defined and only logged, never interpreted.
    async fn analysis_status(&self) -> Result<Value, ServiceError>;

    /// Requests a requirements analysis over the uploaded files
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ServiceError>;

    /// Requests a code conversion over the uploaded files
    async fn convert(&self, request: &ConvertRequest) -> Result<ConversionResponse, ServiceError>;
}
