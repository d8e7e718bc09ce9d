//! relift - AI-assisted legacy code conversion workflow client
//!
//! This library drives a four-stage modernization workflow against a remote
//! analysis/conversion service: ingest legacy source artifacts (COBOL, JCL,
//! copybooks, BMS maps), request an AI-generated requirements analysis, let
//! the caller review and edit the extracted requirements, then request a code
//! conversion and capture the generated artifacts.
//!
//! # Core Concepts
//!
//! - **Workflow Session**: The stateful orchestrator that owns the project
//!   lifecycle. All mutations flow through a single reducer so stage
//!   invariants stay enforceable and testable without any rendering layer.
//! - **Service Mode**: A health probe at session start selects `Live` or
//!   `Simulated` for the whole session. In simulated mode the analysis stage
//!   produces fixed illustrative output instead of calling the network.
//! - **Normalization**: The service returns loosely structured JSON; the
//!   normalizer renders it into stable Markdown-like documents and a flat,
//!   independently editable requirement list.
//!
//! # Example Usage
//!
//! ```ignore
//! use relift::{ReliftConfig, WorkflowSession, HttpModernizationService, SourceFile};
//! use std::sync::Arc;
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ReliftConfig::default();
//!     let service = Arc::new(HttpModernizationService::from_config(&config));
//!     let mut session = WorkflowSession::start(config, service).await;
//!
//!     session
//!         .ingest_files(vec![SourceFile::new("BANKING.CBL", "IDENTIFICATION DIVISION.")])
//!         .await?;
//!     session.analyze().await?;
//!
//!     for item in &session.state().requirements {
//!         println!("- {}", item.text);
//!     }
//!
//!     session.convert().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`files`]: Uploaded-file registry and extension-based classification
//! - [`requirements`]: Requirement list parsing and response normalization
//! - [`service`]: Remote modernization service contract, HTTP client, mock
//! - [`workflow`]: Session state machine and async orchestration
//! - [`artifacts`]: Conversion output extraction and on-disk writing

// Public modules
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod files;
pub mod requirements;
pub mod service;
pub mod workflow;

// Re-export key types for convenient access
pub use artifacts::ConversionArtifacts;
pub use config::{ConfigError, ReliftConfig};
pub use files::{FileKind, FileSet, SourceFile};
pub use requirements::{parse_requirements, RequirementItem};
pub use service::{
    HttpModernizationService, MockModernizationService, ModernizationService, ServiceError,
};
pub use workflow::{
    ServiceMode, SessionState, StateEvent, WorkflowError, WorkflowSession, WorkflowStage,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
