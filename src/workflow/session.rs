//! Async workflow orchestration
//!
//! [`WorkflowSession`] owns one conversion project's lifecycle: upload,
//! analysis, review, conversion. It holds the [`SessionState`] and is the
//! only producer of [`StateEvent`]s; every async operation validates its
//! inputs first, fails fast without a transport call on violation, and
//! otherwise reduces its outcome into the state.

use super::simulated::{simulated_business_requirements, simulated_technical_requirements};
use super::state::{ServiceMode, SessionState, StateEvent, WorkflowError, WorkflowStage};
use crate::artifacts::ConversionArtifacts;
use crate::config::ReliftConfig;
use crate::files::{read_batch, SourceFile};
use crate::requirements::{
    normalize_business, normalize_technical, parse_requirements, strip_analysis_summary,
};
use crate::service::{AnalysisResponse, AnalyzeRequest, ConvertRequest, ModernizationService, ServiceError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One conversion project session, start to finish
pub struct WorkflowSession {
    config: ReliftConfig,
    service: Arc<dyn ModernizationService>,
    state: SessionState,
}

impl WorkflowSession {
    /// Starts a session, deciding the service mode with a single health
    /// probe. The mode is never revisited for the session's lifetime.
    pub async fn start(config: ReliftConfig, service: Arc<dyn ModernizationService>) -> Self {
        let mode = if service.health().await {
            ServiceMode::Live
        } else {
            ServiceMode::Simulated
        };
        match mode {
            ServiceMode::Live => info!(url = %config.service_url, "service reachable, session is live"),
            ServiceMode::Simulated => {
                warn!(url = %config.service_url, "service unreachable, session runs in simulated mode")
            }
        }
        Self {
            state: SessionState::new(mode),
            config,
            service,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &ReliftConfig {
        &self.config
    }

    pub fn mode(&self) -> ServiceMode {
        self.state.mode
    }

    /// Reads source files from disk and uploads them. The read is atomic:
    /// one failure rejects the batch before anything leaves the process.
    pub async fn ingest_paths(&mut self, paths: &[PathBuf]) -> Result<(), WorkflowError> {
        let files = read_batch(paths).await?;
        self.ingest_files(files).await
    }

    /// Uploads a batch of source files, binding the session to the
    /// server-assigned project id. Duplicate names overwrite in place.
    pub async fn ingest_files(&mut self, files: Vec<SourceFile>) -> Result<(), WorkflowError> {
        if files.is_empty() {
            return Err(WorkflowError::NoFiles);
        }
        let project_id = self.service.upload_sources(&files).await?;
        info!(%project_id, count = files.len(), "source files uploaded");
        self.state.apply(StateEvent::FilesIngested { files, project_id });
        Ok(())
    }

    /// Uploads standards documents against the current project. Optional
    /// pre-analysis step; a failure here never gates the workflow.
    pub async fn upload_standards(
        &mut self,
        documents: Vec<(String, Vec<u8>)>,
    ) -> Result<(), WorkflowError> {
        let project_id = self
            .state
            .project_id
            .clone()
            .ok_or(WorkflowError::MissingProject {
                operation: "standards upload",
            })?;
        self.service.upload_standards(&project_id, &documents).await?;
        info!(%project_id, count = documents.len(), "standards documents uploaded");
        Ok(())
    }

    /// Requests a requirements analysis over the uploaded files.
    ///
    /// In simulated mode this produces fixed illustrative documents after
    /// the configured delay, with no outbound call. In live mode the
    /// analysis-status endpoint is probed on an interval until the analysis
    /// resolves.
    pub async fn analyze(&mut self) -> Result<(), WorkflowError> {
        let project_id = self.guard("analysis")?;
        self.state.apply(StateEvent::AnalysisStarted);

        if self.state.mode == ServiceMode::Simulated {
            tokio::time::sleep(self.config.simulated_delay()).await;
            let business = simulated_business_requirements();
            let technical = simulated_technical_requirements(
                &self.config.source_language,
                &self.config.target_language,
            );
            let items = parse_requirements(&technical);
            self.state.apply(StateEvent::AnalysisCompleted {
                project_id,
                business,
                technical,
                items,
            });
            return Ok(());
        }

        let request = AnalyzeRequest {
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
            file_data: self.state.files.as_content_map(),
            project_id: project_id.clone(),
        };

        match self.run_analysis_with_probe(&request).await {
            Ok(response) => {
                if let Some(reported) = response.project_id.as_deref() {
                    if reported != project_id {
                        debug!(reported, "analysis response reported a different project id");
                    }
                }
                let business =
                    strip_analysis_summary(&normalize_business(&response.business_requirements));
                let technical = normalize_technical(
                    &response.technical_requirements,
                    &self.config.source_language,
                    &self.config.target_language,
                );
                let items = parse_requirements(&technical);
                info!(items = items.len(), "analysis completed");
                self.state.apply(StateEvent::AnalysisCompleted {
                    project_id,
                    business,
                    technical,
                    items,
                });
                Ok(())
            }
            Err(err) => {
                self.state.apply(StateEvent::AnalysisFailed {
                    project_id,
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Requests a code conversion over the uploaded files. Conversion has no
    /// simulated fallback; it always needs the real service.
    pub async fn convert(&mut self) -> Result<(), WorkflowError> {
        let project_id = self.guard("conversion")?;
        self.state.apply(StateEvent::ConversionStarted);

        let request = ConvertRequest {
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
            source_code: self.state.files.as_content_map(),
            project_id: project_id.clone(),
            cobol_filename: self
                .state
                .files
                .names()
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        match self.service.convert(&request).await {
            Ok(response) => {
                let artifacts = ConversionArtifacts::extract(response);
                info!(files = artifacts.files.len(), "conversion completed");
                self.state.apply(StateEvent::ConversionCompleted {
                    project_id,
                    artifacts,
                });
                Ok(())
            }
            Err(err) => {
                self.state.apply(StateEvent::ConversionFailed {
                    project_id,
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Appends a new requirement with sentinel text and returns its index,
    /// so a caller can immediately edit it.
    pub fn add_requirement(&mut self) -> usize {
        self.state.apply(StateEvent::RequirementAdded);
        self.state.requirements.len() - 1
    }

    pub fn edit_requirement(&mut self, index: usize, text: impl Into<String>) {
        self.state.apply(StateEvent::RequirementEdited {
            index,
            text: text.into(),
        });
    }

    pub fn delete_requirement(&mut self, index: usize) {
        self.state.apply(StateEvent::RequirementDeleted { index });
    }

    pub fn remove_file(&mut self, name: impl Into<String>) {
        self.state.apply(StateEvent::FileRemoved { name: name.into() });
    }

    pub fn select_file(&mut self, name: impl Into<String>) {
        self.state.apply(StateEvent::ActiveFileSelected { name: name.into() });
    }

    /// Clears the session back to a fresh upload stage. The service mode
    /// survives; only a new session re-probes.
    pub fn reset(&mut self) {
        self.state.apply(StateEvent::Reset);
    }

    /// Runs the analysis request while probing the status endpoint on the
    /// configured interval. Probe failures are ignored; the probe ends the
    /// instant the analysis resolves.
    async fn run_analysis_with_probe(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<AnalysisResponse, ServiceError> {
        let analysis = self.service.analyze(request);
        tokio::pin!(analysis);
        let mut probe = tokio::time::interval(self.config.status_poll_interval());

        loop {
            tokio::select! {
                result = &mut analysis => return result,
                _ = probe.tick() => {
                    match self.service.analysis_status().await {
                        Ok(status) => debug!(%status, "analysis status"),
                        Err(err) => debug!(error = %err, "status probe failed, ignoring"),
                    }
                }
            }
        }
    }

    /// Common preconditions for analysis and conversion. Violations are
    /// input errors, rejected before any transport call.
    fn guard(&self, operation: &'static str) -> Result<String, WorkflowError> {
        if self.state.files.is_empty() {
            return Err(WorkflowError::NoFiles);
        }
        let project_id = self
            .state
            .project_id
            .clone()
            .ok_or(WorkflowError::MissingProject { operation })?;
        if matches!(
            self.state.stage,
            WorkflowStage::Analyzing | WorkflowStage::Converting
        ) {
            return Err(WorkflowError::AlreadyRunning { operation });
        }
        Ok(project_id)
    }
}
