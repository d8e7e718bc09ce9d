//! Session state and the event reducer
//!
//! All session mutation flows through [`SessionState::apply`]. Async
//! operations never touch the fields directly; they produce [`StateEvent`]s,
//! which keeps the stage invariants in one place and testable without any
//! async machinery.
//!
//! Completion events carry the project id their operation targeted. If the
//! session has since been reset (or re-uploaded under a new project), the
//! id no longer matches and the event is discarded, so a slow response can
//! never clobber a newer session.

use crate::artifacts::ConversionArtifacts;
use crate::files::{FileReadError, FileSet, SourceFile};
use crate::requirements::RequirementItem;
use crate::service::ServiceError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Where the session sits in the upload → analyze → review → convert flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    /// Files may be uploaded; nothing is running
    Idle,
    /// A requirements analysis is in flight
    Analyzing,
    /// Requirements are available for review and editing
    Reviewing,
    /// A conversion is in flight
    Converting,
    /// Conversion artifacts are available
    Done,
}

/// Whether the session talks to the real service or produces fixed
/// illustrative output. Decided once by the health probe at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Live,
    Simulated,
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceMode::Live => f.write_str("live"),
            ServiceMode::Simulated => f.write_str("simulated"),
        }
    }
}

/// Errors surfaced by workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No files are uploaded; nothing to analyze or convert
    #[error("No files uploaded. Upload legacy source files first")]
    NoFiles,

    /// The operation needs a server-assigned project id
    #[error("No project id assigned yet. Upload files before requesting {operation}")]
    MissingProject { operation: &'static str },

    /// The same operation is already in flight
    #[error("{operation} is already in progress")]
    AlreadyRunning { operation: &'static str },

    /// A batch file read failed; nothing was ingested
    #[error(transparent)]
    FileRead(#[from] FileReadError),

    /// The service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl WorkflowError {
    /// Input errors are rejected before any transport call
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WorkflowError::NoFiles
                | WorkflowError::MissingProject { .. }
                | WorkflowError::AlreadyRunning { .. }
        )
    }
}

/// Everything that can change a session
#[derive(Debug)]
pub enum StateEvent {
    ModeDecided(ServiceMode),
    FilesIngested {
        files: Vec<SourceFile>,
        project_id: String,
    },
    FileRemoved {
        name: String,
    },
    ActiveFileSelected {
        name: String,
    },
    AnalysisStarted,
    AnalysisCompleted {
        project_id: String,
        business: String,
        technical: String,
        items: Vec<RequirementItem>,
    },
    AnalysisFailed {
        project_id: String,
        message: String,
    },
    RequirementAdded,
    RequirementEdited {
        index: usize,
        text: String,
    },
    RequirementDeleted {
        index: usize,
    },
    ConversionStarted,
    ConversionCompleted {
        project_id: String,
        artifacts: ConversionArtifacts,
    },
    ConversionFailed {
        project_id: String,
        message: String,
    },
    Reset,
}

/// Sentinel text for a freshly added requirement, meant to be edited
/// immediately
pub const NEW_REQUIREMENT_TEXT: &str = "New requirement";

/// The whole mutable state of one conversion session
#[derive(Debug)]
pub struct SessionState {
    pub stage: WorkflowStage,
    pub mode: ServiceMode,
    pub files: FileSet,
    /// Server-assigned identity binding uploads to analysis/conversion
    pub project_id: Option<String>,
    pub business_requirements: String,
    pub technical_requirements: String,
    /// The editable requirement list. Once parsed, this is the source of
    /// truth; edits never flow back into the document text.
    pub requirements: Vec<RequirementItem>,
    pub artifacts: Option<ConversionArtifacts>,
    /// Non-fatal notice, e.g. an empty conversion result
    pub warning: Option<String>,
    /// Human-readable message of the most recent failure
    pub error: Option<String>,
}

impl SessionState {
    pub fn new(mode: ServiceMode) -> Self {
        Self {
            stage: WorkflowStage::Idle,
            mode,
            files: FileSet::new(),
            project_id: None,
            business_requirements: String::new(),
            technical_requirements: String::new(),
            requirements: Vec::new(),
            artifacts: None,
            warning: None,
            error: None,
        }
    }

    /// The single mutation entry point. Completion events whose project id
    /// no longer matches the session are discarded.
    pub fn apply(&mut self, event: StateEvent) {
        match event {
            StateEvent::ModeDecided(mode) => {
                self.mode = mode;
            }

            StateEvent::FilesIngested { files, project_id } => {
                self.files.ingest(files);
                self.project_id = Some(project_id);
                self.error = None;
                if self.stage == WorkflowStage::Done {
                    self.stage = WorkflowStage::Idle;
                }
            }

            StateEvent::FileRemoved { name } => {
                self.files.remove(&name);
            }

            StateEvent::ActiveFileSelected { name } => {
                if !self.files.set_active(&name) {
                    warn!(%name, "cannot select an unknown file");
                }
            }

            StateEvent::AnalysisStarted => {
                self.stage = WorkflowStage::Analyzing;
                self.error = None;
            }

            StateEvent::AnalysisCompleted {
                project_id,
                business,
                technical,
                items,
            } => {
                if !self.is_current(&project_id) {
                    debug!(%project_id, "discarding stale analysis result");
                    return;
                }
                self.business_requirements = business;
                self.technical_requirements = technical;
                self.requirements = items;
                self.stage = WorkflowStage::Reviewing;
            }

            StateEvent::AnalysisFailed { project_id, message } => {
                if !self.is_current(&project_id) {
                    debug!(%project_id, "discarding stale analysis failure");
                    return;
                }
                self.error = Some(message);
                // Pre-call stage, so the caller can retry without re-uploading
                self.stage = WorkflowStage::Idle;
            }

            StateEvent::RequirementAdded => {
                self.requirements.push(RequirementItem::new(NEW_REQUIREMENT_TEXT));
            }

            StateEvent::RequirementEdited { index, text } => {
                match self.requirements.get_mut(index) {
                    Some(item) => item.text = text,
                    None => warn!(index, "cannot edit a requirement that does not exist"),
                }
            }

            StateEvent::RequirementDeleted { index } => {
                if index < self.requirements.len() {
                    self.requirements.remove(index);
                } else {
                    warn!(index, "cannot delete a requirement that does not exist");
                }
            }

            StateEvent::ConversionStarted => {
                self.stage = WorkflowStage::Converting;
                self.error = None;
                self.warning = None;
            }

            StateEvent::ConversionCompleted {
                project_id,
                artifacts,
            } => {
                if !self.is_current(&project_id) {
                    debug!(%project_id, "discarding stale conversion result");
                    return;
                }
                if artifacts.is_empty() {
                    self.warning =
                        Some("Conversion completed but no files were generated".to_string());
                }
                self.artifacts = Some(artifacts);
                self.stage = WorkflowStage::Done;
            }

            StateEvent::ConversionFailed { project_id, message } => {
                if !self.is_current(&project_id) {
                    debug!(%project_id, "discarding stale conversion failure");
                    return;
                }
                self.error = Some(message);
                self.stage = WorkflowStage::Reviewing;
            }

            StateEvent::Reset => {
                // Mode survives; only a fresh session re-probes the service
                let mode = self.mode;
                *self = SessionState::new(mode);
            }
        }
    }

    fn is_current(&self, project_id: &str) -> bool {
        self.project_id.as_deref() == Some(project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewing_state() -> SessionState {
        let mut state = SessionState::new(ServiceMode::Live);
        state.apply(StateEvent::FilesIngested {
            files: vec![SourceFile::new("A.cbl", "code")],
            project_id: "p-1".to_string(),
        });
        state.apply(StateEvent::AnalysisStarted);
        state.apply(StateEvent::AnalysisCompleted {
            project_id: "p-1".to_string(),
            business: "# Business Requirements".to_string(),
            technical: "# Technical Requirements".to_string(),
            items: vec![RequirementItem::new("first"), RequirementItem::new("second")],
        });
        state
    }

    #[test]
    fn test_happy_path_stage_transitions() {
        let mut state = reviewing_state();
        assert_eq!(state.stage, WorkflowStage::Reviewing);
        assert_eq!(state.requirements.len(), 2);

        state.apply(StateEvent::ConversionStarted);
        assert_eq!(state.stage, WorkflowStage::Converting);

        state.apply(StateEvent::ConversionCompleted {
            project_id: "p-1".to_string(),
            artifacts: ConversionArtifacts {
                files: [("Program.cs".to_string(), "x".to_string())].into(),
                ..ConversionArtifacts::default()
            },
        });
        assert_eq!(state.stage, WorkflowStage::Done);
        assert!(state.warning.is_none());
        assert!(state.artifacts.is_some());
    }

    #[test]
    fn test_empty_conversion_reaches_done_with_warning() {
        let mut state = reviewing_state();
        state.apply(StateEvent::ConversionStarted);
        state.apply(StateEvent::ConversionCompleted {
            project_id: "p-1".to_string(),
            artifacts: ConversionArtifacts::default(),
        });

        assert_eq!(state.stage, WorkflowStage::Done);
        assert!(state.warning.as_deref().unwrap().contains("no files"));
    }

    #[test]
    fn test_analysis_failure_returns_to_idle_with_message() {
        let mut state = SessionState::new(ServiceMode::Live);
        state.apply(StateEvent::FilesIngested {
            files: vec![SourceFile::new("A.cbl", "code")],
            project_id: "p-1".to_string(),
        });
        state.apply(StateEvent::AnalysisStarted);
        state.apply(StateEvent::AnalysisFailed {
            project_id: "p-1".to_string(),
            message: "analysis failed".to_string(),
        });

        assert_eq!(state.stage, WorkflowStage::Idle);
        assert_eq!(state.error.as_deref(), Some("analysis failed"));
        // Uploaded files survive the failure
        assert_eq!(state.files.len(), 1);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = reviewing_state();
        state.apply(StateEvent::Reset);
        assert_eq!(state.stage, WorkflowStage::Idle);

        // Result from before the reset lands late
        state.apply(StateEvent::AnalysisCompleted {
            project_id: "p-1".to_string(),
            business: "late".to_string(),
            technical: "late".to_string(),
            items: vec![RequirementItem::new("late")],
        });

        assert_eq!(state.stage, WorkflowStage::Idle);
        assert!(state.requirements.is_empty());
        assert!(state.business_requirements.is_empty());
    }

    #[test]
    fn test_completion_for_superseded_project_is_discarded() {
        let mut state = reviewing_state();
        state.apply(StateEvent::FilesIngested {
            files: vec![SourceFile::new("B.cbl", "newer")],
            project_id: "p-2".to_string(),
        });

        state.apply(StateEvent::ConversionStarted);
        state.apply(StateEvent::ConversionCompleted {
            project_id: "p-1".to_string(),
            artifacts: ConversionArtifacts::default(),
        });

        assert!(state.artifacts.is_none());
        assert_eq!(state.stage, WorkflowStage::Converting);
    }

    #[test]
    fn test_reset_clears_state_but_preserves_mode() {
        let mut state = reviewing_state();
        state.apply(StateEvent::ModeDecided(ServiceMode::Simulated));
        state.apply(StateEvent::Reset);

        assert_eq!(state.mode, ServiceMode::Simulated);
        assert_eq!(state.stage, WorkflowStage::Idle);
        assert!(state.files.is_empty());
        assert!(state.project_id.is_none());
        assert!(state.requirements.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_requirement_edits() {
        let mut state = reviewing_state();

        state.apply(StateEvent::RequirementAdded);
        assert_eq!(state.requirements.len(), 3);
        assert_eq!(state.requirements[2].text, NEW_REQUIREMENT_TEXT);

        state.apply(StateEvent::RequirementEdited {
            index: 2,
            text: "validate account numbers".to_string(),
        });
        assert_eq!(state.requirements[2].text, "validate account numbers");

        state.apply(StateEvent::RequirementDeleted { index: 0 });
        assert_eq!(state.requirements.len(), 2);
        assert_eq!(state.requirements[0].text, "second");

        // Out-of-range edits are ignored, not a panic
        state.apply(StateEvent::RequirementEdited {
            index: 99,
            text: "x".to_string(),
        });
        state.apply(StateEvent::RequirementDeleted { index: 99 });
        assert_eq!(state.requirements.len(), 2);
    }

    #[test]
    fn test_reupload_after_done_returns_to_idle() {
        let mut state = reviewing_state();
        state.apply(StateEvent::ConversionStarted);
        state.apply(StateEvent::ConversionCompleted {
            project_id: "p-1".to_string(),
            artifacts: ConversionArtifacts::default(),
        });
        assert_eq!(state.stage, WorkflowStage::Done);

        state.apply(StateEvent::FilesIngested {
            files: vec![SourceFile::new("B.cbl", "new run")],
            project_id: "p-2".to_string(),
        });
        assert_eq!(state.stage, WorkflowStage::Idle);
        assert_eq!(state.project_id.as_deref(), Some("p-2"));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(WorkflowError::NoFiles.is_input_error());
        assert!(WorkflowError::MissingProject { operation: "analysis" }.is_input_error());
        assert!(!WorkflowError::Service(ServiceError::MissingProjectId).is_input_error());
    }
}
