//! End-to-end workflow tests against the scripted mock service

use relift::service::{
    AnalysisResponse, ConversionResponse, ConvertedUnit, MockModernizationService, ServiceError,
};
use relift::workflow::{ServiceMode, WorkflowSession, WorkflowStage};
use relift::{ReliftConfig, SourceFile};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

fn test_config() -> ReliftConfig {
    ReliftConfig {
        service_url: "http://localhost:8010/cobo".to_string(),
        source_language: "COBOL".to_string(),
        target_language: "C#".to_string(),
        request_timeout_secs: 5,
        status_poll_secs: 1,
        simulated_delay_ms: 20,
        log_level: "info".to_string(),
    }
}

fn sample_files() -> Vec<SourceFile> {
    vec![
        SourceFile::new("BANKING.CBL", "IDENTIFICATION DIVISION.\nPROGRAM-ID. BANKING."),
        SourceFile::new("RUN.jcl", "//BANKJOB JOB"),
    ]
}

#[tokio::test]
async fn test_full_workflow_happy_path() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_upload(Ok("p-42".to_string()));
    mock.push_analysis(Ok(AnalysisResponse {
        project_id: Some("p-42".to_string()),
        business_requirements: json!({
            "Overview": { "Purpose of the System": "Settle nightly batches" }
        }),
        technical_requirements: json!({
            "technicalRequirements": [
                { "description": "Convert VSAM access to SQL", "complexity": "High" },
                { "description": "Preserve decimal precision" }
            ]
        }),
    }));
    mock.push_conversion(Ok(ConversionResponse {
        files: HashMap::from([("Program.cs".to_string(), "class Program {}".to_string())]),
        converted_code: vec![ConvertedUnit {
            content: "class Program {}".to_string(),
        }],
        unit_tests: "[Test] ...".to_string(),
        functional_tests: "scenario ...".to_string(),
    }));

    let mut session = WorkflowSession::start(test_config(), mock.clone()).await;
    assert_eq!(session.mode(), ServiceMode::Live);

    session.ingest_files(sample_files()).await.unwrap();
    assert_eq!(session.state().project_id.as_deref(), Some("p-42"));
    assert_eq!(session.state().files.active(), Some("BANKING.CBL"));

    session.analyze().await.unwrap();
    assert_eq!(session.state().stage, WorkflowStage::Reviewing);
    assert!(session
        .state()
        .business_requirements
        .contains("Settle nightly batches"));
    assert_eq!(session.state().requirements.len(), 2);
    assert!(session.state().requirements[0]
        .text
        .contains("Convert VSAM access to SQL"));

    session.convert().await.unwrap();
    assert_eq!(session.state().stage, WorkflowStage::Done);
    let artifacts = session.state().artifacts.as_ref().unwrap();
    assert_eq!(artifacts.primary_code, "class Program {}");
    assert!(session.state().warning.is_none());

    assert_eq!(mock.upload_calls(), 1);
    assert_eq!(mock.analyze_calls(), 1);
    assert_eq!(mock.convert_calls(), 1);
}

#[tokio::test]
async fn test_simulated_analysis_produces_fixed_output_without_calls() {
    let mock = Arc::new(MockModernizationService::unhealthy());

    let mut session = WorkflowSession::start(test_config(), mock.clone()).await;
    assert_eq!(session.mode(), ServiceMode::Simulated);

    session.ingest_files(sample_files()).await.unwrap();

    let started = Instant::now();
    session.analyze().await.unwrap();
    assert!(started.elapsed().as_millis() >= 20);

    assert_eq!(session.state().stage, WorkflowStage::Reviewing);
    let business_lines = session
        .state()
        .business_requirements
        .lines()
        .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .count();
    let technical_lines = session
        .state()
        .technical_requirements
        .lines()
        .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .count();
    assert_eq!(business_lines, 5);
    assert_eq!(technical_lines, 5);
    assert_eq!(session.state().requirements.len(), 5);

    // Nothing analysis-related left the process
    assert_eq!(mock.analyze_calls(), 0);
    assert_eq!(mock.status_calls(), 0);
}

#[tokio::test]
async fn test_empty_conversion_reaches_done_with_warning() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_conversion(Ok(ConversionResponse::default()));

    let mut session = WorkflowSession::start(test_config(), mock).await;
    session.ingest_files(sample_files()).await.unwrap();
    session.analyze().await.unwrap();
    session.convert().await.unwrap();

    assert_eq!(session.state().stage, WorkflowStage::Done);
    let artifacts = session.state().artifacts.as_ref().unwrap();
    assert!(artifacts.primary_code.is_empty());
    assert!(artifacts.files.is_empty());
    assert!(session
        .state()
        .warning
        .as_deref()
        .unwrap()
        .contains("no files"));
}

#[tokio::test]
async fn test_analysis_failure_preserves_files_for_retry() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_analysis(Err(ServiceError::Status {
        endpoint: "analyze-requirements",
        status: 500,
        message: "analysis backend exploded".to_string(),
    }));

    let mut session = WorkflowSession::start(test_config(), mock.clone()).await;
    session.ingest_files(sample_files()).await.unwrap();

    let err = session.analyze().await.unwrap_err();
    assert!(!err.is_input_error());
    assert_eq!(session.state().stage, WorkflowStage::Idle);
    assert!(session
        .state()
        .error
        .as_deref()
        .unwrap()
        .contains("analysis backend exploded"));
    // Uploaded files survive, so a retry needs no re-upload
    assert_eq!(session.state().files.len(), 2);

    session.analyze().await.unwrap();
    assert_eq!(session.state().stage, WorkflowStage::Reviewing);
    assert!(session.state().error.is_none());
    assert_eq!(mock.upload_calls(), 1);
    assert_eq!(mock.analyze_calls(), 2);
}

#[tokio::test]
async fn test_fallback_requirements_when_payload_is_unrecognized() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_analysis(Ok(AnalysisResponse {
        project_id: None,
        business_requirements: json!("already formatted text"),
        technical_requirements: json!({ "unexpected": true }),
    }));

    let mut session = WorkflowSession::start(test_config(), mock).await;
    session.ingest_files(sample_files()).await.unwrap();
    session.analyze().await.unwrap();

    assert_eq!(session.state().requirements.len(), 5);
    assert!(session.state().requirements[0]
        .text
        .contains("migrate from COBOL to C#"));
}

#[tokio::test]
async fn test_analysis_summary_is_stripped_from_business_text() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_analysis(Ok(AnalysisResponse {
        project_id: None,
        business_requirements: json!(
            "## Overview\n- handles transactions\n## Comprehensive Analysis Summary\ninternal notes"
        ),
        technical_requirements: json!("1. Migrate the batch jobs to C# services"),
    }));

    let mut session = WorkflowSession::start(test_config(), mock).await;
    session.ingest_files(sample_files()).await.unwrap();
    session.analyze().await.unwrap();

    let business = &session.state().business_requirements;
    assert!(business.contains("handles transactions"));
    assert!(!business.contains("internal notes"));
}

#[tokio::test]
async fn test_requirement_editing_between_analysis_and_conversion() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_analysis(Ok(AnalysisResponse {
        project_id: None,
        business_requirements: json!("business"),
        technical_requirements: json!("1. First requirement\n2. Second requirement"),
    }));

    let mut session = WorkflowSession::start(test_config(), mock).await;
    session.ingest_files(sample_files()).await.unwrap();
    session.analyze().await.unwrap();
    assert_eq!(session.state().requirements.len(), 2);

    let index = session.add_requirement();
    assert_eq!(index, 2);
    assert_eq!(session.state().requirements[index].text, "New requirement");
    session.edit_requirement(index, "Validate transaction codes before posting");
    session.delete_requirement(0);

    assert_eq!(session.state().requirements.len(), 2);
    assert_eq!(session.state().requirements[0].text, "Second requirement");

    session.convert().await.unwrap();
    assert_eq!(session.state().stage, WorkflowStage::Done);
}

#[tokio::test]
async fn test_reset_requires_fresh_upload_but_keeps_mode() {
    let mock = Arc::new(MockModernizationService::unhealthy());

    let mut session = WorkflowSession::start(test_config(), mock.clone()).await;
    session.ingest_files(sample_files()).await.unwrap();
    session.analyze().await.unwrap();
    assert_eq!(session.state().stage, WorkflowStage::Reviewing);

    session.reset();
    assert_eq!(session.mode(), ServiceMode::Simulated);
    assert_eq!(session.state().stage, WorkflowStage::Idle);
    assert!(session.state().files.is_empty());

    let err = session.analyze().await.unwrap_err();
    assert!(err.is_input_error());
    // The health probe ran exactly once, at session start
    assert_eq!(mock.health_calls(), 1);
}

#[tokio::test]
async fn test_upload_without_project_id_is_a_hard_failure() {
    let mock = Arc::new(MockModernizationService::new());
    mock.push_upload(Err(ServiceError::MissingProjectId));

    let mut session = WorkflowSession::start(test_config(), mock).await;
    let err = session.ingest_files(sample_files()).await.unwrap_err();
    assert!(!err.is_input_error());
    assert!(session.state().files.is_empty());
    assert!(session.state().project_id.is_none());
}

#[tokio::test]
async fn test_standards_upload_flows_through_after_ingest() {
    let mock = Arc::new(MockModernizationService::new());

    let mut session = WorkflowSession::start(test_config(), mock.clone()).await;
    session.ingest_files(sample_files()).await.unwrap();
    session
        .upload_standards(vec![("coding-standards.pdf".to_string(), vec![0x25, 0x50])])
        .await
        .unwrap();

    assert_eq!(mock.standards_calls(), 1);
}
