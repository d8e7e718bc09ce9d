//! Scripted in-memory service for tests
//!
//! Responses are queued per operation and popped in order; when a queue is
//! empty a benign default is returned so happy-path tests stay short. Every
//! operation counts its calls, which lets tests assert that guard failures
//! and simulated mode never touch the transport.

use super::types::{AnalysisResponse, AnalyzeRequest, ConversionResponse, ConvertRequest};
use super::{ModernizationService, ServiceError};
use crate::files::SourceFile;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Script {
    uploads: VecDeque<Result<String, ServiceError>>,
    analyses: VecDeque<Result<AnalysisResponse, ServiceError>>,
    conversions: VecDeque<Result<ConversionResponse, ServiceError>>,
    statuses: VecDeque<Value>,
}

/// Mock implementation of [`ModernizationService`] for tests
pub struct MockModernizationService {
    healthy: bool,
    script: Mutex<Script>,
    health_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    standards_calls: AtomicUsize,
    status_calls: AtomicUsize,
    analyze_calls: AtomicUsize,
    convert_calls: AtomicUsize,
}

impl MockModernizationService {
    /// A mock whose health probe reports the service as reachable
    pub fn new() -> Self {
        Self::with_health(true)
    }

    /// A mock whose health probe fails, forcing simulated mode
    pub fn unhealthy() -> Self {
        Self::with_health(false)
    }

    fn with_health(healthy: bool) -> Self {
        Self {
            healthy,
            script: Mutex::new(Script::default()),
            health_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            standards_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            analyze_calls: AtomicUsize::new(0),
            convert_calls: AtomicUsize::new(0),
        }
    }

    pub fn push_upload(&self, result: Result<String, ServiceError>) {
        self.script.lock().unwrap().uploads.push_back(result);
    }

    pub fn push_analysis(&self, result: Result<AnalysisResponse, ServiceError>) {
        self.script.lock().unwrap().analyses.push_back(result);
    }

    pub fn push_conversion(&self, result: Result<ConversionResponse, ServiceError>) {
        self.script.lock().unwrap().conversions.push_back(result);
    }

    pub fn push_status(&self, value: Value) {
        self.script.lock().unwrap().statuses.push_back(value);
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn standards_calls(&self) -> usize {
        self.standards_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn convert_calls(&self) -> usize {
        self.convert_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockModernizationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModernizationService for MockModernizationService {
    async fn health(&self) -> bool {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.healthy
    }

    async fn upload_sources(&self, _files: &[SourceFile]) -> Result<String, ServiceError> {
        let n = self.upload_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.script
            .lock()
            .unwrap()
            .uploads
            .pop_front()
            .unwrap_or_else(|| Ok(format!("mock-project-{}", n)))
    }

    async fn upload_standards(
        &self,
        _project_id: &str,
        _documents: &[(String, Vec<u8>)],
    ) -> Result<(), ServiceError> {
        self.standards_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn analysis_status(&self) -> Result<Value, ServiceError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .lock()
            .unwrap()
            .statuses
            .pop_front()
            .unwrap_or_else(|| json!({ "status": "processing" })))
    }

    async fn analyze(&self, _request: &AnalyzeRequest) -> Result<AnalysisResponse, ServiceError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .analyses
            .pop_front()
            .unwrap_or_else(|| Ok(AnalysisResponse::default()))
    }

    async fn convert(&self, _request: &ConvertRequest) -> Result<ConversionResponse, ServiceError> {
        self.convert_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .conversions
            .pop_front()
            .unwrap_or_else(|| Ok(ConversionResponse::default()))
    }
}
