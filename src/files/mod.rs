//! Uploaded-file registry
//!
//! Holds the legacy source files selected for a conversion project, classifies
//! them by extension, and tracks the "active" file the caller is focused on.
//! Insertion order is preserved: when the active file is removed, selection
//! falls back to the first remaining file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Classification of an uploaded legacy source file, derived from its
/// extension once at ingest time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Cobol,
    Jcl,
    Copybook,
    Bms,
    Text,
    Unknown,
}

impl FileKind {
    /// Classifies a file name by its extension, case-insensitively.
    /// Unrecognized extensions (or none at all) map to `Unknown`.
    pub fn classify(name: &str) -> FileKind {
        let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
        match ext.as_str() {
            "cob" | "cobol" | "cbl" => FileKind::Cobol,
            "jcl" => FileKind::Jcl,
            "cpy" | "copybook" => FileKind::Copybook,
            "bms" => FileKind::Bms,
            "txt" => FileKind::Text,
            _ => FileKind::Unknown,
        }
    }

    /// Human-readable label matching the service's vocabulary
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Cobol => "COBOL",
            FileKind::Jcl => "JCL",
            FileKind::Copybook => "Copybook",
            FileKind::Bms => "BMS",
            FileKind::Text => "Text",
            FileKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One uploaded legacy source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name, unique within a [`FileSet`]
    pub name: String,
    /// Full text content
    pub content: String,
    /// Classification derived from the extension; never changes after ingest
    pub kind: FileKind,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FileKind::classify(&name);
        Self {
            name,
            content: content.into(),
            kind,
        }
    }
}

/// Per-kind counts over a file set, as shown in the upload summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub cobol: usize,
    pub jcl: usize,
    pub copybooks: usize,
    pub total: usize,
}

/// Error raised when a batch read fails; the whole batch is rejected
#[derive(Debug, Error)]
#[error("failed to read {name}: {source}")]
pub struct FileReadError {
    pub name: String,
    #[source]
    pub source: io::Error,
}

/// Insertion-ordered set of uploaded files, keyed by name.
///
/// Duplicate names overwrite the existing entry in place (last content wins,
/// no error). Tracks an active selection for presentation purposes.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<SourceFile>,
    active: Option<String>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a batch of files, overwriting entries with matching names.
    /// The active selection moves to the first file of the batch.
    pub fn ingest(&mut self, batch: Vec<SourceFile>) {
        let first = batch.first().map(|f| f.name.clone());
        for file in batch {
            self.insert(file);
        }
        if first.is_some() {
            self.active = first;
        }
    }

    fn insert(&mut self, file: SourceFile) {
        match self.files.iter_mut().find(|f| f.name == file.name) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    /// Removes one file by name. If it was the active selection, selection
    /// falls back to the first remaining file in order, or none.
    pub fn remove(&mut self, name: &str) {
        self.files.retain(|f| f.name != name);
        if self.active.as_deref() == Some(name) {
            self.active = self.files.first().map(|f| f.name.clone());
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.active = None;
    }

    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Name of the currently selected file, if any
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, name: &str) -> bool {
        if self.get(name).is_some() {
            self.active = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Per-kind counts, as the upload summary presents them
    pub fn stats(&self) -> FileStats {
        let mut stats = FileStats {
            total: self.files.len(),
            ..FileStats::default()
        };
        for file in &self.files {
            match file.kind {
                FileKind::Cobol => stats.cobol += 1,
                FileKind::Jcl => stats.jcl += 1,
                FileKind::Copybook => stats.copybooks += 1,
                _ => {}
            }
        }
        stats
    }

    /// Name-to-content mapping in the shape the service's `file_data` and
    /// `sourceCode` request fields expect
    pub fn as_content_map(&self) -> HashMap<String, String> {
        self.files
            .iter()
            .map(|f| (f.name.clone(), f.content.clone()))
            .collect()
    }
}

/// Reads a batch of files from disk, concurrently.
///
/// The batch is atomic: if any read fails the whole batch is rejected and
/// nothing is returned for the files that did read successfully.
pub async fn read_batch(paths: &[PathBuf]) -> Result<Vec<SourceFile>, FileReadError> {
    let reads = paths.iter().map(|path| async move {
        let name = file_name_of(path);
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(SourceFile::new(name, content)),
            Err(source) => Err(FileReadError { name, source }),
        }
    });
    futures_util::future::try_join_all(reads).await
}

/// Reads a batch of files from disk as raw bytes, concurrently and
/// atomically. Used for standards documents, which may be binary.
pub async fn read_batch_bytes(paths: &[PathBuf]) -> Result<Vec<(String, Vec<u8>)>, FileReadError> {
    let reads = paths.iter().map(|path| async move {
        let name = file_name_of(path);
        match tokio::fs::read(path).await {
            Ok(data) => Ok((name, data)),
            Err(source) => Err(FileReadError { name, source }),
        }
    });
    futures_util::future::try_join_all(reads).await
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
