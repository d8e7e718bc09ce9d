//! Conversion output extraction and on-disk writing
//!
//! The conversion response carries generated files, a converted-code array,
//! and test text. [`ConversionArtifacts`] flattens that into the shape the
//! rest of the workflow consumes, and knows how to lay the artifacts out in
//! an output directory.

use crate::service::ConversionResponse;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// All downloadable output of a completed conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionArtifacts {
    /// Generated files verbatim, name to content
    pub files: HashMap<String, String>,
    /// Content of the first `converted_code` entry; empty when the service
    /// generated none
    pub primary_code: String,
    pub unit_tests: String,
    pub functional_tests: String,
}

impl ConversionArtifacts {
    /// Flattens a conversion response. Every field defaults to empty rather
    /// than failing; an empty result is a warning, not an error.
    pub fn extract(response: ConversionResponse) -> Self {
        let primary_code = response
            .converted_code
            .into_iter()
            .next()
            .map(|unit| unit.content)
            .unwrap_or_default();
        Self {
            files: response.files,
            primary_code,
            unit_tests: response.unit_tests,
            functional_tests: response.functional_tests,
        }
    }

    /// True when the service generated no files at all
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Writes the converted code, tests, and every generated file under
    /// `dir`, returning the paths written.
    pub fn write_to_dir(&self, dir: &Path, target_language: &str) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let slug = language_slug(target_language);
        let mut written = Vec::new();

        let mut write = |name: String, content: &str| -> io::Result<()> {
            if content.is_empty() {
                return Ok(());
            }
            let path = dir.join(name);
            fs::write(&path, content)?;
            written.push(path);
            Ok(())
        };

        write(format!("converted_{}_code.cs", slug), &self.primary_code)?;
        write(format!("unit_tests_{}.cs", slug), &self.unit_tests)?;
        write(format!("functional_tests_{}.txt", slug), &self.functional_tests)?;
        for (name, content) in &self.files {
            write(sanitize_file_name(name), content)?;
        }

        info!(count = written.len(), dir = %dir.display(), "conversion artifacts written");
        Ok(written)
    }
}

/// Writes the requirements documents under `dir` as plain text files
pub fn write_requirements(dir: &Path, business: &str, technical: &str) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (name, content) in [
        ("business_requirements.txt", business),
        ("technical_requirements.txt", technical),
    ] {
        if content.is_empty() {
            continue;
        }
        let path = dir.join(name);
        fs::write(&path, content)?;
        written.push(path);
    }
    Ok(written)
}

/// Lowercase filesystem-safe slug for a language name. `#` becomes "sharp"
/// and `+` becomes "plus" so "C#" and "C++" stay recognizable.
pub fn language_slug(language: &str) -> String {
    let mut slug = String::new();
    for ch in language.chars() {
        match ch {
            '#' => slug.push_str("sharp"),
            '+' => slug.push_str("plus"),
            c if c.is_ascii_alphanumeric() => slug.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }
    if slug.is_empty() {
        slug.push_str("target");
    }
    slug
}

/// Strips path separators so a service-provided file name cannot escape the
/// output directory
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).to_string()
}
