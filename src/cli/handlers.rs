//! Command handlers
//!
//! Each handler returns a process exit code. Errors are rendered for humans
//! on stderr; stdout carries only the workflow's own output so it stays
//! pipeable.

use super::commands::{HealthArgs, RunArgs};
use crate::artifacts::write_requirements;
use crate::config::ReliftConfig;
use crate::files::read_batch_bytes;
use crate::service::{HttpModernizationService, ModernizationService};
use crate::workflow::{ServiceMode, WorkflowSession};
use anyhow::{ensure, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

/// File extensions accepted when scanning a source directory
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "cob", "cbl", "cobol", "jcl", "cpy", "copybook", "bms", "txt",
];

pub async fn handle_run(args: &RunArgs, quiet: bool) -> i32 {
    match run_workflow(args, quiet).await {
        Ok(()) => 0,
        Err(err) => {
            error!("Workflow failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

pub async fn handle_health(args: &HealthArgs) -> i32 {
    let mut config = ReliftConfig::default();
    if let Some(url) = &args.service_url {
        config.service_url = url.trim_end_matches('/').to_string();
    }
    if let Err(err) = config.validate() {
        eprintln!("Error: {}", err);
        return 1;
    }

    let service = HttpModernizationService::from_config(&config);
    if service.health().await {
        println!("{}: ok", config.service_url);
        0
    } else {
        println!("{}: unreachable", config.service_url);
        1
    }
}

async fn run_workflow(args: &RunArgs, quiet: bool) -> Result<()> {
    let mut config = ReliftConfig::default();
    if let Some(language) = &args.target_language {
        config.target_language = language.clone();
    }
    config.validate()?;

    let service = Arc::new(HttpModernizationService::from_config(&config));
    let mut session = WorkflowSession::start(config, service).await;
    if session.mode() == ServiceMode::Simulated && !quiet {
        eprintln!(
            "Service unreachable - running in simulated mode. Analysis output is illustrative; \
             conversion is unavailable."
        );
    }

    let paths = collect_source_paths(&args.sources)?;
    ensure!(
        !paths.is_empty(),
        "no source files found under {:?} (accepted extensions: {})",
        args.sources,
        ACCEPTED_EXTENSIONS.join(", ")
    );

    session
        .ingest_paths(&paths)
        .await
        .context("failed to upload source files")?;
    if !quiet {
        let stats = session.state().files.stats();
        eprintln!(
            "Uploaded {} files ({} COBOL, {} JCL, {} copybooks)",
            stats.total, stats.cobol, stats.jcl, stats.copybooks
        );
    }

    if !args.standards.is_empty() {
        let documents = read_batch_bytes(&args.standards)
            .await
            .context("failed to read standards documents")?;
        // Standards indexing is best-effort and never gates the workflow
        if let Err(err) = session.upload_standards(documents).await {
            warn!(error = %err, "standards upload failed, continuing without");
            eprintln!("Warning: standards upload failed: {}", err);
        }
    }

    let spinner = make_spinner(quiet, "Analyzing requirements...");
    let analysis = session.analyze().await;
    spinner.finish_and_clear();
    analysis.context("requirements analysis failed")?;

    if !quiet {
        eprintln!("Requirements ({} items):", session.state().requirements.len());
        for item in &session.state().requirements {
            println!("- {}", item.text);
        }
    }

    write_requirements(
        &args.output,
        &session.state().business_requirements,
        &session.state().technical_requirements,
    )
    .context("failed to write requirements files")?;

    if args.analyze_only {
        if !quiet {
            eprintln!("Requirements written to {}", args.output.display());
        }
        return Ok(());
    }

    let spinner = make_spinner(quiet, "Converting code...");
    let conversion = session.convert().await;
    spinner.finish_and_clear();
    conversion.context("conversion failed")?;

    if let Some(warning) = &session.state().warning {
        eprintln!("Warning: {}", warning);
    }

    let target_language = session.config().target_language.clone();
    if let Some(artifacts) = &session.state().artifacts {
        let written = artifacts
            .write_to_dir(&args.output, &target_language)
            .context("failed to write conversion artifacts")?;
        if !quiet {
            eprintln!(
                "Wrote {} artifacts to {}",
                written.len(),
                args.output.display()
            );
        }
    }

    Ok(())
}

/// Expands directories to their accepted source files, in sorted order;
/// explicitly named files are taken as-is.
pub fn collect_source_paths(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                .collect::<io::Result<Vec<_>>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && has_accepted_extension(path))
                .collect();
            entries.sort();
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn make_spinner(quiet: bool, message: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_scans_directories_for_accepted_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["B.jcl", "A.CBL", "notes.md", "REC.cpy"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let paths = collect_source_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A.CBL", "B.jcl", "REC.cpy"]);
    }

    #[test]
    fn test_collect_takes_explicit_files_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("program.weird");
        fs::write(&odd, "x").unwrap();

        // Extension filtering only applies to scanned directories
        let paths = collect_source_paths(&[odd.clone()]).unwrap();
        assert_eq!(paths, vec![odd]);
    }

    #[test]
    fn test_collect_of_empty_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_source_paths(&[dir.path().to_path_buf()])
            .unwrap()
            .is_empty());
    }
}
