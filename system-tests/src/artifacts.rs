// system-tests/src/artifacts.rs
// ============================================================================
// Module: Run Artifacts
// Description: Artifact writer for acceptance runs.
// Purpose: Persist deterministic run reports and HTTP transcripts.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! Each run writes into its own directory: the configured run root, or
//! `target/system-tests/run_{millis}` when none is set. JSON artifacts use
//! canonical JCS serialization so reports diff cleanly between runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use data_platform_client::Exchange;
use serde::Serialize;

use crate::config::SystemTestConfig;
use crate::runner::StepOutcome;
use crate::runner::SuiteReport;

// ============================================================================
// SECTION: Artifact Names
// ============================================================================

/// Canonical JSON suite report.
pub const REPORT_JSON: &str = "report.json";

/// Markdown suite report.
pub const REPORT_MARKDOWN: &str = "report.md";

/// Canonical JSON HTTP transcript.
pub const TRANSCRIPT_JSON: &str = "transcript.json";

/// Returns wall-clock milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Returns a fresh timestamped run root under `target/system-tests`.
fn default_run_root() -> PathBuf {
    PathBuf::from("target/system-tests").join(format!("run_{}", now_millis()))
}

// ============================================================================
// SECTION: Run Artifacts
// ============================================================================

/// Artifact directory for a single acceptance run.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    /// Directory receiving this run's artifacts.
    root: PathBuf,
}

impl RunArtifacts {
    /// Creates the run root from harness configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn new(config: &SystemTestConfig) -> io::Result<Self> {
        Self::at(config.run_root.clone().unwrap_or_else(default_run_root))
    }

    /// Creates the run root at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn at(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the run root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a UTF-8 text artifact.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }

    /// Writes the suite report and transcript, returning the written paths.
    ///
    /// # Errors
    ///
    /// Returns an error when any artifact cannot be written.
    pub fn write_suite(
        &self,
        report: &SuiteReport,
        transcript: &[Exchange],
    ) -> io::Result<Vec<PathBuf>> {
        Ok(vec![
            self.write_json(REPORT_JSON, report)?,
            self.write_text(REPORT_MARKDOWN, &report_markdown(report))?,
            self.write_json(TRANSCRIPT_JSON, &transcript)?,
        ])
    }
}

/// Renders a suite report as markdown.
#[must_use]
pub fn report_markdown(report: &SuiteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Feature: {}\n", report.feature);
    let _ = writeln!(
        out,
        "- Passed: {}\n- Failed: {}",
        report.passed_count(),
        report.failed_count()
    );
    if report.scenarios.is_empty() {
        out.push_str("\nNo scenarios selected.\n");
    }
    for scenario in &report.scenarios {
        let status = if scenario.passed() { "passed" } else { "failed" };
        let _ = writeln!(out, "\n## Scenario: {} ({status})\n", scenario.name);
        for step in &scenario.steps {
            let marker = match &step.outcome {
                StepOutcome::Passed => "[x]".to_string(),
                StepOutcome::Failed(message) => format!("[!] {message}"),
                StepOutcome::Skipped => "[-] skipped".to_string(),
            };
            let _ = writeln!(out, "- {} {} {marker}", step.keyword, step.text);
        }
    }
    out
}
