//! Batch audit command implementation
//!
//! Scans the asset root, evaluates every asset, writes the JSON report beside
//! the root, and fails when any Error-level finding is present.

use anyhow::{Context, Result};
use artaudit_lint::Report;
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::reporting::{summary_line, write_report};
use super::{AuditOptions, Session};

/// Run the audit command.
///
/// # Arguments
/// * `root` - Asset root to scan
/// * `options` - Rule set location and rule filters
/// * `output` - Report path override (default: `AuditReport.json` beside the root)
/// * `json` - Print the report JSON instead of colored text
///
/// # Returns
/// Exit code: 0 if no errors (warnings allowed), 1 otherwise
pub fn run(root: &str, options: &AuditOptions, output: Option<&str>, json: bool) -> Result<ExitCode> {
    let session = Session::open(root, options)?;
    let report = session.run_audit();

    let report_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| session.project.report_path());
    let serialized = write_report_file(&report, &report_path)?;

    if json {
        println!("{}", serialized);
    } else {
        print_text_output(root, &report, &report_path)?;
    }

    Ok(exit_code(&report))
}

/// 1 when the report holds an Error finding; warnings and info pass.
pub fn exit_code(report: &Report) -> ExitCode {
    if report.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Serializes the report and writes it to `path`. Returns the JSON text.
pub fn write_report_file(report: &Report, path: &Path) -> Result<String> {
    let serialized = report
        .serialize()
        .context("Failed to serialize audit report")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, &serialized)
        .with_context(|| format!("Failed to write audit report: {}", path.display()))?;
    tracing::info!("audit report written to {}", path.display());
    Ok(serialized)
}

fn print_text_output(root: &str, report: &Report, report_path: &Path) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{} {}", "Auditing:".cyan().bold(), root)?;

    if report.is_empty() {
        writeln!(out, "\n{} No issues found", "PASSED".green().bold())?;
    } else {
        write_report(&mut out, report)?;
        let status = if report.has_errors() {
            "FAILED".red().bold()
        } else {
            "PASSED".green().bold()
        };
        writeln!(out, "\n{} {}", status, summary_line(report).dimmed())?;
    }

    writeln!(out, "{} {}", "Report:".dimmed(), report_path.display())?;
    Ok(())
}
