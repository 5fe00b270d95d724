//! Shared terminal output for findings and report summaries

use artaudit_lint::{Finding, Report, Severity};
use colored::Colorize;
use std::io::{self, Write};

pub(crate) fn severity_marker(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "x".red(),
        Severity::Warning => "!".yellow(),
        Severity::Info => "i".blue(),
    }
}

/// Print a single finding.
pub(crate) fn write_finding<W: Write>(out: &mut W, finding: &Finding) -> io::Result<()> {
    writeln!(
        out,
        "  {} [{}] {}: {}",
        severity_marker(finding.severity()),
        finding.rule_id().cyan(),
        finding.asset_path().dimmed(),
        finding.message()
    )?;
    writeln!(out, "    {} {}", "suggestion:".dimmed(), finding.suggested_fix())?;
    if let Some(fix) = finding.fix() {
        writeln!(out, "    {} {}", "fix:".dimmed(), fix.label())?;
    }
    Ok(())
}

/// Print findings grouped by severity, most severe first.
pub(crate) fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    let sorted = report.sorted_for_display();

    for (severity, heading) in [
        (Severity::Error, "Errors:".red().bold()),
        (Severity::Warning, "Warnings:".yellow().bold()),
        (Severity::Info, "Info:".blue().bold()),
    ] {
        let group: Vec<&&Finding> = sorted.iter().filter(|f| f.severity() == severity).collect();
        if group.is_empty() {
            continue;
        }
        writeln!(out, "\n{}", heading)?;
        for finding in group {
            write_finding(out, finding)?;
        }
    }
    Ok(())
}

pub(crate) fn summary_line(report: &Report) -> String {
    let summary = report.summary();
    format!(
        "{} error(s), {} warning(s), {} info",
        summary.error_count, summary.warning_count, summary.info_count
    )
}
