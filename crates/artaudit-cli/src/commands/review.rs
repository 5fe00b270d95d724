//! Interactive review command implementation
//!
//! Lists findings most severe first and lets the user fix them one at a time
//! or all at once. Every fix is followed by a fresh audit, so the list always
//! reflects what is on disk.

use anyhow::Result;
use artaudit_lint::{apply_all, fix_finding, Finding, FixOutcome, Report};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use super::reporting::{severity_marker, summary_line};
use super::{AuditOptions, Session};
use crate::project::ProjectMaterials;

/// What happened during a review session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Fixes applied.
    pub applied: usize,
    /// Findings left after the last audit.
    pub remaining: usize,
}

/// Run the review command on stdin/stdout.
///
/// # Returns
/// Exit code: 0 if no errors remain, 1 otherwise
pub fn run(root: &str, options: &AuditOptions) -> Result<ExitCode> {
    let session = Session::open(root, options)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    review(&session, &mut input, &mut out)?;

    if session.run_audit().has_errors() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_findings<W: Write>(out: &mut W, findings: &[&Finding]) -> io::Result<()> {
    for (i, finding) in findings.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} {:<7} {}",
            i + 1,
            severity_marker(finding.severity()),
            finding.severity().to_string(),
            finding.asset_path().bold()
        )?;
        writeln!(out, "     {}", finding.message())?;
        writeln!(out, "     {} {}", "suggestion:".dimmed(), finding.suggested_fix())?;
        if let Some(fix) = finding.fix() {
            writeln!(out, "     {} {}", "fix available:".green(), fix.label())?;
        }
    }
    Ok(())
}

/// Reads one trimmed line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn confirmed(answer: Option<&str>) -> bool {
    matches!(answer, Some(a) if a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes"))
}

/// Runs the review loop over arbitrary input and output streams.
pub fn review<R: BufRead, W: Write>(session: &Session, input: &mut R, out: &mut W) -> Result<ReviewOutcome> {
    let mut store = ProjectMaterials::new(&session.project);
    let mut outcome = ReviewOutcome::default();
    let mut report: Report = session.run_audit();

    loop {
        if report.is_empty() {
            writeln!(out, "{} No issues found", "PASSED".green().bold())?;
            break;
        }

        let findings = report.sorted_for_display();
        let fixable = findings.iter().filter(|f| f.is_fixable()).count();
        writeln!(out, "\n{} {}", "Audit:".cyan().bold(), summary_line(&report))?;
        print_findings(out, &findings)?;

        let Some(choice) = prompt(
            input,
            out,
            "\nFix [number], fix [a]ll, [r]e-run, or [q]uit: ",
        )?
        else {
            break;
        };

        match choice.as_str() {
            "q" | "Q" => break,
            "r" | "R" => {}
            "a" | "A" => {
                if fixable == 0 {
                    writeln!(out, "Nothing to fix automatically.")?;
                    continue;
                }
                let answer = prompt(
                    input,
                    out,
                    &format!(
                        "Apply {} fix(es)? Material files will be modified. [y/N]: ",
                        fixable
                    ),
                )?;
                if !confirmed(answer.as_deref()) {
                    writeln!(out, "Cancelled.")?;
                    continue;
                }
                let summary = apply_all(&report, &mut store);
                outcome.applied += summary.applied.len();
                writeln!(
                    out,
                    "{} {} fix(es) applied, {} finding(s) need manual attention",
                    "Done:".green().bold(),
                    summary.applied.len(),
                    summary.unresolved.len()
                )?;
            }
            other => {
                let Some(finding) = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| findings.get(i))
                else {
                    writeln!(out, "Unknown choice '{}'.", other)?;
                    continue;
                };

                match fix_finding(finding, &mut store) {
                    Ok(FixOutcome::Applied) => {
                        outcome.applied += 1;
                        writeln!(out, "{} {}", "Fixed:".green().bold(), finding.asset_path())?;
                    }
                    Ok(FixOutcome::Noop) => {
                        writeln!(out, "No automatic fix for this finding; see the suggestion.")?;
                        continue;
                    }
                    Err(e) => {
                        tracing::error!("failed to fix {}: {}", finding.asset_path(), e);
                        writeln!(out, "{} {}", "Fix failed:".red().bold(), e)?;
                        continue;
                    }
                }
            }
        }

        report = session.run_audit();
    }

    outcome.remaining = report.len();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed() {
        assert!(confirmed(Some("y")));
        assert!(confirmed(Some("YES")));
        assert!(!confirmed(Some("")));
        assert!(!confirmed(Some("n")));
        assert!(!confirmed(None));
    }

    #[test]
    fn test_prompt_reads_trimmed_line() {
        let mut input = io::Cursor::new("  2 \n");
        let mut out = Vec::new();
        assert_eq!(
            prompt(&mut input, &mut out, "> ").unwrap(),
            Some("2".to_string())
        );
        assert_eq!(prompt(&mut input, &mut out, "> ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "> > ");
    }

    fn session_with_mp3() -> (tempfile::TempDir, Session) {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Theme.mp3"), b"ID3").unwrap();
        let session = Session::open(tmp.path().to_str().unwrap(), &AuditOptions::default()).unwrap();
        (tmp, session)
    }

    #[test]
    fn test_review_quits_on_end_of_input() {
        let (_tmp, session) = session_with_mp3();
        let mut input = io::Cursor::new("");
        let mut out = Vec::new();

        let outcome = review(&session, &mut input, &mut out).unwrap();
        assert_eq!(outcome.applied, 0);
        assert!(outcome.remaining >= 1);
        assert!(String::from_utf8_lossy(&out).contains("Theme.mp3"));
    }

    #[test]
    fn test_review_unfixable_choices() {
        let (_tmp, session) = session_with_mp3();
        let mut input = io::Cursor::new("a\n1\nfoo\nr\nq\n");
        let mut out = Vec::new();

        let outcome = review(&session, &mut input, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(outcome.applied, 0);
        assert!(text.contains("Nothing to fix automatically."));
        assert!(text.contains("No automatic fix for this finding"));
        assert!(text.contains("Unknown choice 'foo'."));
    }
}
