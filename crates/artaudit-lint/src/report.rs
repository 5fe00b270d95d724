//! Audit report types for structured output.

use crate::remediation::Remediation;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Useful details about an asset.
    Info,
    /// Hurts optimization, worth reviewing.
    Warning,
    /// Breaks the pipeline contract, fails batch runs.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        f.write_str(name)
    }
}

/// A single issue detected in an asset.
///
/// Findings are immutable once built: fields are only readable through
/// accessors, and the builder methods consume the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    asset_path: String,
    message: String,
    severity: Severity,
    suggested_fix: String,
    rule_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fix: Option<Remediation>,
}

impl Finding {
    /// Creates a new finding with required fields.
    pub fn new(
        rule_id: impl Into<String>,
        asset_path: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) -> Self {
        Self {
            asset_path: asset_path.into(),
            message: message.into(),
            severity,
            suggested_fix: suggested_fix.into(),
            rule_id: rule_id.into(),
            fix: None,
        }
    }

    /// Builder method to attach an automated remediation.
    pub fn with_fix(mut self, fix: Remediation) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn suggested_fix(&self) -> &str {
        &self.suggested_fix
    }

    /// Identifier of the rule that produced this finding (e.g. "texture/max-size").
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// The automated remediation, if the finding is fixable.
    pub fn fix(&self) -> Option<&Remediation> {
        self.fix.as_ref()
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

/// Finding counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.error_count + self.warning_count + self.info_count
    }
}

/// Ordered findings from one audit run.
///
/// Error and warning flags are derived from the current findings on every
/// call, so they cannot drift from the contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    findings: Vec<Finding>,
}

/// On-disk shape of a report.
#[derive(Serialize)]
struct ReportDocument<'a> {
    issues: &'a [Finding],
    summary: ReportSummary,
}

#[derive(Deserialize)]
struct OwnedReportDocument {
    issues: Vec<Finding>,
}

impl Report {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding, preserving insertion order.
    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Appends all findings of another report.
    pub fn merge(&mut self, other: Report) {
        self.findings.extend(other.findings);
    }

    /// Findings in insertion order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Keeps only the findings matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&Finding) -> bool) {
        self.findings.retain(f);
    }

    /// Removes all findings.
    pub fn clear(&mut self) {
        self.findings.clear();
    }

    /// Returns true if any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Returns true if any finding is a warning.
    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Counts findings by severity.
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for finding in &self.findings {
            match finding.severity {
                Severity::Error => summary.error_count += 1,
                Severity::Warning => summary.warning_count += 1,
                Severity::Info => summary.info_count += 1,
            }
        }
        summary
    }

    /// Findings ordered for display: most severe first, then by asset path.
    ///
    /// This is a view; the report keeps insertion order.
    pub fn sorted_for_display(&self) -> Vec<&Finding> {
        let mut sorted: Vec<&Finding> = self.findings.iter().collect();
        sorted.sort_by(|a, b| {
            (Reverse(a.severity), &a.asset_path).cmp(&(Reverse(b.severity), &b.asset_path))
        });
        sorted
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ReportDocument {
            issues: &self.findings,
            summary: self.summary(),
        })
    }

    /// Parses a report previously produced by [`Report::serialize`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: OwnedReportDocument = serde_json::from_str(json)?;
        Ok(Self {
            findings: doc.issues,
        })
    }
}

impl FromIterator<Finding> for Report {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        Self {
            findings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artaudit_rules::TextureSlot;
    use pretty_assertions::assert_eq;

    fn warning(path: &str) -> Finding {
        Finding::new("test/warning", path, Severity::Warning, "Looks off", "Review it")
    }

    fn error(path: &str) -> Finding {
        Finding::new("test/error", path, Severity::Error, "Broken", "Fix it")
    }

    #[test]
    fn test_flags_follow_findings() {
        let mut report = Report::new();
        assert!(!report.has_errors());
        assert!(!report.has_warnings());

        report.add_finding(warning("a.mat.json"));
        assert!(report.has_warnings());
        assert!(!report.has_errors());

        report.add_finding(error("b.png"));
        assert!(report.has_errors());

        report.retain(|f| f.severity() != Severity::Error);
        assert!(!report.has_errors());
        assert!(report.has_warnings());

        report.clear();
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_summary_counts() {
        let report: Report = vec![
            warning("a"),
            error("b"),
            warning("c"),
            Finding::new("test/info", "d", Severity::Info, "Note", ""),
        ]
        .into_iter()
        .collect();

        let summary = report.summary();
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.warning_count, 2);
        assert_eq!(summary.info_count, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_sorted_view_keeps_insertion_order() {
        let report: Report = vec![warning("z.png"), error("y.png"), warning("a.png")]
            .into_iter()
            .collect();

        let sorted: Vec<&str> = report
            .sorted_for_display()
            .iter()
            .map(|f| f.asset_path())
            .collect();
        assert_eq!(sorted, vec!["y.png", "a.png", "z.png"]);

        let inserted: Vec<&str> = report.findings().iter().map(|f| f.asset_path()).collect();
        assert_eq!(inserted, vec!["z.png", "y.png", "a.png"]);
    }

    #[test]
    fn test_serialize_shape() {
        let mut report = Report::new();
        report.add_finding(
            Finding::new(
                "material/small-metallic-map",
                "Materials/Crate.mat.json",
                Severity::Warning,
                "Metallic map 'Crate \"M\"' is small",
                "remove",
            )
            .with_fix(Remediation::RemoveMap {
                slot: TextureSlot::Metallic,
                reset: None,
            }),
        );

        let json = report.serialize().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let issue = &value["issues"][0];
        assert_eq!(issue["assetPath"], "Materials/Crate.mat.json");
        assert_eq!(issue["severity"], "Warning");
        assert_eq!(issue["suggestedFix"], "remove");
        assert_eq!(issue["message"], "Metallic map 'Crate \"M\"' is small");
        assert_eq!(value["summary"]["warning_count"], 1);

        let parsed = Report::from_json(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
