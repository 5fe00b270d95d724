//! Rule-driven asset audit engine for artaudit.
//!
//! Evaluates asset metadata against a [`RuleSet`](artaudit_rules::RuleSet),
//! collects findings into a [`Report`], derives corrected import settings, and
//! applies structured remediations to materials.
//!
//! # Example
//!
//! ```
//! use artaudit_lint::{AssetData, RuleRegistry};
//! use artaudit_rules::{AudioImport, RuleSet};
//!
//! let rules = RuleSet::default();
//! let registry = RuleRegistry::default_rules();
//!
//! let clip = AudioImport::from_path("Audio/Theme.mp3");
//! let report = registry.audit([AssetData::Audio(&clip)], &rules);
//!
//! assert!(report.has_errors());
//! for finding in report.findings() {
//!     eprintln!("{}: {}", finding.severity(), finding.message());
//! }
//! ```

pub mod import;
pub mod registry;
pub mod remediation;
pub mod report;
pub mod rules;

pub use import::{derive_settings, AudioProfile, DerivedSettings};
pub use registry::{RuleMetadata, RuleRegistry};
pub use remediation::{
    apply_all, apply_fix, fix_finding, FixOutcome, MaterialHandle, MaterialStore, Remediation,
    RemediationSummary, ScalarReset,
};
pub use report::{Finding, Report, ReportSummary, Severity};
pub use rules::{AssetData, AuditRule};
