//! Naming convention rules.

use crate::report::{Finding, Severity};
use crate::rules::{AssetData, AuditRule};
use artaudit_rules::{AssetKind, NamingConventionRule, RuleSet};

/// Returns all naming rules.
pub fn all_rules() -> Vec<Box<dyn AuditRule>> {
    vec![Box::new(NamingRule)]
}

/// Rule: naming/convention
/// Asset or folder name lacks the prefix/suffix configured for its folder.
pub struct NamingRule;

impl NamingRule {
    fn finding(&self, path: &str, subject: &str, name: &str, convention: &NamingConventionRule) -> Finding {
        Finding::new(
            self.id(),
            path,
            self.default_severity(),
            format!(
                "{} '{}' in '{}' does not follow the naming convention (prefix '{}', suffix '{}').",
                subject, name, convention.folder_path, convention.required_prefix, convention.required_suffix
            ),
            format!(
                "Rename to '{}{}{}'.",
                convention.required_prefix,
                name.trim_start_matches(convention.required_prefix.as_str()),
                if name.ends_with(&convention.required_suffix) {
                    ""
                } else {
                    convention.required_suffix.as_str()
                }
            ),
        )
    }
}

fn file_stem(file_name: &str) -> &str {
    // Material documents carry a compound extension.
    let name = file_name.strip_suffix(".mat.json").unwrap_or(file_name);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}

impl AuditRule for NamingRule {
    fn id(&self) -> &'static str {
        "naming/convention"
    }

    fn description(&self) -> &'static str {
        "Name does not follow the folder's naming convention"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &AssetKind::ALL
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let path = asset.path();
        let mut findings = Vec::new();

        for convention in &rules.naming_rules {
            let Some(relative) = convention.relative_to_folder(path) else {
                continue;
            };
            let mut components: Vec<&str> = relative.split('/').filter(|c| !c.is_empty()).collect();
            let Some(file_name) = components.pop() else {
                continue;
            };

            if convention.applies_to_folders {
                for dir in components {
                    if !convention.accepts(dir) {
                        findings.push(self.finding(path, "Folder", dir, convention));
                    }
                }
            } else {
                let stem = file_stem(file_name);
                if !convention.accepts(stem) {
                    findings.push(self.finding(path, "Asset", stem, convention));
                }
            }
        }

        findings
    }
}
