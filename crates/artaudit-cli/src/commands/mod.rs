//! CLI command implementations

pub mod audit;
pub mod extract;
pub mod import;
pub mod review;
pub mod rules;
pub mod scaffold;

mod reporting;

use anyhow::{Context, Result};
use artaudit_lint::{Report, RuleRegistry};
use artaudit_rules::RuleSet;
use std::path::Path;

use crate::project::Project;

/// Rule selection shared by the audit-style commands.
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Rule set file; defaults to the one at the asset root.
    pub rules_path: Option<String>,
    /// Rule IDs to disable.
    pub disable_rules: Vec<String>,
    /// Comma-separated rule IDs to run exclusively.
    pub only_rules: Option<String>,
}

/// An opened asset root with its rule set and configured registry.
pub struct Session {
    pub project: Project,
    pub rules: RuleSet,
    pub registry: RuleRegistry,
}

impl Session {
    pub fn open(root: &str, options: &AuditOptions) -> Result<Self> {
        let project = open_project(root)?;
        let rules = load_rules(&project, options.rules_path.as_deref());

        let mut registry = RuleRegistry::default_rules();
        for rule_id in &options.disable_rules {
            registry.disable_rule(rule_id);
        }
        if let Some(only) = &options.only_rules {
            let ids: Vec<&str> = only.split(',').map(|s| s.trim()).collect();
            registry.enable_only(&ids);
        }

        Ok(Self {
            project,
            rules,
            registry,
        })
    }

    /// Full re-scan and evaluation of the asset root.
    pub fn run_audit(&self) -> Report {
        let inventory = self.project.scan(&self.rules);
        self.registry.audit(inventory.assets(), &self.rules)
    }
}

pub(crate) fn open_project(root: &str) -> Result<Project> {
    Project::open(root).with_context(|| format!("Cannot open asset root: {}", root))
}

/// Loads the rule set, falling back to defaults when it is missing or
/// malformed.
pub(crate) fn load_rules(project: &Project, rules_path: Option<&str>) -> RuleSet {
    match rules_path {
        Some(path) => RuleSet::load_or_default(Path::new(path)),
        None => RuleSet::load_or_default(&project.rules_path()),
    }
}
