//! Rule registry for managing audit rules.

use crate::report::{Finding, Report, Severity};
use crate::rules::{audio, material, model, naming, texture, AssetData, AuditRule};
use artaudit_rules::{AssetKind, RuleSet};
use std::collections::HashSet;

/// Registry of all available audit rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn AuditRule>>,
    disabled_rules: HashSet<String>,
    enabled_only: Option<HashSet<String>>,
}

impl RuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            enabled_only: None,
        }
    }

    /// Creates a registry with all default rules registered.
    pub fn default_rules() -> Self {
        let mut registry = Self::new();

        for rule in material::all_rules() {
            registry.register(rule);
        }
        for rule in texture::all_rules() {
            registry.register(rule);
        }
        for rule in model::all_rules() {
            registry.register(rule);
        }
        for rule in audio::all_rules() {
            registry.register(rule);
        }
        for rule in naming::all_rules() {
            registry.register(rule);
        }

        registry
    }

    /// Registers a new audit rule.
    pub fn register(&mut self, rule: Box<dyn AuditRule>) {
        self.rules.push(rule);
    }

    /// Disables a rule by ID.
    pub fn disable_rule(&mut self, rule_id: &str) {
        self.disabled_rules.insert(rule_id.to_string());
    }

    /// Enables only the specified rules (disables all others).
    pub fn enable_only(&mut self, rule_ids: &[&str]) {
        self.enabled_only = Some(rule_ids.iter().map(|s| s.to_string()).collect());
    }

    /// Returns all registered rules.
    pub fn rules(&self) -> &[Box<dyn AuditRule>] {
        &self.rules
    }

    /// Returns rule metadata for documentation/introspection.
    pub fn rule_metadata(&self) -> Vec<RuleMetadata> {
        self.rules
            .iter()
            .map(|r| RuleMetadata {
                id: r.id().to_string(),
                description: r.description().to_string(),
                severity: r.default_severity(),
                applies_to: r.applies_to().to_vec(),
                enabled: self.is_rule_enabled(r.id()),
            })
            .collect()
    }

    /// Returns the number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Checks if a rule is enabled.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.disabled_rules.contains(rule_id) {
            return false;
        }
        if let Some(ref enabled) = self.enabled_only {
            return enabled.contains(rule_id);
        }
        true
    }

    /// Runs all applicable, enabled rules on one asset.
    pub fn evaluate(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let kind = asset.kind();
        let mut findings = Vec::new();

        for rule in &self.rules {
            if !self.is_rule_enabled(rule.id()) || !rule.applies_to().contains(&kind) {
                continue;
            }
            findings.extend(rule.check(asset, rules));
        }

        tracing::debug!("{} {}: {} finding(s)", kind, asset.path(), findings.len());
        findings
    }

    /// Evaluates every asset and collects the findings into a fresh report,
    /// in asset order.
    pub fn audit<'a, I>(&self, assets: I, rules: &RuleSet) -> Report
    where
        I: IntoIterator<Item = AssetData<'a>>,
    {
        let mut report = Report::new();
        for asset in assets {
            for finding in self.evaluate(&asset, rules) {
                report.add_finding(finding);
            }
        }
        report
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Metadata about an audit rule for documentation/introspection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RuleMetadata {
    /// Rule identifier.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Default severity level.
    pub severity: Severity,
    /// Asset kinds this rule applies to.
    pub applies_to: Vec<AssetKind>,
    /// Whether the rule runs under the current filters.
    pub enabled: bool,
}
