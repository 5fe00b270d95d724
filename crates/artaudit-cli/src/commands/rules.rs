//! Rule listing and rule set initialization

use anyhow::{Context, Result};
use artaudit_lint::{RuleMetadata, RuleRegistry, Severity};
use artaudit_rules::RuleSet;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// List every registered audit rule.
///
/// # Arguments
/// * `json` - Print rule metadata as JSON
pub fn list(json: bool) -> Result<ExitCode> {
    let metadata = RuleRegistry::default_rules().rule_metadata();

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} ({})", "Audit rules".cyan().bold(), metadata.len());
    for rule in &metadata {
        print_rule(rule);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_rule(rule: &RuleMetadata) {
    let severity = match rule.severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Info => "info".blue(),
    };
    let kinds: Vec<String> = rule.applies_to.iter().map(|k| k.to_string()).collect();
    println!(
        "  {:<32} {:<8} [{}]",
        rule.id.bold(),
        severity,
        kinds.join(", ")
    );
    println!("    {}", rule.description.dimmed());
}

/// Where `init` writes: an explicit path, else the asset root's default.
pub fn init_path(path: Option<&str>, root: &str) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => RuleSet::default_path(Path::new(root)),
    }
}

/// Write the default rule set.
///
/// # Arguments
/// * `path` - Destination (default: the rule set file at `root`)
/// * `root` - Asset root
/// * `force` - Overwrite an existing file
pub fn init(path: Option<&str>, root: &str, force: bool) -> Result<ExitCode> {
    let target = init_path(path, root);
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    RuleSet::default()
        .save(&target)
        .with_context(|| format!("Failed to write rule set: {}", target.display()))?;

    tracing::info!("wrote default rule set to {}", target.display());
    println!("{} {}", "Created:".green().bold(), target.display());
    Ok(ExitCode::SUCCESS)
}
