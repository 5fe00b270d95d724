//! Import validation command implementation
//!
//! Derives the import settings each texture, model and audio clip should use,
//! reports what the import rules find, and optionally writes the derived
//! settings into the asset's sidecar.

use anyhow::{Context, Result};
use artaudit_lint::{derive_settings, AssetData, DerivedSettings, Finding, RuleRegistry, Severity};
use artaudit_rules::{AssetKind, RuleSet};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

use super::reporting::write_finding;
use super::{load_rules, open_project};
use crate::project::{write_sidecar, Project};

/// Import result for one asset.
#[derive(Debug, Clone, Serialize)]
pub struct ImportEntry {
    pub path: String,
    pub kind: AssetKind,
    pub settings: DerivedSettings,
    pub findings: Vec<Finding>,
    /// Sidecar written for this asset, when `--write` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<String>,
}

/// Run the import command.
///
/// # Arguments
/// * `root` - Asset root to scan
/// * `rules_path` - Rule set override
/// * `write` - Write derived settings to each asset's sidecar
/// * `json` - Print entries as JSON
///
/// # Returns
/// Exit code: 0 if no import errors, 1 otherwise
pub fn run(root: &str, rules_path: Option<&str>, write: bool, json: bool) -> Result<ExitCode> {
    let project = open_project(root)?;
    let rules = load_rules(&project, rules_path);
    let registry = RuleRegistry::default_rules();

    let inventory = project.scan(&rules);
    let mut entries = Vec::new();
    for asset in inventory.assets() {
        if let Some(entry) = import_asset(&project, &registry, &asset, &rules, write)? {
            entries.push(entry);
        }
    }

    let has_errors = entries
        .iter()
        .flat_map(|e| &e.findings)
        .any(|f| f.severity() == Severity::Error);

    if json {
        let text = serde_json::to_string_pretty(&entries).context("Failed to serialize import results")?;
        println!("{}", text);
    } else {
        print_text_output(root, &entries)?;
    }

    if has_errors {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Derives settings and findings for one asset. Materials yield `None`.
pub fn import_asset(
    project: &Project,
    registry: &RuleRegistry,
    asset: &AssetData,
    rules: &RuleSet,
    write: bool,
) -> Result<Option<ImportEntry>> {
    let Some(settings) = derive_settings(asset, rules) else {
        return Ok(None);
    };
    let findings = registry.evaluate(asset, rules);
    tracing::debug!("{}: {} import finding(s)", asset.path(), findings.len());

    let sidecar = if write {
        let target = project.resolve(asset.path());
        let written = match &settings {
            DerivedSettings::Texture(s) => write_sidecar(&target, s),
            DerivedSettings::Model(s) => write_sidecar(&target, s),
            DerivedSettings::Audio(s) => write_sidecar(&target, s),
        }
        .with_context(|| format!("Failed to write import settings for {}", asset.path()))?;
        tracing::info!("wrote {}", written.display());
        Some(project.asset_path(&written))
    } else {
        None
    };

    Ok(Some(ImportEntry {
        path: asset.path().to_string(),
        kind: asset.kind(),
        settings,
        findings,
        sidecar,
    }))
}

fn print_text_output(root: &str, entries: &[ImportEntry]) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{} {}", "Importing:".cyan().bold(), root)?;

    if entries.is_empty() {
        writeln!(out, "\nNo importable assets found")?;
        return Ok(());
    }

    for entry in entries {
        writeln!(out, "\n{} {}", entry.kind.to_string().dimmed(), entry.path.bold())?;
        match &entry.settings {
            DerivedSettings::Texture(s) => writeln!(
                out,
                "  type {:?}, sRGB {}, {:?}, crunched {} (quality {})",
                s.texture_type, s.srgb, s.compression, s.crunched, s.compression_quality
            )?,
            DerivedSettings::Model(s) => writeln!(
                out,
                "  scale {}, optimize vertices {}, lightmap UVs {}, {:?} mesh compression",
                s.global_scale, s.optimize_mesh_vertices, s.generate_secondary_uv, s.mesh_compression
            )?,
            DerivedSettings::Audio(s) => writeln!(
                out,
                "  {:?}, preload {}, {:?} at quality {}, {:?}",
                s.load_type, s.preload_audio_data, s.compression_format, s.quality, s.sample_rate_setting
            )?,
        }
        for finding in &entry.findings {
            write_finding(&mut out, finding)?;
        }
        if let Some(sidecar) = &entry.sidecar {
            writeln!(out, "  {} {}", "wrote".green(), sidecar)?;
        }
    }

    let errors = entries
        .iter()
        .flat_map(|e| &e.findings)
        .filter(|f| f.severity() == Severity::Error)
        .count();
    let status = if errors > 0 {
        "FAILED".red().bold()
    } else {
        "PASSED".green().bold()
    };
    writeln!(out, "\n{} {} asset(s), {} error(s)", status, entries.len(), errors)?;
    Ok(())
}
