//! Model metadata scaffolding command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::{load_rules, open_project};
use crate::project::Project;
use crate::scaffold::{scaffold_all, ScaffoldSummary};

/// Run the scaffold command.
///
/// # Arguments
/// * `root` - Asset root to scan for models
/// * `rules_path` - Rule set override
/// * `json` - Print the summary as JSON
///
/// # Returns
/// Exit code: 0 if every model was scaffolded, 1 otherwise
pub fn run(root: &str, rules_path: Option<&str>, json: bool) -> Result<ExitCode> {
    let project = open_project(root)?;
    let rules = load_rules(&project, rules_path);

    let summary = scaffold_all(&project, &rules);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&project, &summary))?);
    } else {
        print_summary(&project, &summary);
    }

    if summary.failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn display_path(project: &Project, path: &Path) -> String {
    if path.starts_with(project.root()) {
        project.asset_path(path)
    } else {
        path.display().to_string()
    }
}

fn summary_json(project: &Project, summary: &ScaffoldSummary) -> serde_json::Value {
    let paths = |list: &[std::path::PathBuf]| -> Vec<String> {
        list.iter().map(|p| display_path(project, p)).collect()
    };
    serde_json::json!({
        "created": paths(&summary.created),
        "updated": paths(&summary.updated),
        "failed": summary
            .failed
            .iter()
            .map(|(model, error)| serde_json::json!({ "model": model, "error": error }))
            .collect::<Vec<_>>(),
    })
}

fn print_summary(project: &Project, summary: &ScaffoldSummary) {
    println!("{} {}", "Scaffolding:".cyan().bold(), project.root().display());

    for path in &summary.created {
        println!("  {} {}", "created".green(), display_path(project, path));
    }
    for path in &summary.updated {
        println!("  {} {}", "updated".blue(), display_path(project, path));
    }
    for (model, error) in &summary.failed {
        println!("  {} {}: {}", "x".red(), model, error);
    }

    let total = summary.created.len() + summary.updated.len();
    if total == 0 && summary.failed.is_empty() {
        println!("\nNo models found");
        return;
    }

    let status = if summary.failed.is_empty() {
        "DONE".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!(
        "\n{} {} created, {} updated, {} failed",
        status,
        summary.created.len(),
        summary.updated.len(),
        summary.failed.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_summary_json_uses_asset_paths() {
        let tmp = TempDir::new().unwrap();
        let project = Project::open(tmp.path()).unwrap();
        let summary = ScaffoldSummary {
            created: vec![tmp.path().join("Props").join("ModelData").join("Barrel_ModelData.json")],
            updated: vec![PathBuf::from("/elsewhere/Crate_ModelData.json")],
            failed: vec![("Props/Broken.glb".to_string(), "bad glTF".to_string())],
        };

        let value = summary_json(&project, &summary);
        assert_eq!(value["created"][0], "Props/ModelData/Barrel_ModelData.json");
        assert_eq!(value["updated"][0], "/elsewhere/Crate_ModelData.json");
        assert_eq!(value["failed"][0]["model"], "Props/Broken.glb");
    }
}
