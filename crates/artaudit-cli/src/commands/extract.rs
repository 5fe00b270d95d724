//! Embedded asset extraction command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::extract::{extract_embedded, ExtractProgress};

/// Run the extract command.
///
/// # Arguments
/// * `model` - glTF or GLB file to extract from
/// * `json` - Print the summary as JSON instead of progress lines
///
/// # Returns
/// Exit code: 0 if everything was extracted, 1 if any image failed
pub fn run(model: &str, json: bool) -> Result<ExitCode> {
    let model_path = Path::new(model);
    if !model_path.is_file() {
        anyhow::bail!("Model not found: {}", model);
    }

    if !json {
        println!("{} {}", "Extracting:".cyan().bold(), model);
    }

    let summary = extract_embedded(model_path, |event| {
        if !json {
            print_progress(event);
        }
    })
    .with_context(|| format!("Failed to extract from {}", model))?;

    if json {
        let value = serde_json::json!({
            "images": summary.images.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "materials": summary.materials.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "failed": summary.failed,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    if summary.failed > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_progress(event: &ExtractProgress) {
    match event {
        ExtractProgress::Started { images, materials } => {
            println!("  {} embedded image(s), {} material(s)", images, materials);
        }
        ExtractProgress::Extracted { path } => {
            println!("  {} {}", "+".green(), path.display());
        }
        ExtractProgress::Failed { name, reason } => {
            println!("  {} {}: {}", "x".red(), name, reason);
        }
        ExtractProgress::Finished { extracted, failed } => {
            let status = if *failed == 0 {
                "DONE".green().bold()
            } else {
                "FAILED".red().bold()
            };
            println!("\n{} {} extracted, {} failed", status, extracted, failed);
        }
    }
}
