//! artaudit CLI - Command-line interface for rule-driven asset auditing
//!
//! This binary audits an asset directory against a rule set, validates import
//! settings, applies material fixes, and manages model metadata.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use artaudit_cli::commands::{self, AuditOptions};

/// artaudit - Rule-driven asset auditing
#[derive(Parser)]
#[command(name = "artaudit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log engine diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every material, texture, model and audio clip under an asset root
    Audit {
        /// Asset root directory
        #[arg(long, default_value = "Assets")]
        root: String,

        /// Rule set file (default: ProjectValidationRules.json in the root)
        #[arg(short, long)]
        rules: Option<String>,

        /// Report file path (default: AuditReport.json beside the root)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the report as JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Disable specific audit rules (can be repeated)
        #[arg(long = "disable", value_name = "RULE_ID")]
        disable_rules: Vec<String>,

        /// Only run these rules (comma-separated list)
        #[arg(long = "only", value_name = "RULE_IDS")]
        only_rules: Option<String>,
    },

    /// Review findings interactively and apply material fixes
    Review {
        /// Asset root directory
        #[arg(long, default_value = "Assets")]
        root: String,

        /// Rule set file (default: ProjectValidationRules.json in the root)
        #[arg(short, long)]
        rules: Option<String>,

        /// Disable specific audit rules (can be repeated)
        #[arg(long = "disable", value_name = "RULE_ID")]
        disable_rules: Vec<String>,

        /// Only run these rules (comma-separated list)
        #[arg(long = "only", value_name = "RULE_IDS")]
        only_rules: Option<String>,
    },

    /// Derive import settings for textures, models and audio clips
    Import {
        /// Asset root directory
        #[arg(long, default_value = "Assets")]
        root: String,

        /// Rule set file (default: ProjectValidationRules.json in the root)
        #[arg(short, long)]
        rules: Option<String>,

        /// Write derived settings to each asset's .import.json sidecar
        #[arg(long)]
        write: bool,

        /// Print results as JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Create or refresh ModelData records for every model
    Scaffold {
        /// Asset root directory
        #[arg(long, default_value = "Assets")]
        root: String,

        /// Rule set file (default: ProjectValidationRules.json in the root)
        #[arg(short, long)]
        rules: Option<String>,

        /// Print the summary as JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Extract embedded images and materials from a glTF/GLB model
    Extract {
        /// Model file
        #[arg(short, long)]
        model: String,

        /// Print the summary as JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Inspect audit rules and manage the rule set file
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
}

#[derive(Subcommand)]
enum RulesCommands {
    /// List available audit rules
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default rule set
    Init {
        /// Asset root the rule set belongs to
        #[arg(long, default_value = "Assets")]
        root: String,

        /// Destination file (default: ProjectValidationRules.json in the root)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing rule set
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Audit {
            root,
            rules,
            output,
            json,
            disable_rules,
            only_rules,
        } => {
            let options = AuditOptions {
                rules_path: rules,
                disable_rules,
                only_rules,
            };
            commands::audit::run(&root, &options, output.as_deref(), json)
        }
        Commands::Review {
            root,
            rules,
            disable_rules,
            only_rules,
        } => {
            let options = AuditOptions {
                rules_path: rules,
                disable_rules,
                only_rules,
            };
            commands::review::run(&root, &options)
        }
        Commands::Import {
            root,
            rules,
            write,
            json,
        } => commands::import::run(&root, rules.as_deref(), write, json),
        Commands::Scaffold { root, rules, json } => {
            commands::scaffold::run(&root, rules.as_deref(), json)
        }
        Commands::Extract { model, json } => commands::extract::run(&model, json),
        Commands::Rules { command } => match command {
            RulesCommands::List { json } => commands::rules::list(json),
            RulesCommands::Init { root, path, force } => {
                commands::rules::init(path.as_deref(), &root, force)
            }
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_audit_defaults() {
        let cli = Cli::try_parse_from(["artaudit", "audit"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Audit {
                root,
                rules,
                output,
                json,
                disable_rules,
                only_rules,
            } => {
                assert_eq!(root, "Assets");
                assert!(rules.is_none());
                assert!(output.is_none());
                assert!(!json);
                assert!(disable_rules.is_empty());
                assert!(only_rules.is_none());
            }
            _ => panic!("expected audit command"),
        }
    }

    #[test]
    fn test_cli_parses_audit_filters() {
        let cli = Cli::try_parse_from([
            "artaudit",
            "audit",
            "--root",
            "Game/Assets",
            "--disable",
            "naming/convention",
            "--disable",
            "model/vertex-count",
            "--only",
            "audio/extension,model/scale",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Audit {
                root,
                json,
                disable_rules,
                only_rules,
                ..
            } => {
                assert_eq!(root, "Game/Assets");
                assert!(json);
                assert_eq!(disable_rules, vec!["naming/convention", "model/vertex-count"]);
                assert_eq!(only_rules.as_deref(), Some("audio/extension,model/scale"));
            }
            _ => panic!("expected audit command"),
        }
    }

    #[test]
    fn test_cli_parses_import_write() {
        let cli = Cli::try_parse_from(["artaudit", "import", "--root", "Assets", "--write"]).unwrap();
        match cli.command {
            Commands::Import { root, write, json, .. } => {
                assert_eq!(root, "Assets");
                assert!(write);
                assert!(!json);
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_cli_extract_requires_model() {
        assert!(Cli::try_parse_from(["artaudit", "extract"]).is_err());

        let cli =
            Cli::try_parse_from(["artaudit", "extract", "--model", "Props/Barrel.glb"]).unwrap();
        match cli.command {
            Commands::Extract { model, json } => {
                assert_eq!(model, "Props/Barrel.glb");
                assert!(!json);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_cli_parses_rules_init() {
        let cli = Cli::try_parse_from(["artaudit", "rules", "init", "--force", "-p", "rules.json"])
            .unwrap();
        match cli.command {
            Commands::Rules {
                command: RulesCommands::Init { root, path, force },
            } => {
                assert_eq!(root, "Assets");
                assert_eq!(path.as_deref(), Some("rules.json"));
                assert!(force);
            }
            _ => panic!("expected rules init"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["artaudit", "bake"]).is_err());
    }
}
