//! Error types for rule set loading and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a rule set.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The rule set file does not exist.
    #[error("rule set not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The rule set file could not be read or written.
    #[error("failed to access rule set {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule set file is not valid JSON for a rule set.
    #[error("failed to parse rule set {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The rule set could not be serialized.
    #[error("failed to serialize rule set: {0}")]
    Serialize(#[from] serde_json::Error),
}
