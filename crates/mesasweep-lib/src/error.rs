use std::path::PathBuf;

use thiserror::Error;

use crate::stage::StageKind;

/// Convenient result alias for the sweep library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a constant name is not part of the cgs table.
    #[error("unknown constant name: {name}{}", format_suggestions(.suggestions))]
    UnknownConstant {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an input parameter cannot produce physical derived values.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Raised when a grid axis has no values to sweep over.
    #[error("sweep grid axis {axis} is empty")]
    EmptyGridAxis { axis: &'static str },

    /// Raised when a configuration file could not be read.
    #[error("failed to read sweep configuration from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when a configuration file is not valid JSON for [`crate::SweepConfig`].
    #[error("failed to parse sweep configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the sweep configuration")]
    ProjectDirsUnavailable,

    /// The simulator program could not be started at all.
    #[error("failed to start simulator {program}: {source}")]
    SimulatorSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised in strict mode when a stage did not produce its artifact.
    #[error("stage {stage} did not produce {artifact}")]
    StageFailed { stage: StageKind, artifact: PathBuf },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialisation errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
