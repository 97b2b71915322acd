// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Most failures in the pipeline are not errors at all: a bad
// line or a late reply is counted and skipped. The ones below
// are the exceptions a caller may want to match on.

use std::path::PathBuf;
use thiserror::Error;

/// Run-level failures that stop a pipeline before it writes anything
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input directory '{0}' does not exist or is not a directory")]
    MissingInputDir(PathBuf),

    #[error("input directory '{0}' has no category folders")]
    EmptyInputDir(PathBuf),

    #[error("invalid {name} pattern '{pattern}': {source}")]
    InvalidPattern {
        name:    &'static str,
        pattern: String,
        #[source]
        source:  regex::Error,
    },

    #[error("threshold_hours must be a finite, non-negative number of hours within range, got {0}")]
    InvalidThreshold(f64),
}

/// Reasons an export filename cannot be decoded into a counterpart name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    #[error("'{0}' is not a .txt file")]
    NotText(String),

    #[error("'{file}' does not start with the expected prefix '{prefix}'")]
    MissingPrefix { file: String, prefix: String },

    #[error("'{0}' has no name after the prefix")]
    EmptyName(String),
}
