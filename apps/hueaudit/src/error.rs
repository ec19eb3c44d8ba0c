//! Errors surfaced at the boundary (CLI, document loading, configuration).
//!
//! The analysis engine itself never returns these; it degrades to fewer
//! issues instead.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid document: {0}")]
    Document(String),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("scan of {path} did not finish within {limit:?}")]
    Timeout { path: PathBuf, limit: Duration },
}

pub type Result<T> = std::result::Result<T, AuditError>;
