//! Error types for the declaration extraction pipeline
//!
//! Every failure is fatal: the pipeline stops at the first error and no
//! output file is written.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort the pipeline
#[derive(Error, Debug)]
pub enum DeclExtractError {
    #[error("Failed to load compilation database {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("{0}")]
    Subprocess(String),

    #[error("Parsing error at line {line}: {message}")]
    Parse {
        line: usize,
        message: String,
        /// Text that failed to parse, echoed for diagnosis
        text: String,
    },

    #[error("Failed to read syscall table {path}: {source}")]
    TableIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, DeclExtractError>;
