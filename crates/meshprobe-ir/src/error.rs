//! Error types for loading mesh descriptions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or mapping a mesh description.
#[derive(Error, Debug)]
pub enum IrError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON root is not an object.
    #[error("expected a JSON object at the root, found {0}")]
    NotAnObject(&'static str),
}

/// Result type for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;
