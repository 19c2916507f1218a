//! Error types for binding table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;

/// Errors that can occur while loading a binding table.
#[derive(Debug, Error)]
pub enum BindingError {
    /// Failed to read the bindings file.
    #[error("Failed to read bindings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the table schema.
    #[error("Invalid bindings document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document declares a schema version we do not understand.
    #[error("Unsupported bindings version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Two entries share the same lookup key.
    #[error("Duplicate binding for {key}")]
    DuplicateBinding { key: String },

    /// An entry is structurally valid JSON but semantically wrong.
    #[error("Invalid binding for {key}: {message}")]
    InvalidBinding { key: String, message: String },
}
