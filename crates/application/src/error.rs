//! Engine error types.

use keymapper_bindings::BindingError;
use keymapper_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error(transparent)]
    Bindings(#[from] BindingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The engine task has stopped; the command was not processed.
    #[error("engine is not running")]
    Closed,
}
