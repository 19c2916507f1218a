//! Error types for key input.

use thiserror::Error;

/// Errors that can occur while decoding key input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The raw code does not belong to any remote button we handle.
    #[error("unmapped key code: {0}")]
    UnmappedKey(i32),

    /// The phase string was neither `down` nor `up`.
    #[error("invalid key phase: {0}")]
    InvalidPhase(String),
}

pub type Result<T> = std::result::Result<T, InputError>;
