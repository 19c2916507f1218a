//! The output side: where resolved actions go.

use keymapper_bindings::Action;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The host refused the gesture or command.
    #[error("action rejected: {0}")]
    Rejected(String),

    /// The host cannot perform actions right now.
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Executes actions on the host (gesture dispatch, media keys).
///
/// Called on the engine task; implementations must return promptly.
pub trait ActionSink: Send + Sync {
    fn perform(&self, action: &Action) -> Result<(), SinkError>;
}

pub type ActionSinkRef = Arc<dyn ActionSink>;

/// Records every action. Can be told to reject them.
#[derive(Default)]
pub struct RecordingSink {
    actions: Mutex<Vec<Action>>,
    failure: Mutex<Option<SinkError>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Action>> {
        self.actions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Actions received so far, including rejected ones.
    pub fn actions(&self) -> Vec<Action> {
        self.guard().clone()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    /// Reject every following action with `error`, or accept again on `None`.
    pub fn set_failure(&self, error: Option<SinkError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }
}

impl ActionSink for RecordingSink {
    fn perform(&self, action: &Action) -> Result<(), SinkError> {
        self.guard().push(*action);
        match &*self.failure.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        sink.perform(&Action::Tap { x: 1, y: 2 }).unwrap();

        sink.set_failure(Some(SinkError::Rejected("busy".into())));
        assert!(sink.perform(&Action::NoOp).is_err());

        assert_eq!(sink.actions(), vec![Action::Tap { x: 1, y: 2 }, Action::NoOp]);
    }
}
