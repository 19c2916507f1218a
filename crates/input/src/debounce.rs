//! Play/pause debouncing.

use std::time::Duration;

/// Minimum spacing between two emitted play/pause commands.
pub const PLAY_PAUSE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Suppresses a play/pause that follows another one too closely.
///
/// Remotes with several OK-like codes (and bouncy switches) often deliver the
/// same press twice.
#[derive(Debug, Clone)]
pub struct PlayPauseDebouncer {
    window_ms: i64,
    last_emitted_at: Option<i64>,
}

impl Default for PlayPauseDebouncer {
    fn default() -> Self {
        Self::new(PLAY_PAUSE_DEBOUNCE)
    }
}

impl PlayPauseDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis() as i64,
            last_emitted_at: None,
        }
    }

    /// Returns `true` and records `now_ms` if the command may go out.
    pub fn should_emit(&mut self, now_ms: i64) -> bool {
        if let Some(last) = self.last_emitted_at {
            if now_ms - last < self.window_ms {
                tracing::debug!(since_last_ms = now_ms - last, "play/pause debounced");
                return false;
            }
        }
        self.last_emitted_at = Some(now_ms);
        true
    }

    pub fn last_emitted_at(&self) -> Option<i64> {
        self.last_emitted_at
    }
}
