//! Mode state structures.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Whether classifier hints may change the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSwitchPolicy {
    pub enabled: bool,
}

impl Default for AutoSwitchPolicy {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Time-bounded guard that keeps an app-driven mode from being overridden by
/// the aspect-ratio fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeLock {
    pub locked_mode: Mode,
    /// Wall-clock milliseconds when the lock was set.
    pub locked_at_ms: i64,
}

impl ModeLock {
    pub fn new(locked_mode: Mode, locked_at_ms: i64) -> Self {
        Self {
            locked_mode,
            locked_at_ms,
        }
    }

    /// Whether the lock is still inside its window at `now_ms`.
    pub fn is_fresh(&self, now_ms: i64, window_ms: i64) -> bool {
        now_ms.saturating_sub(self.locked_at_ms) < window_ms
    }
}

/// How the active mode was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeOrigin {
    /// Loaded from persisted settings at startup.
    Restored,
    /// Explicit user selection (UI, tile, external settings change).
    Manual,
    /// Foreground app hint.
    App,
    /// Aspect-ratio fallback.
    Aspect,
}

impl ModeOrigin {
    /// Whether the mode was chosen by a person rather than inferred.
    pub fn is_user_choice(&self) -> bool {
        matches!(self, ModeOrigin::Restored | ModeOrigin::Manual)
    }
}

/// The currently active mode plus auto-switch state.
///
/// Holding a single `Mode` value makes mutual exclusivity structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeState {
    pub mode: Mode,
    pub origin: ModeOrigin,
    pub auto_switch: AutoSwitchPolicy,
    pub lock: Option<ModeLock>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: Mode::Default,
            origin: ModeOrigin::Restored,
            auto_switch: AutoSwitchPolicy::default(),
            lock: None,
        }
    }
}

impl ModeState {
    pub fn restored(mode: Mode, auto_switch_enabled: bool) -> Self {
        Self {
            mode,
            origin: ModeOrigin::Restored,
            auto_switch: AutoSwitchPolicy {
                enabled: auto_switch_enabled,
            },
            lock: None,
        }
    }
}

/// Why a mode transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchReason {
    Manual,
    AppHint,
    AspectFallback,
}

impl SwitchReason {
    pub(crate) fn origin(&self) -> ModeOrigin {
        match self {
            SwitchReason::Manual => ModeOrigin::Manual,
            SwitchReason::AppHint => ModeOrigin::App,
            SwitchReason::AspectFallback => ModeOrigin::Aspect,
        }
    }
}

/// A committed change of the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
    pub reason: SwitchReason,
    pub timestamp_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_freshness() {
        let lock = ModeLock::new(Mode::TikTok, 1_000);
        assert!(lock.is_fresh(1_000, 30_000));
        assert!(lock.is_fresh(30_999, 30_000));
        assert!(!lock.is_fresh(31_000, 30_000));
    }

    #[test]
    fn test_lock_tolerates_clock_going_backwards() {
        let lock = ModeLock::new(Mode::TikTok, 10_000);
        assert!(lock.is_fresh(9_950, 30_000));
    }

    #[test]
    fn test_restored_state() {
        let state = ModeState::restored(Mode::Baidu, false);
        assert_eq!(state.mode, Mode::Baidu);
        assert!(!state.auto_switch.enabled);
        assert!(state.origin.is_user_choice());
        assert!(state.lock.is_none());
    }

    #[test]
    fn test_origin_of_reason() {
        assert_eq!(SwitchReason::AppHint.origin(), ModeOrigin::App);
        assert!(!ModeOrigin::Aspect.is_user_choice());
    }
}
