//! Mode resolution state machine.
//!
//! Combines manual selection, foreground-app hints and the aspect-ratio
//! fallback into the single active mode.
//!
//! ```text
//!   select(m)            ──► m, lock cleared           (always)
//!   app hint m           ──► m, lock = (m, now)        (auto-switch on)
//!   aspect fallback m    ──► m, no lock                (auto-switch on,
//!                                                       lock stale or broken,
//!                                                       mode not user-chosen)
//! ```

use crate::foreground::AppHint;
use crate::mode::Mode;
use crate::shape::AspectBucket;
use crate::state::{ModeLock, ModeState, ModeTransition, SwitchReason};
use std::time::Duration;

/// How long an app-driven mode is protected from the aspect-ratio fallback.
pub const MODE_LOCK_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ModeResolver {
    state: ModeState,
    lock_window_ms: i64,
}

impl Default for ModeResolver {
    fn default() -> Self {
        Self::new(ModeState::default())
    }
}

impl ModeResolver {
    pub fn new(state: ModeState) -> Self {
        Self {
            state,
            lock_window_ms: MODE_LOCK_WINDOW.as_millis() as i64,
        }
    }

    pub fn with_lock_window(mut self, window: Duration) -> Self {
        self.lock_window_ms = window.as_millis() as i64;
        self
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn auto_switch_enabled(&self) -> bool {
        self.state.auto_switch.enabled
    }

    /// Explicit user selection. Always allowed, always clears the lock.
    pub fn select(&mut self, mode: Mode, now_ms: i64) -> Option<ModeTransition> {
        self.state.lock = None;
        self.commit(mode, SwitchReason::Manual, now_ms)
    }

    /// Returns `true` if the policy actually changed.
    pub fn set_auto_switch(&mut self, enabled: bool) -> bool {
        let changed = self.state.auto_switch.enabled != enabled;
        self.state.auto_switch.enabled = enabled;
        if changed {
            tracing::info!(enabled, "auto mode switching toggled");
        }
        changed
    }

    /// Apply a classified foreground change.
    pub fn apply_foreground(
        &mut self,
        hint: AppHint,
        aspect: AspectBucket,
        now_ms: i64,
    ) -> Option<ModeTransition> {
        match hint {
            AppHint::Ignored => None,
            AppHint::Mode(mode) => self.apply_app_hint(mode, now_ms),
            AppHint::NoHint => self.apply_aspect_hint(aspect, now_ms),
        }
    }

    /// A foreground app mapped to `mode`.
    pub fn apply_app_hint(&mut self, mode: Mode, now_ms: i64) -> Option<ModeTransition> {
        if !self.state.auto_switch.enabled {
            tracing::debug!(%mode, "auto switching disabled, ignoring app hint");
            return None;
        }

        // Re-entrant hints still refresh the lock.
        self.state.lock = Some(ModeLock::new(mode, now_ms));
        self.commit(mode, SwitchReason::AppHint, now_ms)
    }

    /// Fallback hint derived from the display's aspect bucket.
    pub fn apply_aspect_hint(
        &mut self,
        aspect: AspectBucket,
        now_ms: i64,
    ) -> Option<ModeTransition> {
        if !self.state.auto_switch.enabled {
            return None;
        }

        if let Some(lock) = self.state.lock {
            if lock.is_fresh(now_ms, self.lock_window_ms) {
                if lock.locked_mode == self.state.mode {
                    tracing::debug!(
                        locked = %lock.locked_mode,
                        age_ms = now_ms - lock.locked_at_ms,
                        "mode lock holds, skipping aspect fallback"
                    );
                    return None;
                }
            } else {
                tracing::debug!(locked = %lock.locked_mode, "mode lock expired");
                self.state.lock = None;
            }
        }

        let target = aspect.fallback_mode()?;

        if self.state.mode.is_profile() && self.state.origin.is_user_choice() {
            tracing::debug!(
                current = %self.state.mode,
                %target,
                "keeping user-chosen mode over aspect fallback"
            );
            return None;
        }

        self.commit(target, SwitchReason::AspectFallback, now_ms)
    }

    fn commit(&mut self, to: Mode, reason: SwitchReason, now_ms: i64) -> Option<ModeTransition> {
        let from = self.state.mode;
        if from == to {
            if reason == SwitchReason::Manual {
                self.state.origin = reason.origin();
            }
            return None;
        }

        let transition = ModeTransition {
            from,
            to,
            reason,
            timestamp_ms: now_ms,
        };
        self.state.mode = to;
        self.state.origin = reason.origin();

        tracing::info!(%from, %to, ?reason, "mode switched");
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ModeOrigin;

    const T0: i64 = 1_700_000_000_000;

    fn resolver() -> ModeResolver {
        ModeResolver::new(ModeState::default())
    }

    #[test]
    fn test_manual_select_clears_lock() {
        let mut r = resolver();
        r.apply_app_hint(Mode::TikTok, T0);
        assert!(r.state().lock.is_some());

        let t = r.select(Mode::Baidu, T0 + 1_000).unwrap();
        assert_eq!(t.from, Mode::TikTok);
        assert_eq!(t.to, Mode::Baidu);
        assert_eq!(t.reason, SwitchReason::Manual);
        assert!(r.state().lock.is_none());
    }

    #[test]
    fn test_manual_select_allowed_with_auto_switch_off() {
        let mut r = resolver();
        r.set_auto_switch(false);
        assert!(r.select(Mode::Bilibili, T0).is_some());
        assert_eq!(r.mode(), Mode::Bilibili);
    }

    #[test]
    fn test_app_hint_sets_lock() {
        let mut r = resolver();
        let t = r.apply_app_hint(Mode::YouTube, T0).unwrap();
        assert_eq!(t.reason, SwitchReason::AppHint);
        assert_eq!(r.state().lock, Some(ModeLock::new(Mode::YouTube, T0)));
        assert_eq!(r.state().origin, ModeOrigin::App);
    }

    #[test]
    fn test_reentrant_app_hint_refreshes_lock() {
        let mut r = resolver();
        r.apply_app_hint(Mode::YouTube, T0);
        assert!(r.apply_app_hint(Mode::YouTube, T0 + 20_000).is_none());
        assert_eq!(r.state().lock.unwrap().locked_at_ms, T0 + 20_000);
    }

    #[test]
    fn test_hints_ignored_when_auto_switch_disabled() {
        let mut r = resolver();
        r.set_auto_switch(false);
        assert!(r.apply_app_hint(Mode::TikTok, T0).is_none());
        assert!(r.apply_aspect_hint(AspectBucket::Bucket16x9, T0).is_none());
        assert_eq!(r.mode(), Mode::Default);
        assert!(r.state().lock.is_none());
    }

    #[test]
    fn test_hysteresis_holds_inside_window() {
        let mut r = resolver();
        r.apply_app_hint(Mode::TikTok, T0);

        assert!(r.apply_aspect_hint(AspectBucket::Bucket16x9, T0 + 10_000).is_none());
        assert_eq!(r.mode(), Mode::TikTok);
    }

    #[test]
    fn test_hysteresis_releases_after_window() {
        let mut r = resolver();
        r.apply_app_hint(Mode::TikTok, T0);

        let t = r
            .apply_aspect_hint(AspectBucket::Bucket16x9, T0 + 31_000)
            .unwrap();
        assert_eq!(t.to, Mode::Tv);
        assert_eq!(t.reason, SwitchReason::AspectFallback);
        assert!(r.state().lock.is_none(), "fallback never sets a lock");
    }

    #[test]
    fn test_expired_lock_cleared_even_without_switch() {
        let mut r = resolver();
        r.apply_app_hint(Mode::YouTube, T0);
        assert!(r.apply_aspect_hint(AspectBucket::Unclassified, T0 + 40_000).is_none());
        assert!(r.state().lock.is_none());
    }

    #[test]
    fn test_fallback_from_default_mode() {
        let mut r = resolver();
        let t = r.apply_aspect_hint(AspectBucket::Bucket20x9, T0).unwrap();
        assert_eq!(t.to, Mode::YouTube);
        assert_eq!(r.state().origin, ModeOrigin::Aspect);
    }

    #[test]
    fn test_unclassified_fallback_keeps_mode() {
        let mut r = resolver();
        assert!(r.apply_aspect_hint(AspectBucket::Unclassified, T0).is_none());
        assert_eq!(r.mode(), Mode::Default);
    }

    #[test]
    fn test_fallback_does_not_override_user_choice() {
        let mut r = ModeResolver::new(ModeState::restored(Mode::Baidu, true));
        assert!(r.apply_aspect_hint(AspectBucket::Bucket20x9, T0).is_none());
        assert_eq!(r.mode(), Mode::Baidu);

        r.select(Mode::Bilibili, T0);
        assert!(r.apply_aspect_hint(AspectBucket::Bucket16x9, T0 + 60_000).is_none());
        assert_eq!(r.mode(), Mode::Bilibili);
    }

    #[test]
    fn test_app_hint_overrides_user_choice() {
        let mut r = ModeResolver::new(ModeState::restored(Mode::Baidu, true));
        assert!(r.apply_app_hint(Mode::TikTok, T0).is_some());
        assert_eq!(r.mode(), Mode::TikTok);
    }

    #[test]
    fn test_broken_lock_allows_fallback() {
        // Lock is fresh but points at a mode that is no longer active.
        let mut state = ModeState::default();
        state.mode = Mode::YouTube;
        state.origin = ModeOrigin::Aspect;
        state.lock = Some(ModeLock::new(Mode::TikTok, T0));
        let mut r = ModeResolver::new(state);

        let t = r.apply_aspect_hint(AspectBucket::Bucket16x9, T0 + 5_000).unwrap();
        assert_eq!(t.to, Mode::Tv);
    }

    #[test]
    fn test_apply_foreground_routes_hints() {
        let mut r = resolver();
        assert!(r
            .apply_foreground(AppHint::Ignored, AspectBucket::Bucket20x9, T0)
            .is_none());

        let t = r
            .apply_foreground(AppHint::NoHint, AspectBucket::Bucket20x9, T0)
            .unwrap();
        assert_eq!(t.to, Mode::YouTube);

        let t = r
            .apply_foreground(AppHint::Mode(Mode::Bilibili), AspectBucket::Bucket20x9, T0)
            .unwrap();
        assert_eq!(t.to, Mode::Bilibili);
    }

    #[test]
    fn test_custom_lock_window() {
        let mut r = resolver().with_lock_window(Duration::from_secs(5));
        r.apply_app_hint(Mode::TikTok, T0);
        assert!(r.apply_aspect_hint(AspectBucket::Bucket20x9, T0 + 6_000).is_some());
    }

    #[test]
    fn test_exactly_one_mode_after_any_sequence() {
        let mut r = resolver();
        let steps: Vec<Box<dyn Fn(&mut ModeResolver, i64)>> = vec![
            Box::new(|r, t| {
                r.apply_app_hint(Mode::TikTok, t);
            }),
            Box::new(|r, t| {
                r.apply_aspect_hint(AspectBucket::Bucket16x9, t);
            }),
            Box::new(|r, t| {
                r.select(Mode::Default, t);
            }),
            Box::new(|r, _| {
                r.set_auto_switch(false);
            }),
            Box::new(|r, _| {
                r.set_auto_switch(true);
            }),
        ];

        let mut now = T0;
        for round in 0..25 {
            steps[round % steps.len()](&mut r, now);
            now += 7_000;
            assert!(Mode::ALL.contains(&r.mode()));
        }
    }
}
