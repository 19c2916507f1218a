//! Engine configuration.

use crate::constants::{
    DOUBLE_TAP_INTERVAL_MS, LONG_PRESS_MS, MODE_LOCK_SECS, PLAY_PAUSE_DEBOUNCE_MS, SWIPE_NUDGE_PX,
};
use crate::error::{EngineError, Result};
use keymapper_context::DisplayMetrics;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for the engine. Every field has a default, so a partial JSON
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub long_press_ms: u64,
    pub play_pause_debounce_ms: u64,
    pub mode_lock_secs: u64,
    pub swipe_nudge_px: i32,
    /// Spacing between the two taps of a double tap. Used by sinks.
    pub double_tap_interval_ms: u64,
    /// Only consume keys while a mapped app (or an unknown app) is in front.
    pub intercept_only_target_apps: bool,
    /// Ignore keys from built-in devices.
    pub external_devices_only: bool,
    /// Packages ignored on top of the built-in denylist.
    pub extra_denylist: Vec<String>,
    /// Display assumed until the host reports one.
    pub initial_display: DisplayMetrics,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            play_pause_debounce_ms: PLAY_PAUSE_DEBOUNCE_MS,
            mode_lock_secs: MODE_LOCK_SECS,
            swipe_nudge_px: SWIPE_NUDGE_PX,
            double_tap_interval_ms: DOUBLE_TAP_INTERVAL_MS,
            intercept_only_target_apps: true,
            external_devices_only: false,
            extra_denylist: Vec::new(),
            initial_display: DisplayMetrics::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::ReadConfig {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn play_pause_debounce(&self) -> Duration {
        Duration::from_millis(self.play_pause_debounce_ms)
    }

    pub fn mode_lock(&self) -> Duration {
        Duration::from_secs(self.mode_lock_secs)
    }
}
