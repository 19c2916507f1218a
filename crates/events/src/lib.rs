//! Shared event contracts for keymapper observers.
//!
//! This crate defines the DTOs the engine publishes and the `EventBus`
//! trait it publishes them through. Using shared types prevents runtime
//! deserialization errors from mismatched field names.

mod bus;

pub use bus::{emit_event, EventBus, EventBusRef, InMemoryEventBus};

use keymapper_bindings::Action;
use keymapper_context::{AspectBucket, Mode, Orientation, SwitchReason};
use keymapper_input::{KeyCode, PressKind};
use serde::{Deserialize, Serialize};

/// Event emitted when the active mode changes.
///
/// Producers: engine
/// Consumers: UI, quick-settings tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeChangedEvent {
    pub from: Mode,
    pub to: Mode,
    pub reason: SwitchReason,
    /// Foreground app that triggered the change, if any.
    #[serde(default)]
    pub app_id: Option<String>,
    pub timestamp_ms: i64,
}

/// Event emitted when the auto-switch toggle changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSwitchChangedEvent {
    pub enabled: bool,
    pub timestamp_ms: i64,
}

/// Event emitted after an action was handed to the sink successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEmittedEvent {
    pub mode: Mode,
    pub key: KeyCode,
    pub kind: PressKind,
    pub action: Action,
    pub timestamp_ms: i64,
}

/// Event emitted when the sink rejected an action. Never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFailedEvent {
    pub mode: Mode,
    pub key: KeyCode,
    pub kind: PressKind,
    pub action: Action,
    pub error: String,
    pub timestamp_ms: i64,
}

/// Event emitted when a press had no binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingGapEvent {
    pub mode: Mode,
    pub key: KeyCode,
    pub kind: PressKind,
    pub orientation: Orientation,
    pub aspect: AspectBucket,
    pub timestamp_ms: i64,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const MODE_CHANGED: &str = "mode:changed";
    pub const AUTO_SWITCH_CHANGED: &str = "mode:auto_switch_changed";
    pub const ACTION_EMITTED: &str = "action:emitted";
    pub const ACTION_FAILED: &str = "action:failed";
    pub const BINDING_GAP: &str = "binding:gap";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_changed_deserialize_minimal() {
        let json = r#"{"from": "default", "to": "tiktok", "reason": "app_hint", "timestamp_ms": 5}"#;
        let event: ModeChangedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.to, Mode::TikTok);
        assert_eq!(event.reason, SwitchReason::AppHint);
        assert_eq!(event.app_id, None);
    }

    #[test]
    fn test_action_emitted_payload() {
        let event = ActionEmittedEvent {
            mode: Mode::YouTube,
            key: KeyCode::Left,
            kind: PressKind::Short,
            action: Action::DoubleTap { x: 133, y: 439 },
            timestamp_ms: 1,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["key"], "left");
        assert_eq!(value["kind"], "short");
        assert_eq!(value["action"]["type"], "double_tap");
    }
}
