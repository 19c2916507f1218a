//! Remote buttons and key events.

use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raw codes that all act as the centre/OK button.
///
/// Remotes disagree on what the confirm button sends, so every common
/// variant (DPAD_CENTER, SPACE, ENTER, BUTTON_A, gamepad start/select,
/// NUMPAD_ENTER, media play/pause, ...) is folded in.
pub const OK_CODES: &[i32] = &[23, 62, 66, 96, 108, 109, 160, 85, 126, 60, 13, 28, 158, 352];

/// Logical remote button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Ok,
    Left,
    Right,
    Up,
    Down,
    Back,
    Home,
    Menu,
    Voice,
}

impl KeyCode {
    pub const ALL: [KeyCode; 9] = [
        KeyCode::Ok,
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Back,
        KeyCode::Home,
        KeyCode::Menu,
        KeyCode::Voice,
    ];

    /// Decode a raw host key code.
    pub fn from_raw(code: i32) -> Option<Self> {
        match code {
            21 => Some(KeyCode::Left),
            22 => Some(KeyCode::Right),
            19 => Some(KeyCode::Up),
            20 => Some(KeyCode::Down),
            4 => Some(KeyCode::Back),
            122 => Some(KeyCode::Home),
            82 => Some(KeyCode::Menu),
            135 => Some(KeyCode::Voice),
            c if OK_CODES.contains(&c) => Some(KeyCode::Ok),
            _ => None,
        }
    }

    /// Whether this key distinguishes short from long presses.
    ///
    /// All other keys classify as Short on Down.
    pub fn needs_long_press(&self) -> bool {
        matches!(self, KeyCode::Left | KeyCode::Right | KeyCode::Voice)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCode::Ok => "ok",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Back => "back",
            KeyCode::Home => "home",
            KeyCode::Menu => "menu",
            KeyCode::Voice => "voice",
        }
    }
}

impl TryFrom<i32> for KeyCode {
    type Error = InputError;

    fn try_from(code: i32) -> Result<Self> {
        KeyCode::from_raw(code).ok_or(InputError::UnmappedKey(code))
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    Down,
    Up,
}

impl FromStr for KeyPhase {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "down" => Ok(KeyPhase::Down),
            "up" => Ok(KeyPhase::Up),
            _ => Err(InputError::InvalidPhase(s.to_string())),
        }
    }
}

/// Key event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKeyEvent {
    pub code: i32,
    pub phase: KeyPhase,
    #[serde(default)]
    pub device_external: bool,
}

/// Decoded key event, stamped with the time it was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub phase: KeyPhase,
    pub timestamp_ms: i64,
}

impl KeyEvent {
    pub fn new(code: KeyCode, phase: KeyPhase, timestamp_ms: i64) -> Self {
        Self {
            code,
            phase,
            timestamp_ms,
        }
    }

    /// Decode a raw event. Unmapped codes are an error the caller usually
    /// answers by passing the key through.
    pub fn decode(raw: &RawKeyEvent, timestamp_ms: i64) -> Result<Self> {
        Ok(Self::new(KeyCode::try_from(raw.code)?, raw.phase, timestamp_ms))
    }
}
