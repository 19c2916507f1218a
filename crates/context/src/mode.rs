//! Mode definitions.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Exclusive remapping profile. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Baseline profile: no app profile is active.
    #[default]
    Default,

    /// YouTube on a tall (~20:9) phone display.
    #[serde(rename = "youtube")]
    YouTube,

    /// YouTube on a ~16:9 display (TV-style layout).
    Tv,

    /// Baidu Netdisk video player.
    Baidu,

    /// TikTok / Douyin / Toutiao short-video feed.
    #[serde(rename = "tiktok")]
    TikTok,

    /// Bilibili video player.
    Bilibili,
}

impl Mode {
    /// Every mode, in a stable order.
    pub const ALL: [Mode; 6] = [
        Mode::Default,
        Mode::YouTube,
        Mode::Tv,
        Mode::Baidu,
        Mode::TikTok,
        Mode::Bilibili,
    ];

    /// Returns a human-readable label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Default => "Default",
            Mode::YouTube => "YouTube",
            Mode::Tv => "TV",
            Mode::Baidu => "Baidu",
            Mode::TikTok => "TikTok",
            Mode::Bilibili => "Bilibili",
        }
    }

    /// Stable identifier used in settings and binding files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::YouTube => "youtube",
            Mode::Tv => "tv",
            Mode::Baidu => "baidu",
            Mode::TikTok => "tiktok",
            Mode::Bilibili => "bilibili",
        }
    }

    /// Whether this is an app profile rather than the baseline.
    pub fn is_profile(&self) -> bool {
        !matches!(self, Mode::Default)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned when parsing an unknown mode identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}
