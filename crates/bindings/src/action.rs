//! Output actions and the templates they are resolved from.
//!
//! Templates live in the binding table and may refer to the display size
//! (fractions, swipe nudges). They become concrete [`Action`]s only at
//! dispatch time, against the display that is current at that moment.

use keymapper_context::DisplayMetrics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCommand {
    PlayPause,
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemCommand {
    /// Global "back" navigation.
    Back,
    /// Toggle the media stream mute state.
    ToggleMute,
}

/// A concrete action for the sink, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Media {
        command: MediaCommand,
    },
    System {
        command: SystemCommand,
    },
    Tap {
        x: i32,
        y: i32,
    },
    /// Two taps at the same point, a short interval apart.
    DoubleTap {
        x: i32,
        y: i32,
    },
    Swipe {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        duration_ms: u32,
    },
    NoOp,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }

    pub fn is_play_pause(&self) -> bool {
        matches!(
            self,
            Action::Media {
                command: MediaCommand::PlayPause
            }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Media { .. } => "media",
            Action::System { .. } => "system",
            Action::Tap { .. } => "tap",
            Action::DoubleTap { .. } => "double_tap",
            Action::Swipe { .. } => "swipe",
            Action::NoOp => "no_op",
        }
    }
}

/// One axis of a point: absolute pixels or a fraction of the display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Px(i32),
    Frac { frac: f32 },
}

impl Coord {
    fn resolve(&self, extent: u32) -> i32 {
        match self {
            Coord::Px(px) => *px,
            Coord::Frac { frac } => (extent as f32 * frac).round() as i32,
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Coord::Px(_) => true,
            Coord::Frac { frac } => (0.0..=1.0).contains(frac),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSpec {
    pub x: Coord,
    pub y: Coord,
}

impl PointSpec {
    pub fn px(x: i32, y: i32) -> Self {
        Self {
            x: Coord::Px(x),
            y: Coord::Px(y),
        }
    }

    pub fn resolve(&self, display: &DisplayMetrics) -> (i32, i32) {
        (
            self.x.resolve(display.width_px),
            self.y.resolve(display.height_px),
        )
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    Left,
    Right,
}

/// End of a swipe: a fixed point or a horizontal nudge from the start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SwipeEnd {
    Point(PointSpec),
    Nudge { nudge: NudgeDirection },
}

/// Table-side description of an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionTemplate {
    Media {
        command: MediaCommand,
    },
    System {
        command: SystemCommand,
    },
    Tap {
        at: PointSpec,
    },
    DoubleTap {
        at: PointSpec,
    },
    Swipe {
        from: PointSpec,
        to: SwipeEnd,
        duration_ms: u32,
    },
    NoOp,
}

impl ActionTemplate {
    /// Resolve against the current display. `swipe_px` is the nudge length.
    pub fn resolve(&self, display: &DisplayMetrics, swipe_px: i32) -> Action {
        match self {
            ActionTemplate::Media { command } => Action::Media { command: *command },
            ActionTemplate::System { command } => Action::System { command: *command },
            ActionTemplate::Tap { at } => {
                let (x, y) = at.resolve(display);
                Action::Tap { x, y }
            }
            ActionTemplate::DoubleTap { at } => {
                let (x, y) = at.resolve(display);
                Action::DoubleTap { x, y }
            }
            ActionTemplate::Swipe {
                from,
                to,
                duration_ms,
            } => {
                let (x0, y0) = from.resolve(display);
                let (x1, y1) = match to {
                    SwipeEnd::Point(p) => p.resolve(display),
                    SwipeEnd::Nudge {
                        nudge: NudgeDirection::Left,
                    } => (x0 - swipe_px, y0),
                    SwipeEnd::Nudge {
                        nudge: NudgeDirection::Right,
                    } => (x0 + swipe_px, y0),
                };
                Action::Swipe {
                    x0,
                    y0,
                    x1,
                    y1,
                    duration_ms: *duration_ms,
                }
            }
            ActionTemplate::NoOp => Action::NoOp,
        }
    }

    /// Describe what is wrong with this template, if anything.
    pub(crate) fn problem(&self) -> Option<&'static str> {
        match self {
            ActionTemplate::Tap { at } | ActionTemplate::DoubleTap { at } if !at.is_valid() => {
                Some("fractional coordinate outside 0..=1")
            }
            ActionTemplate::Swipe { duration_ms: 0, .. } => Some("swipe duration must be positive"),
            ActionTemplate::Swipe { from, to, .. } => {
                let to_valid = match to {
                    SwipeEnd::Point(p) => p.is_valid(),
                    SwipeEnd::Nudge { .. } => true,
                };
                if from.is_valid() && to_valid {
                    None
                } else {
                    Some("fractional coordinate outside 0..=1")
                }
            }
            _ => None,
        }
    }
}
