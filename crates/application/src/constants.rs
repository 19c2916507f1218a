/// Capacity of the engine command queue.
pub const COMMAND_CAPACITY: usize = 256;

/// Default double-tap spacing, in milliseconds.
pub const DOUBLE_TAP_INTERVAL_MS: u64 = 100;

/// Default swipe nudge distance, in pixels.
pub const SWIPE_NUDGE_PX: i32 = 100;

/// Long-press threshold, in milliseconds.
pub const LONG_PRESS_MS: u64 = 1000;

/// Play/pause debounce window, in milliseconds.
pub const PLAY_PAUSE_DEBOUNCE_MS: u64 = 500;

/// Mode lock window, in seconds.
pub const MODE_LOCK_SECS: u64 = 30;
