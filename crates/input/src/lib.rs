//! Remote key input for keymapper.
//!
//! Decodes raw host key codes into logical remote buttons and turns
//! Down/Up pairs into exactly one short or long [`PressOutcome`] per press.
//!
//! # Example
//!
//! ```
//! use keymapper_input::{KeyCode, PressKind, PressTimer, LONG_PRESS_THRESHOLD};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (mut timer, _fired) = PressTimer::channel(LONG_PRESS_THRESHOLD);
//! assert_eq!(timer.on_down(KeyCode::Left, 0), None);
//! let outcome = timer.on_up(KeyCode::Left, 150).unwrap();
//! assert_eq!(outcome.kind, PressKind::Short);
//! # }
//! ```

mod debounce;
mod error;
mod key;
mod press_timer;

pub use debounce::{PlayPauseDebouncer, PLAY_PAUSE_DEBOUNCE};
pub use error::{InputError, Result};
pub use key::{KeyCode, KeyEvent, KeyPhase, RawKeyEvent, OK_CODES};
pub use press_timer::{
    PressKind, PressOutcome, PressTimer, TimerFired, LONG_PRESS_THRESHOLD,
};
