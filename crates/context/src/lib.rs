//! Context awareness for keymapper.
//!
//! Decides which button profile ("mode") is active. It tracks:
//! - The foreground application (which app has focus)
//! - The display shape (orientation and coarse aspect ratio)
//! - Manual selections and the auto-switch toggle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  mode.rs       - Mode enum                                  │
//! │  shape.rs      - AspectBucket, DisplayMetrics               │
//! │  foreground.rs - App families, denylist, AppHint            │
//! │  state.rs      - ModeState, ModeLock, AutoSwitchPolicy      │
//! │  resolver.rs   - ModeResolver (hysteresis state machine)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  provider.rs - Traits for host context queries              │
//! │  poller.rs   - Background sampling for pull-only hosts      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use keymapper_context::{AspectBucket, ForegroundAppClassifier, Mode, ModeResolver};
//!
//! let mut classifier = ForegroundAppClassifier::new();
//! let mut resolver = ModeResolver::default();
//!
//! let hint = classifier.on_foreground_changed("com.zhiliaoapp.musically", AspectBucket::Bucket20x9);
//! resolver.apply_foreground(hint, AspectBucket::Bucket20x9, 0);
//! assert_eq!(resolver.mode(), Mode::TikTok);
//! ```

mod foreground;
mod mode;
mod poller;
mod provider;
mod resolver;
mod shape;
mod state;

pub use foreground::{
    AppFamily, AppHint, ForegroundAppClassifier, BAIDU_APPS, BILIBILI_APPS, DENYLISTED_APPS,
    TIKTOK_APPS, YOUTUBE_APPS,
};
pub use mode::{Mode, UnknownMode};
pub use poller::{ContextCallback, ContextChange, ContextPoller, DEFAULT_POLL_INTERVAL};
pub use provider::{DisplayProvider, ForegroundAppProvider, NullProvider, SystemStateProvider};
pub use resolver::{ModeResolver, MODE_LOCK_WINDOW};
pub use shape::{
    AspectBucket, DisplayMetrics, Orientation, ScreenShape, TALL_RATIO_MIN, WIDE_RATIO_MAX,
    WIDE_RATIO_MIN,
};
pub use state::{AutoSwitchPolicy, ModeLock, ModeOrigin, ModeState, ModeTransition, SwitchReason};
