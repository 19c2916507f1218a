//! Provider traits for host context detection.
//!
//! Hosts that push notifications call the engine directly. Hosts that can
//! only be queried implement these traits and drive a [`crate::ContextPoller`].

use crate::shape::DisplayMetrics;

/// Provider for the package/window identifier of the foreground app.
pub trait ForegroundAppProvider: Send + Sync {
    fn foreground_app(&self) -> Option<String>;
}

/// Provider for the current display dimensions and orientation.
pub trait DisplayProvider: Send + Sync {
    fn display_metrics(&self) -> Option<DisplayMetrics>;
}

/// Combined provider for all host context.
pub trait SystemStateProvider: Send + Sync {
    fn foreground_app(&self) -> Option<String>;

    fn display_metrics(&self) -> Option<DisplayMetrics>;
}

impl<T> SystemStateProvider for T
where
    T: ForegroundAppProvider + DisplayProvider,
{
    fn foreground_app(&self) -> Option<String> {
        ForegroundAppProvider::foreground_app(self)
    }

    fn display_metrics(&self) -> Option<DisplayMetrics> {
        DisplayProvider::display_metrics(self)
    }
}

/// Null implementation for testing or unsupported platforms.
pub struct NullProvider;

impl ForegroundAppProvider for NullProvider {
    fn foreground_app(&self) -> Option<String> {
        None
    }
}

impl DisplayProvider for NullProvider {
    fn display_metrics(&self) -> Option<DisplayMetrics> {
        None
    }
}
