//! Polling source of foreground-app and display changes.

use crate::provider::SystemStateProvider;
use crate::shape::DisplayMetrics;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// Default polling interval for context changes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// What changed between two samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextChange {
    ForegroundApp { app_id: String },
    Display { metrics: DisplayMetrics },
}

/// Callback type for context change notifications.
pub type ContextCallback = Arc<dyn Fn(ContextChange) + Send + Sync + 'static>;

#[derive(Debug, Default)]
struct LastSample {
    app_id: Option<String>,
    display: Option<DisplayMetrics>,
}

impl LastSample {
    /// Record a fresh sample and return the changes it carries.
    ///
    /// Display changes come first so the foreground hint is classified
    /// against the new shape.
    fn diff(&mut self, app_id: Option<String>, display: Option<DisplayMetrics>) -> Vec<ContextChange> {
        let mut changes = Vec::new();

        if let Some(metrics) = display {
            if self.display != Some(metrics) {
                self.display = Some(metrics);
                changes.push(ContextChange::Display { metrics });
            }
        }

        if let Some(app_id) = app_id {
            if self.app_id.as_deref() != Some(app_id.as_str()) {
                self.app_id = Some(app_id.clone());
                changes.push(ContextChange::ForegroundApp { app_id });
            }
        }

        changes
    }
}

/// Background poller for hosts without push notifications.
///
/// Samples the provider on a dedicated thread and reports only what changed.
/// Stopping wakes the thread immediately instead of waiting out the interval.
#[derive(Default)]
pub struct ContextPoller {
    worker: Option<Worker>,
}

struct Worker {
    stop: mpsc::Sender<()>,
    thread: std::thread::JoinHandle<()>,
}

impl ContextPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<P>(&mut self, provider: Arc<P>, callback: ContextCallback)
    where
        P: SystemStateProvider + 'static,
    {
        self.start_with_interval(provider, callback, DEFAULT_POLL_INTERVAL);
    }

    /// Start sampling every `interval`. A second start while running is ignored.
    pub fn start_with_interval<P>(
        &mut self,
        provider: Arc<P>,
        callback: ContextCallback,
        interval: Duration,
    ) where
        P: SystemStateProvider + 'static,
    {
        if self.worker.is_some() {
            tracing::warn!("context poller already running");
            return;
        }

        let (stop, stopped) = mpsc::channel::<()>();
        let thread = std::thread::spawn(move || {
            tracing::debug!(?interval, "context poller started");
            let mut last = LastSample::default();

            loop {
                for change in last.diff(provider.foreground_app(), provider.display_metrics()) {
                    tracing::debug!(?change, "host context changed");
                    callback(change);
                }

                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Explicit stop or the poller was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            tracing::debug!("context poller stopped");
        });

        self.worker = Some(Worker { stop, thread });
    }

    /// Stop sampling and wait for the thread to exit.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
            if worker.thread.join().is_err() {
                tracing::warn!("context poller thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for ContextPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
