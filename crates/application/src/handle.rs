//! Handle through which hosts drive and observe the engine.

use crate::engine::Command;
use crate::error::{EngineError, Result};
use keymapper_context::{DisplayMetrics, Mode, ModeLock, ModeOrigin, ScreenShape};
use keymapper_input::RawKeyEvent;
use keymapper_storage::PersistedSettings;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// What the host should do with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDisposition {
    /// The engine handled the key; swallow it.
    Consumed,
    /// Deliver the key to the foreground app as usual.
    PassThrough,
}

/// Point-in-time view of engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub origin: ModeOrigin,
    pub auto_switch_enabled: bool,
    pub lock: Option<ModeLock>,
    pub foreground_app: Option<String>,
    pub display: DisplayMetrics,
    pub shape: ScreenShape,
    pub pending_presses: usize,
}

/// Cloneable handle to a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub(crate) fn new(tx: mpsc::Sender<Command>, cancel: CancellationToken) -> Self {
        Self { tx, cancel }
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Closed);
        }
        self.tx.send(cmd).await.map_err(|_| EngineError::Closed)
    }

    /// Feed a raw key event and learn whether it was consumed.
    pub async fn key_event(&self, event: RawKeyEvent) -> Result<KeyDisposition> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Key { event, reply }).await?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    pub async fn foreground_changed(&self, app_id: impl Into<String>) -> Result<()> {
        self.send(Command::ForegroundChanged {
            app_id: app_id.into(),
        })
        .await
    }

    pub async fn display_changed(&self, metrics: DisplayMetrics) -> Result<()> {
        self.send(Command::DisplayChanged { metrics }).await
    }

    /// Manually select a mode. Always honoured, clears the mode lock.
    pub async fn select_mode(&self, mode: Mode) -> Result<()> {
        self.send(Command::SelectMode { mode }).await
    }

    pub async fn set_auto_switch(&self, enabled: bool) -> Result<()> {
        self.send(Command::SetAutoSwitch { enabled }).await
    }

    /// Settings were changed outside the engine (another process, a tile).
    pub async fn settings_changed(&self, settings: PersistedSettings) -> Result<()> {
        self.send(Command::SettingsChanged { settings }).await
    }

    pub async fn snapshot(&self) -> Result<EngineSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// Stop the engine. Pending press timers are cancelled and nothing is
    /// dispatched afterwards.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.tx.is_closed()
    }
}
