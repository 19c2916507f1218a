//! JSON-lines request/reply protocol spoken on stdin/stdout.

use keymapper_application::{EngineHandle, EngineSnapshot, KeyDisposition, Result};
use keymapper_context::{DisplayMetrics, Mode};
use keymapper_input::RawKeyEvent;
use keymapper_storage::PersistedSettings;
use serde::{Deserialize, Serialize};

/// One line of input from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Key(RawKeyEvent),
    Foreground { app_id: String },
    Display(DisplayMetrics),
    SelectMode { mode: Mode },
    AutoSwitch { enabled: bool },
    Settings(PersistedSettings),
    Snapshot,
}

/// Answer to a request that produces one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Key { disposition: KeyDisposition },
    Snapshot { snapshot: EngineSnapshot },
    Error { message: String },
}

/// Forward a request to the engine.
pub async fn handle(engine: &EngineHandle, request: Request) -> Result<Option<Reply>> {
    match request {
        Request::Key(event) => {
            let disposition = engine.key_event(event).await?;
            Ok(Some(Reply::Key { disposition }))
        }
        Request::Foreground { app_id } => {
            engine.foreground_changed(app_id).await?;
            Ok(None)
        }
        Request::Display(metrics) => {
            engine.display_changed(metrics).await?;
            Ok(None)
        }
        Request::SelectMode { mode } => {
            engine.select_mode(mode).await?;
            Ok(None)
        }
        Request::AutoSwitch { enabled } => {
            engine.set_auto_switch(enabled).await?;
            Ok(None)
        }
        Request::Settings(settings) => {
            engine.settings_changed(settings).await?;
            Ok(None)
        }
        Request::Snapshot => {
            let snapshot = engine.snapshot().await?;
            Ok(Some(Reply::Snapshot { snapshot }))
        }
    }
}
