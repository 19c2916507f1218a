//! The keymapper engine.
//!
//! Wires the context, input and bindings crates into one actor that owns
//! all mutable state. Hosts talk to it only through [`EngineHandle`]; there
//! is no global instance.
//!
//! # Example
//!
//! ```ignore
//! use keymapper_application::{Engine, EngineConfig, EngineDeps, SystemClock, RecordingSink};
//!
//! let (handle, task) = Engine::spawn(EngineConfig::default(), deps);
//! handle.select_mode(Mode::Tv).await?;
//! handle.shutdown();
//! task.await?;
//! ```

mod clock;
mod config;
mod constants;
mod engine;
mod error;
mod handle;
mod sink;

pub use clock::{Clock, ClockRef, SystemClock, TokioClock};
pub use config::EngineConfig;
pub use constants::*;
pub use engine::{Engine, EngineDeps, SettingsRef};
pub use error::{EngineError, Result};
pub use handle::{EngineHandle, EngineSnapshot, KeyDisposition};
pub use sink::{ActionSink, ActionSinkRef, RecordingSink, SinkError};
