//! Binding table and action dispatch for keymapper.
//!
//! The table is data, not code: a versioned JSON document mapping
//! `(mode, key, press kind, screen shape)` to an action template. The
//! dispatcher resolves templates against the current display and routes
//! play/pause through the debouncer.

mod action;
mod dispatcher;
mod error;
mod table;

pub use action::{
    Action, ActionTemplate, Coord, MediaCommand, NudgeDirection, PointSpec, SwipeEnd,
    SystemCommand,
};
pub use dispatcher::{ActionDispatcher, Dispatch, DEFAULT_SWIPE_PX};
pub use error::{BindingError, BindingResult};
pub use table::{BindingEntry, BindingTable, BINDINGS_VERSION, DEFAULT_BINDINGS_JSON};
