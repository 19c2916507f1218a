//! Turns a classified press into exactly one action.

use crate::action::Action;
use crate::table::BindingTable;
use keymapper_context::{DisplayMetrics, Mode};
use keymapper_input::{PlayPauseDebouncer, PressOutcome};
use std::sync::Arc;

/// Default horizontal distance of a swipe "nudge", in pixels.
pub const DEFAULT_SWIPE_PX: i32 = 100;

/// Result of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Send this action to the sink. May be an explicit `NoOp` binding.
    Action(Action),
    /// No binding exists for the press. Already logged.
    Unbound,
    /// A play/pause was dropped by the debouncer.
    Debounced,
}

impl Dispatch {
    /// The action to emit, `NoOp` when nothing should happen.
    pub fn action(&self) -> Action {
        match self {
            Dispatch::Action(action) => *action,
            Dispatch::Unbound | Dispatch::Debounced => Action::NoOp,
        }
    }
}

pub struct ActionDispatcher {
    table: Arc<BindingTable>,
    debouncer: PlayPauseDebouncer,
    swipe_px: i32,
}

impl ActionDispatcher {
    pub fn new(table: Arc<BindingTable>, debouncer: PlayPauseDebouncer) -> Self {
        Self {
            table,
            debouncer,
            swipe_px: DEFAULT_SWIPE_PX,
        }
    }

    pub fn with_swipe_px(mut self, swipe_px: i32) -> Self {
        self.swipe_px = swipe_px;
        self
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    /// Look up and resolve the action for `outcome`.
    ///
    /// `display` must be the display at fire/release time; coordinates are
    /// resolved against it, not against the display at press time.
    pub fn dispatch(
        &mut self,
        mode: Mode,
        outcome: PressOutcome,
        display: &DisplayMetrics,
        now_ms: i64,
    ) -> Dispatch {
        let shape = display.shape();
        let Some(template) = self.table.lookup(mode, outcome.key, outcome.kind, shape) else {
            tracing::warn!(
                %mode,
                key = %outcome.key,
                kind = %outcome.kind,
                orientation = ?shape.orientation,
                aspect = %shape.aspect,
                "binding table gap, treating as no-op"
            );
            return Dispatch::Unbound;
        };

        let action = template.resolve(display, self.swipe_px);
        if action.is_play_pause() && !self.debouncer.should_emit(now_ms) {
            return Dispatch::Debounced;
        }

        tracing::debug!(%mode, key = %outcome.key, kind = %outcome.kind, ?action, "dispatching");
        Dispatch::Action(action)
    }
}
