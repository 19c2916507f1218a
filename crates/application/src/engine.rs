//! The single-owner engine actor.
//!
//! All state (mode, lock, display, press timers) lives on one task. Host
//! notifications arrive as [`Command`]s on one queue, in arrival order. Press
//! timers report back on a second queue; they never touch engine state.
//!
//! ```text
//!   EngineHandle ──► commands ──┐
//!                               ├──► Engine::run ──► ActionSink
//!   PressTimer tasks ─► fired ──┘         │
//!                                         └──► EventBus, SettingsRepository
//! ```

use crate::clock::ClockRef;
use crate::config::EngineConfig;
use crate::constants::COMMAND_CAPACITY;
use crate::handle::{EngineHandle, EngineSnapshot, KeyDisposition};
use crate::sink::ActionSinkRef;
use keymapper_bindings::{Action, ActionDispatcher, BindingTable, Dispatch};
use keymapper_context::{
    AppFamily, AppHint, DisplayMetrics, ForegroundAppClassifier, Mode, ModeResolver, ModeState,
    ModeTransition,
};
use keymapper_events::{
    emit_event, event_names, ActionEmittedEvent, ActionFailedEvent, AutoSwitchChangedEvent,
    BindingGapEvent, EventBusRef, ModeChangedEvent,
};
use keymapper_input::{
    KeyCode, KeyEvent, KeyPhase, PlayPauseDebouncer, PressOutcome, PressTimer, RawKeyEvent,
    TimerFired,
};
use keymapper_storage::{PersistedSettings, SettingsRepository};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub type SettingsRef = Arc<dyn SettingsRepository>;

/// Collaborators handed to the engine at startup.
pub struct EngineDeps {
    pub table: Arc<BindingTable>,
    pub sink: ActionSinkRef,
    pub bus: EventBusRef,
    pub settings: SettingsRef,
    pub clock: ClockRef,
}

pub(crate) enum Command {
    Key {
        event: RawKeyEvent,
        reply: oneshot::Sender<KeyDisposition>,
    },
    ForegroundChanged {
        app_id: String,
    },
    DisplayChanged {
        metrics: DisplayMetrics,
    },
    SelectMode {
        mode: Mode,
    },
    SetAutoSwitch {
        enabled: bool,
    },
    SettingsChanged {
        settings: PersistedSettings,
    },
    Snapshot {
        reply: oneshot::Sender<EngineSnapshot>,
    },
}

pub struct Engine {
    config: EngineConfig,
    classifier: ForegroundAppClassifier,
    resolver: ModeResolver,
    display: DisplayMetrics,
    /// Whether the host has reported a display yet; until then `display` is assumed.
    display_reported: bool,
    press_timer: PressTimer,
    dispatcher: ActionDispatcher,
    /// Keys whose Down was consumed; their Up is consumed as well.
    consumed: HashSet<KeyCode>,
    sink: ActionSinkRef,
    bus: EventBusRef,
    settings: SettingsRef,
    clock: ClockRef,
    stopped: bool,
}

impl Engine {
    /// Build the engine, restore persisted settings and start its task.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn spawn(config: EngineConfig, deps: EngineDeps) -> (EngineHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (press_timer, fired_rx) = PressTimer::channel(config.long_press());
        let cancel = CancellationToken::new();

        let restored = match deps.settings.load_settings() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings, using defaults");
                PersistedSettings::default()
            }
        };
        tracing::info!(
            mode = %restored.active_mode,
            auto_switch = restored.auto_switch_enabled,
            "restored settings"
        );

        let resolver = ModeResolver::new(ModeState::restored(
            restored.active_mode,
            restored.auto_switch_enabled,
        ))
        .with_lock_window(config.mode_lock());

        let dispatcher = ActionDispatcher::new(
            deps.table,
            PlayPauseDebouncer::new(config.play_pause_debounce()),
        )
        .with_swipe_px(config.swipe_nudge_px);

        let engine = Engine {
            classifier: ForegroundAppClassifier::with_extra_denylist(config.extra_denylist.clone()),
            resolver,
            display: config.initial_display,
            display_reported: false,
            press_timer,
            dispatcher,
            consumed: HashSet::new(),
            sink: deps.sink,
            bus: deps.bus,
            settings: deps.settings,
            clock: deps.clock,
            stopped: false,
            config,
        };

        let task = tokio::spawn(engine.run(command_rx, fired_rx, cancel.clone()));
        (EngineHandle::new(command_tx, cancel), task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut fired: mpsc::UnboundedReceiver<TimerFired>,
        cancel: CancellationToken,
    ) {
        tracing::info!(mode = %self.resolver.mode(), "engine started");

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                Some(msg) = fired.recv() => self.on_timer_fired(msg),

                cmd = commands.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
            }
        }

        self.stop();
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.press_timer.cancel_all();
        self.consumed.clear();
        tracing::info!("engine stopped");
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Key { event, reply } => {
                let disposition = self.on_key(event);
                let _ = reply.send(disposition);
            }
            Command::ForegroundChanged { app_id } => self.on_foreground_changed(app_id),
            Command::DisplayChanged { metrics } => self.on_display_changed(metrics),
            Command::SelectMode { mode } => self.select_mode(mode, true),
            Command::SetAutoSwitch { enabled } => self.set_auto_switch(enabled, true),
            Command::SettingsChanged { settings } => self.on_settings_changed(settings),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    // --- Keys ---

    fn on_key(&mut self, raw: RawKeyEvent) -> KeyDisposition {
        let now = self.clock.now_ms();

        let event = match KeyEvent::decode(&raw, now) {
            Ok(event) => event,
            Err(e) => {
                tracing::trace!(error = %e, "passing through unmapped key");
                return KeyDisposition::PassThrough;
            }
        };

        if self.config.external_devices_only && !raw.device_external {
            return KeyDisposition::PassThrough;
        }

        match event.phase {
            KeyPhase::Down => {
                if self.config.intercept_only_target_apps && !self.classifier.is_target_app() {
                    tracing::trace!(key = %event.code, app = ?self.classifier.current_app(), "not a target app");
                    // An earlier press whose release was dropped must not claim this one's Up.
                    self.consumed.remove(&event.code);
                    self.press_timer.cancel(event.code);
                    return KeyDisposition::PassThrough;
                }
                self.consumed.insert(event.code);
                if let Some(outcome) = self.press_timer.on_down(event.code, now) {
                    self.dispatch(outcome, now);
                }
                KeyDisposition::Consumed
            }
            KeyPhase::Up => {
                if !self.consumed.remove(&event.code) {
                    return KeyDisposition::PassThrough;
                }
                if let Some(outcome) = self.press_timer.on_up(event.code, now) {
                    self.dispatch(outcome, now);
                }
                KeyDisposition::Consumed
            }
        }
    }

    fn on_timer_fired(&mut self, msg: TimerFired) {
        if let Some(outcome) = self.press_timer.on_timer_fired(msg) {
            let now = self.clock.now_ms();
            self.dispatch(outcome, now);
        }
    }

    fn dispatch(&mut self, outcome: PressOutcome, now: i64) {
        if self.stopped {
            return;
        }

        let mode = self.resolver.mode();
        match self.dispatcher.dispatch(mode, outcome, &self.display, now) {
            Dispatch::Unbound => {
                let shape = self.display.shape();
                emit_event(
                    self.bus.as_ref(),
                    event_names::BINDING_GAP,
                    &BindingGapEvent {
                        mode,
                        key: outcome.key,
                        kind: outcome.kind,
                        orientation: shape.orientation,
                        aspect: shape.aspect,
                        timestamp_ms: now,
                    },
                );
            }
            Dispatch::Debounced => {}
            Dispatch::Action(Action::NoOp) => {}
            Dispatch::Action(action) => self.perform(mode, outcome, action, now),
        }
    }

    fn perform(&self, mode: Mode, outcome: PressOutcome, action: Action, now: i64) {
        match self.sink.perform(&action) {
            Ok(()) => emit_event(
                self.bus.as_ref(),
                event_names::ACTION_EMITTED,
                &ActionEmittedEvent {
                    mode,
                    key: outcome.key,
                    kind: outcome.kind,
                    action,
                    timestamp_ms: now,
                },
            ),
            Err(e) => {
                tracing::warn!(error = %e, ?action, "action sink failed");
                emit_event(
                    self.bus.as_ref(),
                    event_names::ACTION_FAILED,
                    &ActionFailedEvent {
                        mode,
                        key: outcome.key,
                        kind: outcome.kind,
                        action,
                        error: e.to_string(),
                        timestamp_ms: now,
                    },
                );
            }
        }
    }

    // --- Context ---

    fn on_foreground_changed(&mut self, app_id: String) {
        let now = self.clock.now_ms();
        let aspect = self.display.shape().aspect;

        let hint = self.classifier.on_foreground_changed(&app_id, aspect);
        if hint == AppHint::Ignored {
            return;
        }

        if let Some(transition) = self.resolver.apply_foreground(hint, aspect, now) {
            self.announce(transition, Some(app_id), true);
        }
    }

    fn on_display_changed(&mut self, metrics: DisplayMetrics) {
        let first_report = !self.display_reported;
        self.display_reported = true;

        let before = self.display.shape();
        self.display = metrics;
        let after = self.display.shape();

        if before == after && !first_report {
            return;
        }
        tracing::debug!(?before, ?after, first_report, "screen shape changed");

        // The first real reading and every new aspect bucket are fresh fallback
        // hints, as long as no mapped app is in front.
        if first_report || before.aspect != after.aspect {
            let mapped = self
                .classifier
                .current_app()
                .and_then(AppFamily::of)
                .is_some();
            if !mapped {
                let now = self.clock.now_ms();
                if let Some(transition) = self.resolver.apply_aspect_hint(after.aspect, now) {
                    self.announce(transition, None, true);
                }
            }
        }
    }

    fn select_mode(&mut self, mode: Mode, persist: bool) {
        let now = self.clock.now_ms();
        match self.resolver.select(mode, now) {
            Some(transition) => self.announce(transition, None, persist),
            None if persist => self.persist(),
            None => {}
        }
    }

    fn set_auto_switch(&mut self, enabled: bool, persist: bool) {
        if !self.resolver.set_auto_switch(enabled) {
            return;
        }
        emit_event(
            self.bus.as_ref(),
            event_names::AUTO_SWITCH_CHANGED,
            &AutoSwitchChangedEvent {
                enabled,
                timestamp_ms: self.clock.now_ms(),
            },
        );
        if persist {
            self.persist();
        }
    }

    /// Apply settings changed by someone else. Not written back.
    fn on_settings_changed(&mut self, settings: PersistedSettings) {
        self.set_auto_switch(settings.auto_switch_enabled, false);
        self.select_mode(settings.active_mode, false);
    }

    fn announce(&mut self, transition: ModeTransition, app_id: Option<String>, persist: bool) {
        emit_event(
            self.bus.as_ref(),
            event_names::MODE_CHANGED,
            &ModeChangedEvent {
                from: transition.from,
                to: transition.to,
                reason: transition.reason,
                app_id,
                timestamp_ms: transition.timestamp_ms,
            },
        );
        if persist {
            self.persist();
        }
    }

    fn persist(&self) {
        let settings = PersistedSettings {
            active_mode: self.resolver.mode(),
            auto_switch_enabled: self.resolver.auto_switch_enabled(),
        };
        if let Err(e) = self.settings.save_settings(&settings) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }

    fn snapshot(&self) -> EngineSnapshot {
        let state = self.resolver.state();
        EngineSnapshot {
            mode: state.mode,
            origin: state.origin,
            auto_switch_enabled: state.auto_switch.enabled,
            lock: state.lock,
            foreground_app: self.classifier.current_app().map(str::to_string),
            display: self.display,
            shape: self.display.shape(),
            pending_presses: self.press_timer.armed_count(),
        }
    }
}
