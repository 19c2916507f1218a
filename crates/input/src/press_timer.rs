//! Short/long press classification.
//!
//! Each long-press key gets its own timer task. The task never touches the
//! classifier; it only sends a [`TimerFired`] message back to the owner, which
//! feeds it to [`PressTimer::on_timer_fired`]. A shared "resolved" flag decides
//! the race between a release and a firing timer, so every press yields
//! exactly one [`PressOutcome`].
//!
//! ```text
//!   on_down ──► armed ──┬── on_up wins flag ─────────────► Short (or Long if held ≥ threshold)
//!                       └── timer wins flag ─► TimerFired ─► Long, later on_up is silent
//! ```

use crate::key::KeyCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Hold time after which a press counts as long.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressKind {
    Short,
    Long,
}

impl std::fmt::Display for PressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PressKind::Short => f.write_str("short"),
            PressKind::Long => f.write_str("long"),
        }
    }
}

/// Disambiguated result of one physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressOutcome {
    pub key: KeyCode,
    pub kind: PressKind,
}

impl PressOutcome {
    pub fn short(key: KeyCode) -> Self {
        Self {
            key,
            kind: PressKind::Short,
        }
    }

    pub fn long(key: KeyCode) -> Self {
        Self {
            key,
            kind: PressKind::Long,
        }
    }
}

/// Message sent by a timer task when its threshold elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub key: KeyCode,
    pub generation: u64,
}

struct ArmedPress {
    down_at_ms: i64,
    generation: u64,
    resolved: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ArmedPress {
    /// Claim the press for the caller. Only one of release, timer and
    /// cancellation ever succeeds.
    fn claim(&self) -> bool {
        self.resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn disarm(self) {
        self.resolved.store(true, Ordering::Release);
        self.task.abort();
    }
}

/// Per-key short/long press classifier.
///
/// Must be driven from inside a Tokio runtime; `on_down` spawns the timer.
pub struct PressTimer {
    threshold: Duration,
    armed: HashMap<KeyCode, ArmedPress>,
    next_generation: u64,
    fired_tx: mpsc::UnboundedSender<TimerFired>,
}

impl PressTimer {
    pub fn new(threshold: Duration, fired_tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            threshold,
            armed: HashMap::new(),
            next_generation: 0,
            fired_tx,
        }
    }

    /// Create a timer together with the receiver its tasks report to.
    pub fn channel(threshold: Duration) -> (Self, mpsc::UnboundedReceiver<TimerFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(threshold, tx), rx)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Whether a press of `key` is armed and not yet delivered.
    pub fn is_armed(&self, key: KeyCode) -> bool {
        self.armed.contains_key(&key)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Handle a key going down.
    ///
    /// Keys without long-press handling resolve immediately as Short. For
    /// long-press keys this returns a Long only when the previous press's
    /// timer had already won but its message was not processed yet.
    pub fn on_down(&mut self, key: KeyCode, now_ms: i64) -> Option<PressOutcome> {
        if !key.needs_long_press() {
            return Some(PressOutcome::short(key));
        }

        let flushed = self.armed.remove(&key).and_then(|prev| {
            if prev.claim() {
                tracing::debug!(%key, "down without release, resetting press");
                prev.disarm();
                None
            } else {
                // Timer already fired; its message will be stale after re-arming.
                prev.disarm();
                Some(PressOutcome::long(key))
            }
        });

        self.arm(key, now_ms);
        flushed
    }

    /// Handle a key coming up.
    pub fn on_up(&mut self, key: KeyCode, now_ms: i64) -> Option<PressOutcome> {
        if !key.needs_long_press() {
            return None;
        }

        let armed = self.armed.get(&key)?;
        if !armed.claim() {
            // The timer won; the Long arrives through on_timer_fired.
            return None;
        }

        let armed = self.armed.remove(&key)?;
        let held_ms = now_ms - armed.down_at_ms;
        armed.disarm();

        let kind = if held_ms >= self.threshold.as_millis() as i64 {
            PressKind::Long
        } else {
            PressKind::Short
        };
        tracing::trace!(%key, held_ms, %kind, "press released");
        Some(PressOutcome { key, kind })
    }

    /// Handle a timer message. Stale generations are dropped.
    pub fn on_timer_fired(&mut self, fired: TimerFired) -> Option<PressOutcome> {
        match self.armed.get(&fired.key) {
            Some(armed) if armed.generation == fired.generation => {
                self.armed.remove(&fired.key);
                tracing::trace!(key = %fired.key, "long press threshold reached");
                Some(PressOutcome::long(fired.key))
            }
            _ => {
                tracing::trace!(key = %fired.key, generation = fired.generation, "stale timer message");
                None
            }
        }
    }

    /// Forget the press of `key`, if any. No outcome is produced for it.
    pub fn cancel(&mut self, key: KeyCode) -> bool {
        match self.armed.remove(&key) {
            Some(armed) => {
                armed.disarm();
                tracing::debug!(%key, "cancelled pending press");
                true
            }
            None => false,
        }
    }

    /// Cancel every armed timer. No outcome is produced for them.
    pub fn cancel_all(&mut self) {
        let count = self.armed.len();
        for (_, armed) in self.armed.drain() {
            armed.disarm();
        }
        if count > 0 {
            tracing::debug!(count, "cancelled pending press timers");
        }
    }

    fn arm(&mut self, key: KeyCode, now_ms: i64) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let resolved = Arc::new(AtomicBool::new(false));

        // Deadline is fixed at Down, not when the task is first polled.
        let deadline = tokio::time::Instant::now() + self.threshold;

        let task = {
            let resolved = Arc::clone(&resolved);
            let tx = self.fired_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                if resolved
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    let _ = tx.send(TimerFired { key, generation });
                }
            })
        };

        self.armed.insert(
            key,
            ArmedPress {
                down_at_ms: now_ms,
                generation,
                resolved,
                task,
            },
        );
    }
}

impl Drop for PressTimer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
