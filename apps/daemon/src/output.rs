//! Writes gestures, events and replies as JSON lines.

use keymapper_application::{ActionSink, SinkError};
use keymapper_bindings::Action;
use keymapper_events::EventBus;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a, T: Serialize> {
    Gesture { action: Action, delay_ms: u64 },
    Event { topic: &'a str, payload: serde_json::Value },
    Reply { reply: &'a T },
}

/// Shared line writer. Acts as both the action sink and the event bus.
pub struct JsonLines<W: Write + Send> {
    out: Mutex<W>,
    double_tap_interval_ms: u64,
}

impl<W: Write + Send> JsonLines<W> {
    pub fn new(out: W, double_tap_interval_ms: u64) -> Self {
        Self {
            out: Mutex::new(out),
            double_tap_interval_ms,
        }
    }

    fn write<T: Serialize>(&self, line: &Line<'_, T>) -> std::io::Result<()> {
        let json = serde_json::to_string(line)?;
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{json}")?;
        out.flush()
    }

    pub fn reply<T: Serialize>(&self, reply: &T) -> std::io::Result<()> {
        self.write(&Line::Reply { reply })
    }

    fn gesture(&self, action: Action, delay_ms: u64) -> Result<(), SinkError> {
        self.write(&Line::Gesture::<'_, ()> { action, delay_ms })
            .map_err(|e| SinkError::Unavailable(e.to_string()))
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> ActionSink for JsonLines<W> {
    fn perform(&self, action: &Action) -> Result<(), SinkError> {
        match *action {
            // Hosts only know single taps; the second one carries the spacing.
            Action::DoubleTap { x, y } => {
                self.gesture(Action::Tap { x, y }, 0)?;
                self.gesture(Action::Tap { x, y }, self.double_tap_interval_ms)
            }
            Action::NoOp => Ok(()),
            other => self.gesture(other, 0),
        }
    }
}

impl<W: Write + Send> EventBus for JsonLines<W> {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if let Err(e) = self.write(&Line::Event::<'_, ()> { topic, payload }) {
            tracing::warn!(topic, error = %e, "failed to write event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keymapper_bindings::MediaCommand;
    use serde_json::{json, Value};

    fn lines(output: JsonLines<Vec<u8>>) -> Vec<Value> {
        String::from_utf8(output.into_inner())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_double_tap_expands_to_two_taps() {
        let output = JsonLines::new(Vec::new(), 100);
        output.perform(&Action::DoubleTap { x: 133, y: 439 }).unwrap();

        let lines = lines(output);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["action"], json!({"type": "tap", "x": 133, "y": 439}));
        assert_eq!(lines[0]["delay_ms"], 0);
        assert_eq!(lines[1]["delay_ms"], 100);
    }

    #[test]
    fn test_noop_writes_nothing() {
        let output = JsonLines::new(Vec::new(), 100);
        output.perform(&Action::NoOp).unwrap();
        assert!(lines(output).is_empty());
    }

    #[test]
    fn test_media_and_events() {
        let output = JsonLines::new(Vec::new(), 100);
        output
            .perform(&Action::Media {
                command: MediaCommand::Next,
            })
            .unwrap();
        output.emit("mode:changed", json!({"to": "tv"}));

        let lines = lines(output);
        assert_eq!(lines[0]["type"], "gesture");
        assert_eq!(lines[0]["action"]["command"], "next");
        assert_eq!(
            lines[1],
            json!({"type": "event", "topic": "mode:changed", "payload": {"to": "tv"}})
        );
    }

    #[test]
    fn test_reply_line() {
        let output = JsonLines::new(Vec::new(), 100);
        output.reply(&json!({"type": "key", "disposition": "consumed"})).unwrap();

        assert_eq!(
            lines(output),
            vec![json!({"type": "reply", "reply": {"type": "key", "disposition": "consumed"}})]
        );
    }
}
