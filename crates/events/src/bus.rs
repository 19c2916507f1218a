//! Observer interface for engine activity.
//!
//! The engine publishes what it does through [`EventBus`] so hosts (a UI, a
//! quick-settings tile, a log shipper) can follow along without the engine
//! knowing about them.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Receives serialized engine events.
pub trait EventBus: Send + Sync {
    /// Called on the engine task for every event; must not block.
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

pub type EventBusRef = Arc<dyn EventBus>;

/// Serialize `event` and emit it on `topic`.
///
/// A payload that fails to serialize is logged and dropped.
pub fn emit_event<T: Serialize>(bus: &dyn EventBus, topic: &str, event: &T) {
    match serde_json::to_value(event) {
        Ok(payload) => bus.emit(topic, payload),
        Err(e) => tracing::warn!(topic, error = %e, "failed to serialize event"),
    }
}

/// Keeps every published event in order. Used by tests and diagnostics.
#[derive(Default)]
pub struct InMemoryEventBus {
    log: Mutex<Vec<(String, serde_json::Value)>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<(String, serde_json::Value)>> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Topics in publication order.
    pub fn topics(&self) -> Vec<String> {
        self.log().iter().map(|(topic, _)| topic.clone()).collect()
    }

    /// Payloads published on `topic`, oldest first.
    pub fn events_for(&self, topic: &str) -> Vec<serde_json::Value> {
        self.log()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Most recent payload on `topic`.
    pub fn last(&self, topic: &str) -> Option<serde_json::Value> {
        self.log()
            .iter()
            .rev()
            .find(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.log().push((topic.to_owned(), payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_names;
    use serde_json::json;

    #[test]
    fn test_events_grouped_by_topic() {
        let bus = InMemoryEventBus::new();
        assert!(bus.is_empty());

        bus.emit(event_names::MODE_CHANGED, json!({"to": "tv"}));
        bus.emit(event_names::ACTION_EMITTED, json!({"kind": "short"}));
        bus.emit(event_names::MODE_CHANGED, json!({"to": "youtube"}));

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.events_for(event_names::MODE_CHANGED),
            vec![json!({"to": "tv"}), json!({"to": "youtube"})]
        );
        assert!(bus.events_for(event_names::BINDING_GAP).is_empty());
        assert_eq!(
            bus.topics(),
            vec!["mode:changed", "action:emitted", "mode:changed"]
        );
    }

    #[test]
    fn test_last_payload() {
        let bus = InMemoryEventBus::new();
        assert_eq!(bus.last(event_names::MODE_CHANGED), None);

        bus.emit(event_names::MODE_CHANGED, json!({"to": "tv"}));
        bus.emit(event_names::MODE_CHANGED, json!({"to": "baidu"}));
        assert_eq!(
            bus.last(event_names::MODE_CHANGED),
            Some(json!({"to": "baidu"}))
        );
    }

    #[test]
    fn test_emit_event_serializes() {
        #[derive(Serialize)]
        struct Ping {
            n: u32,
        }

        let bus = InMemoryEventBus::new();
        emit_event(&bus, "test:ping", &Ping { n: 7 });
        assert_eq!(bus.last("test:ping"), Some(json!({"n": 7})));
    }
}
