//! Event sink adapters.

use crate::events::ValidatorManagerEvent;
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use tracing::info;

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<ValidatorManagerEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ValidatorManagerEvent> {
        self.events.read().clone()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn last(&self) -> Option<ValidatorManagerEvent> {
        self.events.read().last().cloned()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: ValidatorManagerEvent) {
        self.events.write().push(event);
    }
}

/// Writes each event as a structured log line for an external indexer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: ValidatorManagerEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        info!(
            target: "l1_validator_manager::events",
            event = event.name(),
            validation_id = %event.validation_id(),
            node_id = %event.node_id(),
            payload = %payload,
            "[l1-vm] 📣 Event"
        );
    }
}
