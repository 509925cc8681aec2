//! # Adapters
//!
//! Concrete implementations of the outbound ports.

pub mod event_log;
pub mod message_gateway;
pub mod storage;
pub mod time;

pub use event_log::{InMemoryEventLog, TracingEventSink};
pub use message_gateway::{EmittedMessage, InMemoryMessageGateway};
pub use storage::{FileBackedKVStore, InMemoryKVStore};
pub use time::{ManualClock, SystemTimeSource};
