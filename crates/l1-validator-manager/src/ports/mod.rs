//! # Ports
//!
//! Inbound ports are what the coordinator offers; outbound ports are what
//! the host must provide.

pub mod inbound;
pub mod outbound;

pub use inbound::{ValidatorManagerApi, ValidatorSetCoordinator};
pub use outbound::{BatchOperation, EventSink, KeyValueStore, MessageGateway, TimeSource};
