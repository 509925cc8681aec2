//! # L1 Validator Manager
//!
//! Keeps a local chain's record of an L1 validator set consistent with the
//! remote ledger that has final authority over membership and weights.
//!
//! ## Components
//!
//! | Component | Module |
//! |-----------|--------|
//! | Validator Registry | [`registry`] |
//! | Genesis Bootstrapper | `service::genesis` |
//! | Registration Coordinator | `service::registration` |
//! | Weight Coordinator | `service::weight` |
//! | Churn Limiter | [`domain::churn`] |
//! | Notifications | [`events`] |
//! | PoA policy | [`policy::poa`] |
//!
//! ## Handshakes
//!
//! ```text
//! policy ──initiate──► ValidatorManager ──emit──► MessageGateway ──► remote ledger
//!                            ▲                                           │
//! relayer ──complete(index)──┘◄────────── authenticated ack ─────────────┘
//! ```
//!
//! Inbound acknowledgments are matched by message index (consumed at most
//! once) and, for weight updates, by the per-validation nonce. Stale and
//! duplicate deliveries fail without touching state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use l1_validator_manager::prelude::*;
//!
//! let manager = ValidatorManager::new(config, ValidatorManagerDependencies {
//!     store: FileBackedKVStore::open("data/registry.kv")?,
//!     gateway: Arc::new(gateway),
//!     events: Arc::new(TracingEventSink),
//!     clock: Arc::new(SystemTimeSource),
//! })?;
//! let manager = Arc::new(manager);
//! let poa = PoAValidatorManager::new(manager.clone(), owner);
//! ```

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod service;

pub use config::{ConfigError, ValidatorManagerConfig};
pub use domain::{
    ChurnConfig, ChurnStatus, ChurnTracker, ConversionData, InitialValidator, PChainOwner,
    RegistrationRequest, StorageError, Validation, ValidationStatus, ValidatorManagerError,
    ValidatorManagerResult,
};
pub use events::ValidatorManagerEvent;
pub use policy::PoAValidatorManager;
pub use ports::{
    BatchOperation, EventSink, KeyValueStore, MessageGateway, TimeSource, ValidatorManagerApi,
    ValidatorSetCoordinator,
};
pub use registry::ValidatorRegistry;
pub use service::{ValidatorManager, ValidatorManagerDependencies};

/// Common imports for hosts and tests.
pub mod prelude {
    pub use crate::adapters::{
        FileBackedKVStore, InMemoryEventLog, InMemoryKVStore, InMemoryMessageGateway,
        ManualClock, SystemTimeSource, TracingEventSink,
    };
    pub use crate::algorithms::codec::*;
    pub use crate::{
        ChurnConfig, ConversionData, EventSink, InitialValidator, KeyValueStore, MessageGateway,
        PChainOwner, PoAValidatorManager, RegistrationRequest, TimeSource, Validation,
        ValidationStatus, ValidatorManager, ValidatorManagerApi, ValidatorManagerConfig,
        ValidatorManagerDependencies, ValidatorManagerError, ValidatorManagerEvent,
        ValidatorSetCoordinator,
    };
    pub use shared_types::*;
    pub use std::sync::Arc;
}
