//! # Domain Layer
//!
//! Validation records, their state machine, churn accounting and the input
//! rules every operation checks before touching the registry.

pub mod churn;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use churn::{ChurnConfig, ChurnStatus, ChurnTracker};
pub use entities::{Validation, ValidationStatus};
pub use errors::{StorageError, ValidatorManagerError, ValidatorManagerResult};
pub use invariants::*;
pub use value_objects::{ConversionData, InitialValidator, PChainOwner, RegistrationRequest};
