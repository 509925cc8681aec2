//! # Notifications
//!
//! Records published to the append-only event log after an operation has
//! fully committed. They carry enough context for an external indexer to
//! rebuild the active set, which the registry itself cannot enumerate.

use crate::domain::entities::ValidationStatus;
use serde::{Deserialize, Serialize};
use shared_types::{MessageHandle, NodeId, ValidationId};

/// Events emitted by the validator manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValidatorManagerEvent {
    /// A validator was seeded from conversion data.
    GenesisValidatorRegistered {
        validation_id: ValidationId,
        node_id: NodeId,
        weight: u64,
        /// Position in the conversion's validator list.
        index: u32,
    },

    /// A registration request was emitted to the remote ledger.
    RegistrationInitiated {
        validation_id: ValidationId,
        node_id: NodeId,
        weight: u64,
        expiry: u64,
        message: MessageHandle,
    },

    /// The remote ledger acknowledged a registration.
    RegistrationCompleted {
        validation_id: ValidationId,
        node_id: NodeId,
        weight: u64,
        start_time: u64,
    },

    /// A weight change was emitted to the remote ledger.
    WeightUpdateInitiated {
        validation_id: ValidationId,
        node_id: NodeId,
        nonce: u64,
        weight: u64,
        message: MessageHandle,
    },

    /// The remote ledger acknowledged a weight change.
    WeightUpdateCompleted {
        validation_id: ValidationId,
        node_id: NodeId,
        nonce: u64,
        weight: u64,
        status: ValidationStatus,
    },

    /// The remote ledger invalidated a validation out of band.
    ValidationInvalidated {
        validation_id: ValidationId,
        node_id: NodeId,
        /// Weight removed from the total (zero if it never counted).
        removed_weight: u64,
        end_time: u64,
    },
}

impl ValidatorManagerEvent {
    pub fn validation_id(&self) -> ValidationId {
        match self {
            Self::GenesisValidatorRegistered { validation_id, .. }
            | Self::RegistrationInitiated { validation_id, .. }
            | Self::RegistrationCompleted { validation_id, .. }
            | Self::WeightUpdateInitiated { validation_id, .. }
            | Self::WeightUpdateCompleted { validation_id, .. }
            | Self::ValidationInvalidated { validation_id, .. } => *validation_id,
        }
    }

    pub fn node_id(&self) -> NodeId {
        match self {
            Self::GenesisValidatorRegistered { node_id, .. }
            | Self::RegistrationInitiated { node_id, .. }
            | Self::RegistrationCompleted { node_id, .. }
            | Self::WeightUpdateInitiated { node_id, .. }
            | Self::WeightUpdateCompleted { node_id, .. }
            | Self::ValidationInvalidated { node_id, .. } => *node_id,
        }
    }

    /// Event name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenesisValidatorRegistered { .. } => "GenesisValidatorRegistered",
            Self::RegistrationInitiated { .. } => "RegistrationInitiated",
            Self::RegistrationCompleted { .. } => "RegistrationCompleted",
            Self::WeightUpdateInitiated { .. } => "WeightUpdateInitiated",
            Self::WeightUpdateCompleted { .. } => "WeightUpdateCompleted",
            Self::ValidationInvalidated { .. } => "ValidationInvalidated",
        }
    }
}
