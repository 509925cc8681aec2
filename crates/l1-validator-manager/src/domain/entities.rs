//! # Validation Entity
//!
//! One continuous membership span of a node, from registration (or genesis)
//! until removal or invalidation.

use crate::algorithms::codec::RegisterValidatorMessage;
use crate::domain::errors::ValidatorManagerError;
use crate::domain::value_objects::InitialValidator;
use serde::{Deserialize, Serialize};
use shared_types::{BlsPublicKey, NodeId, ValidationId};

/// Status of a validation.
///
/// ```text
/// Unknown ──► PendingAdded ──► Active ──► PendingRemoved ──► Completed
///    │             │             ▲ │             │
///    └── genesis ──┼─────────────┘ │             │
///                  ▼               ▼             ▼
///                      Invalidated (out-of-band)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValidationStatus {
    #[default]
    Unknown,
    PendingAdded,
    Active,
    PendingRemoved,
    Completed,
    Invalidated,
}

impl ValidationStatus {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: ValidationStatus) -> bool {
        use ValidationStatus::*;
        matches!(
            (self, next),
            (Unknown, PendingAdded)
                | (Unknown, Active)
                | (PendingAdded, Active)
                | (PendingAdded, Invalidated)
                | (Active, PendingRemoved)
                | (Active, Invalidated)
                | (PendingRemoved, Completed)
                | (PendingRemoved, Invalidated)
        )
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Invalidated)
    }

    /// Whether a validation in this status counts toward total weight.
    pub fn counts_toward_total(self) -> bool {
        matches!(self, Self::Active | Self::PendingRemoved)
    }

    /// Whether the validation occupies its node's slot.
    pub fn is_live(self) -> bool {
        matches!(self, Self::PendingAdded | Self::Active | Self::PendingRemoved)
    }
}

/// A validator membership record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub validation_id: ValidationId,
    pub status: ValidationStatus,
    pub node_id: NodeId,
    pub bls_public_key: BlsPublicKey,
    /// Weight at registration; never changes.
    pub starting_weight: u64,
    /// Current effective weight.
    pub weight: u64,
    /// Nonce of the most recently initiated weight update.
    pub message_nonce: u64,
    /// Target of the outstanding weight update, if any.
    pub pending_weight: Option<u64>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    /// Registration request kept for resends while `PendingAdded`.
    pub registration: Option<RegisterValidatorMessage>,
}

impl Validation {
    /// A record awaiting the remote ledger's registration acknowledgment.
    pub fn pending(validation_id: ValidationId, request: RegisterValidatorMessage) -> Self {
        Self {
            validation_id,
            status: ValidationStatus::PendingAdded,
            node_id: request.node_id,
            bls_public_key: request.bls_public_key,
            starting_weight: request.weight,
            weight: request.weight,
            message_nonce: 0,
            pending_weight: None,
            start_time: None,
            end_time: None,
            registration: Some(request),
        }
    }

    /// An already-active record seeded from conversion data.
    pub fn genesis(validation_id: ValidationId, validator: &InitialValidator, now: u64) -> Self {
        Self {
            validation_id,
            status: ValidationStatus::Active,
            node_id: validator.node_id,
            bls_public_key: validator.bls_public_key,
            starting_weight: validator.weight,
            weight: validator.weight,
            message_nonce: 0,
            pending_weight: None,
            start_time: Some(now),
            end_time: None,
            registration: None,
        }
    }

    /// Weight this record contributes to the registry total.
    pub fn counted_weight(&self) -> u64 {
        if self.status.counts_toward_total() {
            self.weight
        } else {
            0
        }
    }

    /// Nonce of the outstanding weight update, if one is in flight.
    pub fn outstanding_nonce(&self) -> Option<u64> {
        self.pending_weight.map(|_| self.message_nonce)
    }

    /// Move to `next`, stamping start/end times.
    pub fn transition_to(
        &mut self,
        next: ValidationStatus,
        now: u64,
    ) -> Result<(), ValidatorManagerError> {
        if !self.status.can_transition_to(next) {
            return Err(ValidatorManagerError::InvalidTransition {
                validation_id: self.validation_id,
                from: self.status,
                to: next,
            });
        }

        if self.status == ValidationStatus::PendingAdded && next == ValidationStatus::Active {
            self.start_time = Some(now);
            self.registration = None;
        }
        if next.is_terminal() {
            self.end_time = Some(now);
            self.pending_weight = None;
            self.registration = None;
        }

        self.status = next;
        Ok(())
    }
}
