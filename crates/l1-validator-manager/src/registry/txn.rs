//! Staging overlay over the registry.
//!
//! Reads fall through to the committed registry; writes stay in memory
//! until `ValidatorRegistry::commit`. Every mutation asserts the source
//! status is legal for its target before staging.

use super::ValidatorRegistry;
use crate::domain::churn::ChurnTracker;
use crate::domain::entities::{Validation, ValidationStatus};
use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::ports::outbound::KeyValueStore;
use shared_types::{NodeId, ValidationId};
use std::collections::BTreeMap;

/// Changes staged by a transaction, ready to commit.
#[derive(Debug, Clone, Default)]
pub struct StagedChanges {
    pub(super) validations: BTreeMap<ValidationId, Validation>,
    /// `None` removes the node's index entry.
    pub(super) nodes: BTreeMap<NodeId, Option<ValidationId>>,
    pub(super) total_weight: u64,
    pub(super) initialized: bool,
    pub(super) churn: Option<ChurnTracker>,
    pub(super) churn_dirty: bool,
}

/// Read-your-writes overlay for one operation.
pub struct RegistryTxn<'a, S: KeyValueStore> {
    registry: &'a ValidatorRegistry<S>,
    changes: StagedChanges,
}

impl<'a, S: KeyValueStore> RegistryTxn<'a, S> {
    pub(super) fn new(registry: &'a ValidatorRegistry<S>) -> Self {
        Self {
            registry,
            changes: StagedChanges {
                total_weight: registry.total_weight,
                initialized: registry.initialized,
                churn: registry.churn.clone(),
                ..StagedChanges::default()
            },
        }
    }

    pub fn get(&self, validation_id: &ValidationId) -> ValidatorManagerResult<Option<Validation>> {
        if let Some(staged) = self.changes.validations.get(validation_id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.registry.get(validation_id)?)
    }

    /// Like `get`, failing with `ValidationNotFound`.
    pub fn require(&self, validation_id: &ValidationId) -> ValidatorManagerResult<Validation> {
        self.get(validation_id)?
            .ok_or(ValidatorManagerError::ValidationNotFound {
                validation_id: *validation_id,
            })
    }

    pub fn node_validation(&self, node_id: &NodeId) -> ValidatorManagerResult<Option<ValidationId>> {
        if let Some(entry) = self.changes.nodes.get(node_id) {
            return Ok(*entry);
        }
        Ok(self.registry.node_validation(node_id)?)
    }

    pub fn total_weight(&self) -> u64 {
        self.changes.total_weight
    }

    pub fn is_initialized(&self) -> bool {
        self.changes.initialized
    }

    /// Insert a new validation (`PendingAdded`, or `Active` for genesis).
    pub fn create(&mut self, validation: Validation) -> ValidatorManagerResult<()> {
        let validation_id = validation.validation_id;
        if self.get(&validation_id)?.is_some() {
            return Err(ValidatorManagerError::DuplicateValidationId { validation_id });
        }
        if !ValidationStatus::Unknown.can_transition_to(validation.status) {
            return Err(ValidatorManagerError::InvalidTransition {
                validation_id,
                from: ValidationStatus::Unknown,
                to: validation.status,
            });
        }
        if let Some(existing) = self.node_validation(&validation.node_id)? {
            return Err(ValidatorManagerError::NodeAlreadyRegistered {
                node_id: validation.node_id,
                validation_id: existing,
            });
        }

        self.changes
            .nodes
            .insert(validation.node_id, Some(validation_id));
        self.stage(0, validation)
    }

    /// Advance the status; leaving the live statuses releases the node's slot.
    pub fn set_status(
        &mut self,
        validation_id: &ValidationId,
        next: ValidationStatus,
        now: u64,
    ) -> ValidatorManagerResult<Validation> {
        let mut validation = self.require(validation_id)?;
        let before = validation.counted_weight();
        validation.transition_to(next, now)?;

        if !next.is_live() {
            self.changes.nodes.insert(validation.node_id, None);
        }
        self.stage(before, validation.clone())?;
        Ok(validation)
    }

    /// Apply an acknowledged weight. Only counted statuses carry weight changes.
    pub fn set_weight(
        &mut self,
        validation_id: &ValidationId,
        weight: u64,
    ) -> ValidatorManagerResult<Validation> {
        let mut validation = self.require(validation_id)?;
        if !validation.status.counts_toward_total() {
            return Err(ValidatorManagerError::InvalidTransition {
                validation_id: *validation_id,
                from: validation.status,
                to: ValidationStatus::Active,
            });
        }
        let before = validation.counted_weight();
        validation.weight = weight;
        self.stage(before, validation.clone())?;
        Ok(validation)
    }

    /// Open a new weight-update period. Requires `Active`.
    pub fn increment_nonce(&mut self, validation_id: &ValidationId) -> ValidatorManagerResult<u64> {
        let mut validation = self.require(validation_id)?;
        if validation.status != ValidationStatus::Active {
            return Err(ValidatorManagerError::InvalidTransition {
                validation_id: *validation_id,
                from: validation.status,
                to: ValidationStatus::Active,
            });
        }
        validation.message_nonce += 1;
        let nonce = validation.message_nonce;
        let before = validation.counted_weight();
        self.stage(before, validation)?;
        Ok(nonce)
    }

    /// Set or clear the outstanding update target.
    pub fn set_pending_weight(
        &mut self,
        validation_id: &ValidationId,
        pending: Option<u64>,
    ) -> ValidatorManagerResult<()> {
        let mut validation = self.require(validation_id)?;
        if pending.is_some() && validation.status != ValidationStatus::Active {
            return Err(ValidatorManagerError::InvalidTransition {
                validation_id: *validation_id,
                from: validation.status,
                to: ValidationStatus::Active,
            });
        }
        validation.pending_weight = pending;
        let before = validation.counted_weight();
        self.stage(before, validation)
    }

    /// Flag genesis as consumed.
    pub fn mark_initialized(&mut self) -> ValidatorManagerResult<()> {
        if self.changes.initialized {
            return Err(ValidatorManagerError::AlreadyInitialized);
        }
        self.changes.initialized = true;
        Ok(())
    }

    /// Charge a weight change against the churn window. No-op when disabled.
    pub fn record_churn(
        &mut self,
        now: u64,
        old_weight: u64,
        new_weight: u64,
    ) -> ValidatorManagerResult<()> {
        let total = self.changes.total_weight;
        if let Some(tracker) = self.changes.churn.as_mut() {
            tracker.check_and_record(now, old_weight, new_weight, total)?;
            self.changes.churn_dirty = true;
        }
        Ok(())
    }

    pub fn into_changes(self) -> StagedChanges {
        self.changes
    }

    fn stage(&mut self, before: u64, validation: Validation) -> ValidatorManagerResult<()> {
        let after = validation.counted_weight();
        let total = self
            .changes
            .total_weight
            .checked_sub(before)
            .and_then(|t| t.checked_add(after))
            .ok_or(ValidatorManagerError::InvalidWeight { weight: after })?;

        self.changes.total_weight = total;
        self.changes
            .validations
            .insert(validation.validation_id, validation);
        Ok(())
    }
}
