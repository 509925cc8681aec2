//! Weight handshake: nonce-ordered updates, zero weight removes.

use super::{not_found, ValidatorManager};
use crate::algorithms::codec::{SetValidatorWeightMessage, WarpPayload};
use crate::domain::entities::ValidationStatus;
use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::events::ValidatorManagerEvent;
use crate::metrics;
use crate::ports::outbound::{EventSink, KeyValueStore, MessageGateway, TimeSource};
use l1_telemetry::log_validation_event;
use shared_types::{MessageHandle, MessageIndex, ValidationId};
use tracing::debug;

impl<S, G, E, T> ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    pub(super) fn initiate_weight_update(
        &self,
        validation_id: &ValidationId,
        weight: u64,
    ) -> ValidatorManagerResult<u64> {
        let now = self.clock.now();
        let mut registry = self.registry.lock();
        if !registry.is_initialized() {
            return Err(ValidatorManagerError::NotInitialized);
        }
        let mut txn = registry.begin();

        let validation = txn.require(validation_id)?;
        if validation.status != ValidationStatus::Active {
            return Err(ValidatorManagerError::InvalidTransition {
                validation_id: *validation_id,
                from: validation.status,
                to: if weight == 0 {
                    ValidationStatus::PendingRemoved
                } else {
                    ValidationStatus::Active
                },
            });
        }
        if let Some(nonce) = validation.outstanding_nonce() {
            return Err(ValidatorManagerError::WeightUpdatePending {
                validation_id: *validation_id,
                nonce,
            });
        }

        txn.record_churn(now, validation.weight, weight)?;
        let nonce = txn.increment_nonce(validation_id)?;
        txn.set_pending_weight(validation_id, Some(weight))?;
        if weight == 0 {
            txn.set_status(validation_id, ValidationStatus::PendingRemoved, now)?;
        }
        let changes = txn.into_changes();

        let message = SetValidatorWeightMessage {
            validation_id: *validation_id,
            nonce,
            weight,
        };
        let handle = self.commit_and_emit(
            &mut registry,
            changes,
            &WarpPayload::SetValidatorWeight(message),
        )?;

        metrics::record_weight_update_initiated();
        log_validation_event!(
            info,
            "[l1-vm] ⚖️ Weight update initiated",
            validation_id,
            validation.node_id,
            nonce,
            from_weight = validation.weight,
            to_weight = weight
        );
        self.events
            .publish(ValidatorManagerEvent::WeightUpdateInitiated {
                validation_id: *validation_id,
                node_id: validation.node_id,
                nonce,
                weight,
                message: handle,
            });

        Ok(nonce)
    }

    pub(super) fn complete_weight_update(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId> {
        let mut registry = self.registry.lock();
        let ack = self.read_inbound(message_index)?.into_weight_ack()?;
        let validation_id = ack.validation_id;

        let now = self.clock.now();
        let mut txn = registry.begin();
        let validation = txn.require(&validation_id)?;

        let pending = match validation.pending_weight {
            Some(pending) if validation.message_nonce == ack.nonce => pending,
            _ => {
                return Err(ValidatorManagerError::StaleNonce {
                    validation_id,
                    expected: validation.outstanding_nonce(),
                    received: ack.nonce,
                })
            }
        };
        if ack.weight != pending {
            return Err(ValidatorManagerError::WeightMismatch {
                validation_id,
                expected: pending,
                received: ack.weight,
            });
        }

        txn.set_weight(&validation_id, ack.weight)?;
        txn.set_pending_weight(&validation_id, None)?;
        let updated = if ack.weight == 0 {
            txn.set_status(&validation_id, ValidationStatus::Completed, now)?
        } else {
            txn.require(&validation_id)?
        };
        let changes = txn.into_changes();
        self.commit_and_consume(&mut registry, changes, message_index)?;

        metrics::record_weight_update_completed();
        metrics::set_total_weight(registry.total_weight());
        log_validation_event!(
            info,
            "[l1-vm] ✅ Weight update completed",
            validation_id,
            updated.node_id,
            nonce = ack.nonce,
            weight = ack.weight,
            status = ?updated.status,
            message_index
        );
        self.events
            .publish(ValidatorManagerEvent::WeightUpdateCompleted {
                validation_id,
                node_id: updated.node_id,
                nonce: ack.nonce,
                weight: ack.weight,
                status: updated.status,
            });

        Ok(validation_id)
    }

    pub(super) fn resend_weight_update(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<MessageHandle> {
        let registry = self.registry.lock();
        let validation = registry
            .get(validation_id)?
            .ok_or_else(|| not_found(validation_id))?;

        let weight = validation
            .pending_weight
            .ok_or(ValidatorManagerError::InvalidTransition {
                validation_id: *validation_id,
                from: validation.status,
                to: validation.status,
            })?;

        let handle = self.emit_only(&WarpPayload::SetValidatorWeight(
            SetValidatorWeightMessage {
                validation_id: *validation_id,
                nonce: validation.message_nonce,
                weight,
            },
        ))?;
        debug!(
            validation_id = %validation_id,
            nonce = validation.message_nonce,
            "[l1-vm] Weight message re-sent"
        );
        Ok(handle)
    }
}
