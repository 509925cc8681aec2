//! Registration handshake: propose, remote acknowledgment, activate.

use super::{not_found, ValidatorManager};
use crate::algorithms::codec::{self, RegisterValidatorMessage, WarpPayload};
use crate::domain::entities::{Validation, ValidationStatus};
use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::domain::invariants::{
    invariant_expiry_window, invariant_positive_weight, invariant_valid_owner,
};
use crate::domain::value_objects::RegistrationRequest;
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
    pub(super) fn initiate_registration(
        &self,
        request: RegistrationRequest,
    ) -> ValidatorManagerResult<ValidationId> {
        invariant_positive_weight(request.weight)?;
        let now = self.clock.now();
        invariant_expiry_window(request.expiry, now, self.config.max_registration_expiry_secs)?;
        invariant_valid_owner(&request.remaining_balance_owner)?;
        invariant_valid_owner(&request.disable_owner)?;

        let message = RegisterValidatorMessage {
            subnet_id: self.config.subnet_id,
            node_id: request.node_id,
            bls_public_key: request.bls_public_key,
            expiry: request.expiry,
            remaining_balance_owner: request.remaining_balance_owner,
            disable_owner: request.disable_owner,
            weight: request.weight,
        };
        let validation_id = codec::validation_id(&message)?;

        let mut registry = self.registry.lock();
        if !registry.is_initialized() {
            return Err(ValidatorManagerError::NotInitialized);
        }
        let mut txn = registry.begin();
        txn.create(Validation::pending(validation_id, message.clone()))?;
        txn.record_churn(now, 0, message.weight)?;
        let changes = txn.into_changes();

        let handle = self.commit_and_emit(
            &mut registry,
            changes,
            &WarpPayload::RegisterValidator(message.clone()),
        )?;

        metrics::record_registration_initiated();
        log_validation_event!(
            info,
            "[l1-vm] 📝 Registration initiated",
            validation_id,
            message.node_id,
            weight = message.weight,
            expiry = message.expiry
        );
        self.events
            .publish(ValidatorManagerEvent::RegistrationInitiated {
                validation_id,
                node_id: message.node_id,
                weight: message.weight,
                expiry: message.expiry,
                message: handle,
            });

        Ok(validation_id)
    }

    pub(super) fn complete_registration(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId> {
        let mut registry = self.registry.lock();
        let ack = self.read_inbound(message_index)?.into_registration_ack()?;

        let now = self.clock.now();
        let mut txn = registry.begin();
        let validation = txn.set_status(&ack.validation_id, ValidationStatus::Active, now)?;
        let changes = txn.into_changes();
        self.commit_and_consume(&mut registry, changes, message_index)?;

        metrics::record_registration_completed();
        metrics::set_total_weight(registry.total_weight());
        log_validation_event!(
            info,
            "[l1-vm] ✅ Registration completed",
            validation.validation_id,
            validation.node_id,
            weight = validation.weight,
            message_index
        );
        self.events
            .publish(ValidatorManagerEvent::RegistrationCompleted {
                validation_id: validation.validation_id,
                node_id: validation.node_id,
                weight: validation.weight,
                start_time: validation.start_time.unwrap_or(now),
            });

        Ok(validation.validation_id)
    }

    pub(super) fn resend_registration(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<MessageHandle> {
        let registry = self.registry.lock();
        let validation = registry
            .get(validation_id)?
            .ok_or_else(|| not_found(validation_id))?;

        let message = match (validation.status, validation.registration) {
            (ValidationStatus::PendingAdded, Some(message)) => message,
            (status, _) => {
                return Err(ValidatorManagerError::InvalidTransition {
                    validation_id: *validation_id,
                    from: status,
                    to: ValidationStatus::Active,
                })
            }
        };

        let handle = self.emit_only(&WarpPayload::RegisterValidator(message))?;
        debug!(validation_id = %validation_id, "[l1-vm] Registration message re-sent");
        Ok(handle)
    }
}
