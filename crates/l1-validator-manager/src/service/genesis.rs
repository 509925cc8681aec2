//! Genesis bootstrapping: one-shot seeding from attested conversion data.

use super::ValidatorManager;
use crate::algorithms::codec::{conversion_id, genesis_validation_id};
use crate::domain::entities::Validation;
use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::domain::invariants::{invariant_conversion_targets, invariant_positive_weight};
use crate::domain::value_objects::ConversionData;
use crate::events::ValidatorManagerEvent;
use crate::metrics;
use crate::ports::outbound::{EventSink, KeyValueStore, MessageGateway, TimeSource};
use l1_telemetry::{log_event, log_validation_event};
use shared_types::{MessageIndex, ValidationId};

impl<S, G, E, T> ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    pub(super) fn initialize(
        &self,
        conversion: ConversionData,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<Vec<ValidationId>> {
        let mut registry = self.registry.lock();
        if registry.is_initialized() {
            return Err(ValidatorManagerError::AlreadyInitialized);
        }
        invariant_conversion_targets(
            &conversion,
            self.config.subnet_id,
            self.config.chain_id,
            self.config.manager_address,
        )?;

        let attestation = self.read_inbound(message_index)?.into_conversion()?;
        let computed = conversion_id(&conversion)?;
        if attestation.conversion_id != computed {
            return Err(ValidatorManagerError::ConversionMismatch {
                reason: format!(
                    "attested {} but conversion data hashes to {}",
                    hex::encode(attestation.conversion_id),
                    hex::encode(computed)
                ),
            });
        }

        let now = self.clock.now();
        let mut txn = registry.begin();
        txn.mark_initialized()?;

        let mut seeded = Vec::with_capacity(conversion.initial_validators.len());
        for (position, validator) in conversion.initial_validators.iter().enumerate() {
            invariant_positive_weight(validator.weight)?;
            let index = u32::try_from(position).map_err(|_| {
                ValidatorManagerError::InvalidConversion {
                    reason: "too many initial validators".to_string(),
                }
            })?;
            let validation_id = genesis_validation_id(conversion.l1_id, index);
            txn.create(Validation::genesis(validation_id, validator, now))?;
            seeded.push((validation_id, index));
        }

        let changes = txn.into_changes();
        self.commit_and_consume(&mut registry, changes, message_index)?;

        let total_weight = registry.total_weight();
        metrics::set_total_weight(total_weight);
        log_event!(
            info,
            "genesis",
            "[l1-vm] 🌱 Validator set initialized",
            l1_id = %conversion.l1_id,
            validators = seeded.len(),
            total_weight,
            message_index
        );

        for ((validation_id, index), validator) in
            seeded.iter().zip(&conversion.initial_validators)
        {
            log_validation_event!(
                debug,
                "[l1-vm] Genesis validator registered",
                validation_id,
                validator.node_id,
                weight = validator.weight
            );
            self.events
                .publish(ValidatorManagerEvent::GenesisValidatorRegistered {
                    validation_id: *validation_id,
                    node_id: validator.node_id,
                    weight: validator.weight,
                    index: *index,
                });
        }

        Ok(seeded.into_iter().map(|(validation_id, _)| validation_id).collect())
    }
}
