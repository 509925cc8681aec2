//! Out-of-band invalidation reported by the remote ledger.

use super::ValidatorManager;
use crate::domain::entities::ValidationStatus;
use crate::domain::errors::ValidatorManagerResult;
use crate::events::ValidatorManagerEvent;
use crate::metrics;
use crate::ports::outbound::{EventSink, KeyValueStore, MessageGateway, TimeSource};
use l1_telemetry::log_validation_event;
use shared_types::{MessageIndex, ValidationId};

impl<S, G, E, T> ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    pub(super) fn complete_invalidation(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId> {
        let mut registry = self.registry.lock();
        let ack = self.read_inbound(message_index)?.into_invalidation()?;
        let validation_id = ack.validation_id;

        let now = self.clock.now();
        let mut txn = registry.begin();
        let removed_weight = txn.require(&validation_id)?.counted_weight();
        let invalidated = txn.set_status(&validation_id, ValidationStatus::Invalidated, now)?;
        let changes = txn.into_changes();
        self.commit_and_consume(&mut registry, changes, message_index)?;

        metrics::record_invalidation();
        metrics::set_total_weight(registry.total_weight());
        log_validation_event!(
            warn,
            "[l1-vm] ⛔ Validation invalidated",
            validation_id,
            invalidated.node_id,
            removed_weight,
            message_index
        );
        self.events
            .publish(ValidatorManagerEvent::ValidationInvalidated {
                validation_id,
                node_id: invalidated.node_id,
                removed_weight,
                end_time: invalidated.end_time.unwrap_or(now),
            });

        Ok(validation_id)
    }
}
