//! # Validator Manager Service
//!
//! Implements both inbound ports over the registry and the outbound ports.
//!
//! ## Atomicity
//!
//! Every operation holds the registry lock for its whole duration and:
//!
//! 1. authenticates the inbound message without consuming it,
//! 2. stages its mutations in a `RegistryTxn`,
//! 3. commits them in one batch, keeping the undo log,
//! 4. consumes the inbound index or emits the outbound payload, reverting
//!    the batch if the gateway refuses,
//! 5. publishes notifications.
//!
//! A failed call leaves the registry, the gateway's consumed set and its
//! outbox exactly as they were.

mod genesis;
mod invalidation;
mod registration;
mod weight;


use crate::algorithms::codec::{decode_payload, encode_payload, WarpPayload};
use crate::config::ValidatorManagerConfig;
use crate::domain::churn::ChurnStatus;
use crate::domain::entities::Validation;
use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::domain::invariants::invariant_remote_origin;
use crate::domain::value_objects::{ConversionData, RegistrationRequest};
use crate::metrics;
use crate::ports::inbound::{ValidatorManagerApi, ValidatorSetCoordinator};
use crate::ports::outbound::{EventSink, KeyValueStore, MessageGateway, TimeSource};
use crate::registry::{StagedChanges, ValidatorRegistry};
use parking_lot::Mutex;
use shared_types::{ChainId, MessageHandle, MessageIndex, NodeId, ValidationId, WarpMessage};
use std::sync::Arc;
use tracing::{error, warn};

/// Everything the service needs from the host.
pub struct ValidatorManagerDependencies<S, G, E, T> {
    pub store: S,
    pub gateway: Arc<G>,
    pub events: Arc<E>,
    pub clock: Arc<T>,
}

/// The validator-set lifecycle coordinator.
pub struct ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    config: ValidatorManagerConfig,
    registry: Mutex<ValidatorRegistry<S>>,
    gateway: Arc<G>,
    events: Arc<E>,
    clock: Arc<T>,
}

impl<S, G, E, T> ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    /// Validate `config` and open the registry over `deps.store`.
    pub fn new(
        config: ValidatorManagerConfig,
        deps: ValidatorManagerDependencies<S, G, E, T>,
    ) -> ValidatorManagerResult<Self> {
        config.validate()?;
        let registry = ValidatorRegistry::open(deps.store, config.churn)?;
        metrics::set_total_weight(registry.total_weight());

        Ok(Self {
            config,
            registry: Mutex::new(registry),
            gateway: deps.gateway,
            events: deps.events,
            clock: deps.clock,
        })
    }

    pub fn config(&self) -> &ValidatorManagerConfig {
        &self.config
    }

    /// Tear down the service and hand back its store.
    pub fn into_store(self) -> S {
        self.registry.into_inner().into_store()
    }

    /// Authenticate `index`, check its origin and decode its payload. Does not consume.
    fn read_inbound(&self, index: MessageIndex) -> ValidatorManagerResult<WarpPayload> {
        let message = self.gateway.authenticate(index)?;
        invariant_remote_origin(&message, self.config.remote_ledger_id)?;
        decode_payload(&message.payload)
    }

    fn outbound(&self, payload: &WarpPayload) -> ValidatorManagerResult<WarpMessage> {
        Ok(WarpMessage::new(
            self.config.chain_id,
            self.config.manager_address,
            encode_payload(payload)?,
        ))
    }

    /// Commit `changes`, then consume `index`. The commit is undone if consumption fails.
    fn commit_and_consume(
        &self,
        registry: &mut ValidatorRegistry<S>,
        changes: StagedChanges,
        index: MessageIndex,
    ) -> ValidatorManagerResult<()> {
        let undo = registry.commit(changes)?;
        if let Err(err) = self.gateway.consume(index) {
            warn!(message_index = index, error = %err, "[l1-vm] Consume failed, reverting");
            registry.revert(undo).map_err(|e| {
                error!(message_index = index, error = %e, "[l1-vm] Revert failed");
                e
            })?;
            return Err(err.into());
        }
        Ok(())
    }

    /// Commit `changes`, then emit `payload`. The commit is undone if the emit fails.
    fn commit_and_emit(
        &self,
        registry: &mut ValidatorRegistry<S>,
        changes: StagedChanges,
        payload: &WarpPayload,
    ) -> ValidatorManagerResult<MessageHandle> {
        let message = self.outbound(payload)?;
        let undo = registry.commit(changes)?;
        match self.gateway.emit(message) {
            Ok(handle) => Ok(handle),
            Err(err) => {
                warn!(kind = payload.kind(), error = %err, "[l1-vm] Emit failed, reverting");
                registry.revert(undo).map_err(|e| {
                    error!(kind = payload.kind(), error = %e, "[l1-vm] Revert failed");
                    e
                })?;
                Err(err.into())
            }
        }
    }

    fn emit_only(&self, payload: &WarpPayload) -> ValidatorManagerResult<MessageHandle> {
        Ok(self.gateway.emit(self.outbound(payload)?)?)
    }

    fn observe<R>(
        &self,
        operation: &'static str,
        result: ValidatorManagerResult<R>,
    ) -> ValidatorManagerResult<R> {
        if let Err(err) = &result {
            warn!(operation, reason = err.label(), error = %err, "[l1-vm] Operation rejected");
            metrics::record_rejected(err.label());
        }
        result
    }
}

impl<S, G, E, T> ValidatorManagerApi for ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    fn subnet_id(&self) -> ChainId {
        self.config.subnet_id
    }

    fn get_validator(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<Option<Validation>> {
        Ok(self.registry.lock().get(validation_id)?)
    }

    fn get_node_validation_id(
        &self,
        node_id: &NodeId,
    ) -> ValidatorManagerResult<Option<ValidationId>> {
        Ok(self.registry.lock().node_validation(node_id)?)
    }

    fn total_weight(&self) -> u64 {
        self.registry.lock().total_weight()
    }

    fn is_initialized(&self) -> bool {
        self.registry.lock().is_initialized()
    }

    fn initialize_validator_set(
        &self,
        conversion: ConversionData,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<Vec<ValidationId>> {
        self.observe(
            "initialize_validator_set",
            self.initialize(conversion, message_index),
        )
    }

    fn complete_validator_registration(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId> {
        self.observe(
            "complete_validator_registration",
            self.complete_registration(message_index),
        )
    }

    fn complete_validator_weight_update(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId> {
        self.observe(
            "complete_validator_weight_update",
            self.complete_weight_update(message_index),
        )
    }

    fn complete_validation_invalidation(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId> {
        self.observe(
            "complete_validation_invalidation",
            self.complete_invalidation(message_index),
        )
    }

    fn resend_register_validator_message(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<MessageHandle> {
        self.observe(
            "resend_register_validator_message",
            self.resend_registration(validation_id),
        )
    }

    fn resend_validator_weight_message(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<MessageHandle> {
        self.observe(
            "resend_validator_weight_message",
            self.resend_weight_update(validation_id),
        )
    }

    fn churn_status(&self) -> Option<ChurnStatus> {
        let registry = self.registry.lock();
        let now = self.clock.now();
        registry
            .churn()
            .map(|tracker| tracker.status(now, registry.total_weight()))
    }
}

impl<S, G, E, T> ValidatorSetCoordinator for ValidatorManager<S, G, E, T>
where
    S: KeyValueStore,
    G: MessageGateway,
    E: EventSink,
    T: TimeSource,
{
    fn initiate_validator_registration(
        &self,
        request: RegistrationRequest,
    ) -> ValidatorManagerResult<ValidationId> {
        self.observe(
            "initiate_validator_registration",
            self.initiate_registration(request),
        )
    }

    fn initiate_validator_weight_update(
        &self,
        validation_id: &ValidationId,
        weight: u64,
    ) -> ValidatorManagerResult<u64> {
        self.observe(
            "initiate_validator_weight_update",
            self.initiate_weight_update(validation_id, weight),
        )
    }
}

/// Shorthand used by the operation modules.
fn not_found(validation_id: &ValidationId) -> ValidatorManagerError {
    ValidatorManagerError::ValidationNotFound {
        validation_id: *validation_id,
    }
}
