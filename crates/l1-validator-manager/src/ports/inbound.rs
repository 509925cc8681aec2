//! # Inbound Ports (Driving Ports)
//!
//! `ValidatorManagerApi` is the open surface any caller (relayers, RPC,
//! indexers) may use. `ValidatorSetCoordinator` holds the restricted
//! `initiate_*` operations; only policy modules composed with the core get
//! to call it.

use crate::domain::churn::ChurnStatus;
use crate::domain::entities::Validation;
use crate::domain::errors::ValidatorManagerResult;
use crate::domain::value_objects::{ConversionData, RegistrationRequest};
use shared_types::{ChainId, MessageHandle, MessageIndex, NodeId, ValidationId};

/// Open entry points of the validator manager.
pub trait ValidatorManagerApi: Send + Sync {
    /// The L1 whose validator set this coordinator manages.
    fn subnet_id(&self) -> ChainId;

    /// Look up a validation. `Ok(None)` when unknown.
    fn get_validator(&self, validation_id: &ValidationId) -> ValidatorManagerResult<Option<Validation>>;

    /// Live validation of `node_id`, if any.
    fn get_node_validation_id(&self, node_id: &NodeId) -> ValidatorManagerResult<Option<ValidationId>>;

    /// Sum of weights of `Active` and `PendingRemoved` validations.
    fn total_weight(&self) -> u64;

    /// Whether genesis bootstrapping has run.
    fn is_initialized(&self) -> bool;

    /// Seed the validator set from attested conversion data. Runs once.
    fn initialize_validator_set(
        &self,
        conversion: ConversionData,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<Vec<ValidationId>>;

    /// Activate a `PendingAdded` validation from the remote ledger's ack.
    fn complete_validator_registration(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId>;

    /// Apply the acknowledged outstanding weight update.
    fn complete_validator_weight_update(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId>;

    /// Mark a validation `Invalidated` on the remote ledger's report.
    fn complete_validation_invalidation(
        &self,
        message_index: MessageIndex,
    ) -> ValidatorManagerResult<ValidationId>;

    /// Re-emit the registration request of a `PendingAdded` validation.
    fn resend_register_validator_message(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<MessageHandle>;

    /// Re-emit the outstanding weight update of a validation.
    fn resend_validator_weight_message(
        &self,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<MessageHandle>;

    /// Churn window snapshot, `None` when churn limiting is disabled.
    fn churn_status(&self) -> Option<ChurnStatus>;
}

/// Restricted operations, reachable only through a policy module.
pub trait ValidatorSetCoordinator: Send + Sync {
    /// Propose a new validator to the remote ledger.
    fn initiate_validator_registration(
        &self,
        request: RegistrationRequest,
    ) -> ValidatorManagerResult<ValidationId>;

    /// Propose a new weight (zero removes) for an active validation.
    /// Returns the nonce of the update.
    fn initiate_validator_weight_update(
        &self,
        validation_id: &ValidationId,
        weight: u64,
    ) -> ValidatorManagerResult<u64>;
}
