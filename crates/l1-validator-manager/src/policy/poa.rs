//! Proof-of-authority policy: a single owner drives membership.

use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::domain::value_objects::RegistrationRequest;
use crate::ports::inbound::ValidatorSetCoordinator;
use l1_telemetry::log_event;
use parking_lot::RwLock;
use shared_types::{Address, ValidationId};
use std::sync::Arc;

/// Owner-gated access to the restricted coordinator operations.
pub struct PoAValidatorManager<C: ValidatorSetCoordinator> {
    core: Arc<C>,
    owner: RwLock<Address>,
}

impl<C: ValidatorSetCoordinator> PoAValidatorManager<C> {
    pub fn new(core: Arc<C>, owner: Address) -> Self {
        Self {
            core,
            owner: RwLock::new(owner),
        }
    }

    pub fn owner(&self) -> Address {
        *self.owner.read()
    }

    fn authorize(&self, caller: Address) -> ValidatorManagerResult<()> {
        if caller != *self.owner.read() {
            return Err(ValidatorManagerError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`. Only the current owner may call this.
    pub fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> ValidatorManagerResult<()> {
        let mut owner = self.owner.write();
        if caller != *owner {
            return Err(ValidatorManagerError::Unauthorized { caller });
        }
        let previous = *owner;
        *owner = new_owner;
        log_event!(
            info,
            "poa",
            "[l1-vm] 🔑 Ownership transferred",
            from = %previous,
            to = %new_owner
        );
        Ok(())
    }

    pub fn initiate_validator_registration(
        &self,
        caller: Address,
        request: RegistrationRequest,
    ) -> ValidatorManagerResult<ValidationId> {
        self.authorize(caller)?;
        self.core.initiate_validator_registration(request)
    }

    pub fn initiate_validator_weight_update(
        &self,
        caller: Address,
        validation_id: &ValidationId,
        weight: u64,
    ) -> ValidatorManagerResult<u64> {
        self.authorize(caller)?;
        self.core.initiate_validator_weight_update(validation_id, weight)
    }

    /// Start removing a validator: a weight update to zero.
    pub fn initiate_validator_removal(
        &self,
        caller: Address,
        validation_id: &ValidationId,
    ) -> ValidatorManagerResult<u64> {
        self.initiate_validator_weight_update(caller, validation_id, 0)
    }
}
