//! # Lifecycle Flows
//!
//! Genesis, registration, weight changes and removal driven end to end, with
//! the simulated remote ledger answering every emitted message.
//!
//! ## Flows Tested:
//!
//! 1. **Genesis**: attested conversion seeds the set exactly once
//! 2. **Registration**: PendingAdded → Active after the remote ack
//! 3. **Weight**: nonce-ordered updates, zero weight removes
//! 4. **PoA**: only the owner reaches the restricted operations

#[cfg(test)]
mod tests {
    use crate::ledger::*;
    use l1_validator_manager::prelude::*;

    fn deployment() -> Deployment<InMemoryKVStore> {
        Deployment::new(config(), InMemoryKVStore::new())
    }

    fn seeded() -> Deployment<InMemoryKVStore> {
        Deployment::seeded(config(), InMemoryKVStore::new())
    }

    // =============================================================================
    // GENESIS
    // =============================================================================

    #[test]
    fn test_genesis_matches_remote_ledger() {
        let mut d = deployment();
        let ids = d.genesis(&[40, 60, 100]);

        assert_eq!(d.manager.total_weight(), 200);
        assert_eq!(d.manager.total_weight(), d.ledger.total_weight());
        for id in &ids {
            assert_eq!(
                d.manager.get_validator(id).unwrap().unwrap().weight,
                d.ledger.weight_of(id).unwrap()
            );
        }

        let data = conversion(&[40, 60, 100]);
        let index = d.ledger.convert(&data);
        assert_eq!(
            d.manager.initialize_validator_set(data, index),
            Err(ValidatorManagerError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_registration_waits_for_genesis() {
        let mut d = deployment();
        assert_eq!(
            d.manager
                .initiate_validator_registration(request(0xF0, 5, NOW)),
            Err(ValidatorManagerError::NotInitialized)
        );
        assert!(d.gateway.outbox().is_empty());

        d.genesis(&[10, 20]);
        d.register(1, 5);
        assert_eq!(d.manager.total_weight(), 35);
        assert_eq!(d.manager.total_weight(), d.ledger.total_weight());
    }

    // =============================================================================
    // REGISTRATION AND WEIGHT
    // =============================================================================

    #[test]
    fn test_register_update_remove() {
        let mut d = seeded();
        let a = d.register(1, 100);
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT + 100);

        assert_eq!(d.set_weight(&a, 150), 1);
        let record = d.manager.get_validator(&a).unwrap().unwrap();
        assert_eq!(record.weight, 150);
        assert_eq!(record.status, ValidationStatus::Active);
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT + 150);

        d.clock.advance(120);
        assert_eq!(d.set_weight(&a, 0), 2);
        let record = d.manager.get_validator(&a).unwrap().unwrap();
        assert_eq!(record.status, ValidationStatus::Completed);
        assert_eq!(record.end_time, Some(NOW + 120));
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT);
        assert_eq!(d.ledger.total_weight(), SEED_WEIGHT);
    }

    #[test]
    fn test_mixed_set_tracks_remote_total() {
        let mut d = deployment();
        let genesis = d.genesis(&[500, 500]);
        let a = d.register(1, 100);
        let b = d.register(2, 200);

        d.set_weight(&genesis[0], 450);
        d.set_weight(&a, 0);
        d.set_weight(&b, 250);

        assert_eq!(d.manager.total_weight(), 450 + 500 + 250);
        assert_eq!(d.manager.total_weight(), d.ledger.total_weight());
        assert_eq!(d.manager.get_node_validation_id(&node(1)).unwrap(), None);
        assert_eq!(d.manager.get_node_validation_id(&node(2)).unwrap(), Some(b));
    }

    #[test]
    fn test_events_describe_every_step() {
        let mut d = deployment();
        d.genesis(&[10]);
        let a = d.register(1, 5);
        d.set_weight(&a, 0);

        let names: Vec<_> = d.events.events().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "GenesisValidatorRegistered",
                "RegistrationInitiated",
                "RegistrationCompleted",
                "WeightUpdateInitiated",
                "WeightUpdateCompleted",
            ]
        );
        assert!(d.events.events()[1..]
            .iter()
            .all(|e| e.node_id() == node(1)));
    }

    #[test]
    fn test_removal_pending_until_acknowledged() {
        let mut d = seeded();
        let a = d.register(1, 100);

        d.manager.initiate_validator_weight_update(&a, 0).unwrap();
        assert_eq!(
            d.manager.get_validator(&a).unwrap().unwrap().status,
            ValidationStatus::PendingRemoved
        );
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT + 100);

        for result in d.relay() {
            result.unwrap();
        }
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT);
    }

    // =============================================================================
    // INVALIDATION
    // =============================================================================

    #[test]
    fn test_remote_invalidation_drops_weight() {
        let mut d = deployment();
        d.genesis(&[100]);
        let a = d.register(1, 50);

        let index = d.ledger.invalidate(a);
        assert_eq!(d.manager.complete_validation_invalidation(index), Ok(a));
        assert_eq!(d.manager.total_weight(), 100);
        assert_eq!(d.manager.total_weight(), d.ledger.total_weight());
        assert!(matches!(
            d.manager.initiate_validator_weight_update(&a, 10),
            Err(ValidatorManagerError::InvalidTransition {
                from: ValidationStatus::Invalidated,
                ..
            })
        ));
    }

    // =============================================================================
    // PROOF OF AUTHORITY
    // =============================================================================

    #[test]
    fn test_poa_owner_drives_membership() {
        let mut d = seeded();
        let owner = Address([0x0A; 20]);
        let stranger = Address([0x0B; 20]);
        let poa = PoAValidatorManager::new(d.manager.clone(), owner);

        assert_eq!(
            poa.initiate_validator_registration(stranger, request(1, 10, NOW)),
            Err(ValidatorManagerError::Unauthorized { caller: stranger })
        );
        assert!(d.gateway.outbox().is_empty());

        let id = poa
            .initiate_validator_registration(owner, request(1, 10, NOW))
            .unwrap();
        for result in d.relay() {
            result.unwrap();
        }
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT + 10);

        poa.transfer_ownership(owner, stranger).unwrap();
        assert!(poa.initiate_validator_removal(owner, &id).is_err());
        assert_eq!(poa.initiate_validator_removal(stranger, &id), Ok(1));
        for result in d.relay() {
            result.unwrap();
        }
        assert_eq!(d.manager.total_weight(), SEED_WEIGHT);
    }
}
