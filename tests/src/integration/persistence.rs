//! # Persistence Across Restarts
//!
//! The registry, genesis flag and churn window live in the key-value store.
//! A manager reopened over the same file must pick up exactly where the last
//! one stopped, including handshakes still in flight.

#[cfg(test)]
mod tests {
    use crate::ledger::*;
    use l1_validator_manager::prelude::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> FileBackedKVStore {
        FileBackedKVStore::open(dir.path().join("registry.kv")).unwrap()
    }

    #[test]
    fn test_in_flight_handshake_survives_restart() {
        let dir = TempDir::new().unwrap();
        let mut d = Deployment::new(config(), open(&dir));
        let genesis = d.genesis(&[300]);
        let a = d.register(1, 100);
        d.manager.initiate_validator_weight_update(&a, 60).unwrap();

        let mut d = d.restart_over(open(&dir));
        assert!(d.manager.is_initialized());
        assert_eq!(d.manager.total_weight(), 400);
        let record = d.manager.get_validator(&a).unwrap().unwrap();
        assert_eq!(record.message_nonce, 1);
        assert_eq!(record.pending_weight, Some(60));

        for result in d.relay() {
            result.unwrap();
        }
        assert_eq!(d.manager.total_weight(), 360);

        let data = conversion(&[300]);
        let index = d.ledger.convert(&data);
        assert_eq!(
            d.manager.initialize_validator_set(data, index),
            Err(ValidatorManagerError::AlreadyInitialized)
        );
        assert_eq!(
            d.manager.get_node_validation_id(&NodeId([0xF0; 20])).unwrap(),
            Some(genesis[0])
        );
    }

    #[test]
    fn test_churn_window_survives_restart() {
        let churn = ChurnConfig {
            period_secs: 600,
            max_churn_percent: 10,
        };
        let dir = TempDir::new().unwrap();
        let mut d = Deployment::new(config().with_churn(churn), open(&dir));
        d.genesis(&[1_000]);
        d.register(1, 60);

        let d = d.restart_over(open(&dir));
        assert_eq!(d.manager.churn_status().unwrap().window_churn, 60);
        assert_eq!(
            d.manager
                .initiate_validator_registration(request(2, 50, d.now())),
            Err(ValidatorManagerError::ChurnLimitExceeded {
                churn: 110,
                limit: 106
            })
        );

        d.clock.advance(600);
        assert_eq!(d.manager.churn_status().unwrap().window_churn, 0);
        d.manager
            .initiate_validator_registration(request(2, 50, d.now()))
            .unwrap();
    }

    #[test]
    fn test_churn_disabled_ignores_stored_window() {
        let churn = ChurnConfig {
            period_secs: 600,
            max_churn_percent: 10,
        };
        let dir = TempDir::new().unwrap();
        let mut d = Deployment::new(config().with_churn(churn), open(&dir));
        d.genesis(&[1_000]);
        d.register(1, 100);

        let mut d = Deployment::new(config(), open(&dir));
        assert!(d.manager.churn_status().is_none());
        d.register(2, 500);
        assert_eq!(d.manager.total_weight(), 1_600);
    }

    #[test]
    fn test_corrupt_store_refuses_to_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.kv");
        std::fs::write(&path, b"not a registry").unwrap();
        assert!(FileBackedKVStore::open(&path).is_err());
    }
}
