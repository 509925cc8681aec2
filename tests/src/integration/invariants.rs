//! # Total-Weight Invariant
//!
//! Randomized sequences of registrations, weight changes, invalidations and
//! acknowledgment deliveries (in order, reordered, replayed or lost). After
//! every step the running total must equal the sum of weights of validations
//! that are `Active` or `PendingRemoved`.

#[cfg(test)]
mod tests {
    use crate::ledger::*;
    use l1_validator_manager::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn counted_sum(d: &Deployment<InMemoryKVStore>, ids: &[ValidationId]) -> u64 {
        ids.iter()
            .filter_map(|id| d.manager.get_validator(id).unwrap())
            .filter(|v| {
                matches!(
                    v.status,
                    ValidationStatus::Active | ValidationStatus::PendingRemoved
                )
            })
            .map(|v| v.weight)
            .sum()
    }

    fn run_sequence(seed: u64, steps: usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut d = Deployment::new(config(), InMemoryKVStore::new());
        let mut ids = d.genesis(&[rng.gen_range(1..=100), rng.gen_range(1..=100)]);
        let mut inflight: Vec<Acknowledgment> = Vec::new();
        let mut next_node: u8 = 1;

        for step in 0..steps {
            match rng.gen_range(0..6) {
                0 => {
                    let weight = rng.gen_range(1..=100);
                    if let Ok(id) = d
                        .manager
                        .initiate_validator_registration(request(next_node, weight, d.now()))
                    {
                        ids.push(id);
                    }
                    next_node = next_node.wrapping_add(1).max(1);
                }
                1 if !ids.is_empty() => {
                    let id = ids[rng.gen_range(0..ids.len())];
                    let weight = if rng.gen_bool(0.2) {
                        0
                    } else {
                        rng.gen_range(1..=100)
                    };
                    let _ = d.manager.initiate_validator_weight_update(&id, weight);
                }
                2 if !ids.is_empty() && rng.gen_bool(0.3) => {
                    let id = ids[rng.gen_range(0..ids.len())];
                    let index = d.ledger.invalidate(id);
                    let _ = d.manager.complete_validation_invalidation(index);
                }
                3 if !ids.is_empty() => {
                    let id = ids[rng.gen_range(0..ids.len())];
                    let _ = d.manager.resend_validator_weight_message(&id);
                    let _ = d.manager.resend_register_validator_message(&id);
                }
                _ => {}
            }

            inflight.extend(d.ledger.process_outbox());
            if !inflight.is_empty() && rng.gen_bool(0.6) {
                let pick = rng.gen_range(0..inflight.len());
                let ack = if rng.gen_bool(0.8) {
                    inflight.swap_remove(pick)
                } else {
                    // delivered but kept around for a replay later
                    inflight[pick]
                };
                if rng.gen_bool(0.9) {
                    let _ = d.complete(&ack);
                }
            }

            d.clock.advance(rng.gen_range(0..30));
            assert_eq!(
                d.manager.total_weight(),
                counted_sum(&d, &ids),
                "seed {} diverged at step {}",
                seed,
                step
            );
        }
    }

    #[test]
    fn test_total_weight_invariant_random_sequences() {
        for seed in 0..16 {
            run_sequence(seed, 200);
        }
    }

    #[test]
    fn test_failed_calls_leave_total_unchanged() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut d = Deployment::new(config(), InMemoryKVStore::new());
        let ids = d.genesis(&[100, 200]);

        for _ in 0..50 {
            let before = d.manager.total_weight();
            d.gateway.set_emit_failure(true);
            let id = ids[rng.gen_range(0..ids.len())];
            assert!(d
                .manager
                .initiate_validator_weight_update(&id, rng.gen_range(0..=300))
                .is_err());
            assert!(d
                .manager
                .initiate_validator_registration(request(rng.gen_range(1..=200), 10, d.now()))
                .is_err());
            d.gateway.set_emit_failure(false);

            assert_eq!(d.manager.total_weight(), before);
            for id in &ids {
                let v = d.manager.get_validator(id).unwrap().unwrap();
                assert_eq!(v.message_nonce, 0);
                assert_eq!(v.pending_weight, None);
            }
        }
        assert!(d.events.events().iter().all(|e| e.name() == "GenesisValidatorRegistered"));
    }
}
