//! # Validator Manager Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Registration handshake (initiate + ack + complete) | < 100µs |
//! | Weight handshake | < 100µs |
//! | Payload decode | < 5µs |
//! | Churn check over a full window | < 50µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use l1_tests::ledger::{config, request, Deployment};
use l1_validator_manager::prelude::*;
use l1_validator_manager::ChurnTracker;
use rand::Rng;
use std::time::Duration;

// ============================================================================
// Handshakes
// ============================================================================

fn bench_registration_handshake(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("initiate_and_complete", |b| {
        let mut d = Deployment::seeded(config(), InMemoryKVStore::new());
        let mut counter: u32 = 0;
        b.iter(|| {
            counter = counter.wrapping_add(1);
            let mut req = request(1, 10, d.now());
            let mut node = [0u8; 20];
            node[..4].copy_from_slice(&counter.to_be_bytes());
            req.node_id = NodeId(node);
            let id = d.manager.initiate_validator_registration(req).unwrap();
            for result in d.relay() {
                black_box(result.unwrap());
            }
            black_box(id)
        })
    });

    group.finish();
}

fn bench_weight_handshake(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight");
    group.measurement_time(Duration::from_secs(10));

    let mut d = Deployment::new(config(), InMemoryKVStore::new());
    let ids = d.genesis(&[1_000, 1_000, 1_000, 1_000]);
    let mut rng = rand::thread_rng();

    group.bench_function("update_and_complete", |b| {
        b.iter(|| {
            let id = ids[rng.gen_range(0..ids.len())];
            black_box(d.set_weight(&id, rng.gen_range(500..=1_500)))
        })
    });

    group.finish();
}

// ============================================================================
// Codec and churn
// ============================================================================

fn bench_payload_decode(c: &mut Criterion) {
    let payload = WarpPayload::RegisterValidator(RegisterValidatorMessage {
        subnet_id: ChainId([1; 32]),
        node_id: NodeId([2; 20]),
        bls_public_key: BlsPublicKey([3; 48]),
        expiry: 1_700_000_000,
        remaining_balance_owner: PChainOwner::single(Address([4; 20])),
        disable_owner: PChainOwner::single(Address([5; 20])),
        weight: 100,
    });
    let bytes = encode_payload(&payload).unwrap();

    c.bench_function("decode_register_validator", |b| {
        b.iter(|| black_box(decode_payload(black_box(&bytes)).unwrap()))
    });
}

fn bench_churn_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for entries in [10u64, 100, 1_000] {
        let mut tracker = ChurnTracker::new(ChurnConfig {
            period_secs: 3_600,
            max_churn_percent: 100,
        });
        for t in 0..entries {
            tracker.check_and_record(t, 0, 1, u64::MAX).unwrap();
        }

        group.throughput(Throughput::Elements(entries));
        group.bench_with_input(BenchmarkId::new("window_churn", entries), &entries, |b, &n| {
            b.iter(|| black_box(tracker.window_churn(n)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_registration_handshake,
    bench_weight_handshake,
    bench_payload_decode,
    bench_churn_check
);
criterion_main!(benches);
