//! # Validator Manager Metrics
//!
//! Prometheus metrics for the validator-set lifecycle.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! l1-validator-manager = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `l1vm_registrations_initiated_total`
//! - `l1vm_registrations_completed_total`
//! - `l1vm_weight_updates_initiated_total`
//! - `l1vm_weight_updates_completed_total`
//! - `l1vm_invalidations_total`
//! - `l1vm_operations_rejected_total` - by reason
//! - `l1vm_total_weight` - gauge

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter, IntCounterVec,
    IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref REGISTRATIONS_INITIATED: IntCounter = register_int_counter!(
        "l1vm_registrations_initiated_total",
        "Registration requests emitted to the remote ledger"
    )
    .expect("Failed to create REGISTRATIONS_INITIATED metric");

    pub static ref REGISTRATIONS_COMPLETED: IntCounter = register_int_counter!(
        "l1vm_registrations_completed_total",
        "Registrations activated from remote acknowledgments"
    )
    .expect("Failed to create REGISTRATIONS_COMPLETED metric");

    pub static ref WEIGHT_UPDATES_INITIATED: IntCounter = register_int_counter!(
        "l1vm_weight_updates_initiated_total",
        "Weight updates emitted to the remote ledger"
    )
    .expect("Failed to create WEIGHT_UPDATES_INITIATED metric");

    pub static ref WEIGHT_UPDATES_COMPLETED: IntCounter = register_int_counter!(
        "l1vm_weight_updates_completed_total",
        "Weight updates applied from remote acknowledgments"
    )
    .expect("Failed to create WEIGHT_UPDATES_COMPLETED metric");

    pub static ref INVALIDATIONS: IntCounter = register_int_counter!(
        "l1vm_invalidations_total",
        "Validations invalidated by the remote ledger"
    )
    .expect("Failed to create INVALIDATIONS metric");

    /// Rejected operations, labeled by error kind
    pub static ref OPERATIONS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "l1vm_operations_rejected_total",
        "Operations rejected by the validator manager",
        &["reason"]
    )
    .expect("Failed to create OPERATIONS_REJECTED metric");

    pub static ref TOTAL_WEIGHT: IntGauge = register_int_gauge!(
        "l1vm_total_weight",
        "Sum of weights of Active and PendingRemoved validations"
    )
    .expect("Failed to create TOTAL_WEIGHT metric");
}

#[cfg(feature = "metrics")]
pub fn record_registration_initiated() {
    REGISTRATIONS_INITIATED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_registration_completed() {
    REGISTRATIONS_COMPLETED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_weight_update_initiated() {
    WEIGHT_UPDATES_INITIATED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_weight_update_completed() {
    WEIGHT_UPDATES_COMPLETED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_invalidation() {
    INVALIDATIONS.inc();
}

/// Record a rejected operation with reason
#[cfg(feature = "metrics")]
pub fn record_rejected(reason: &str) {
    OPERATIONS_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn set_total_weight(weight: u64) {
    TOTAL_WEIGHT.set(i64::try_from(weight).unwrap_or(i64::MAX));
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_registration_initiated() {}

#[cfg(not(feature = "metrics"))]
pub fn record_registration_completed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_weight_update_initiated() {}

#[cfg(not(feature = "metrics"))]
pub fn record_weight_update_completed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_invalidation() {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_total_weight(_weight: u64) {}
