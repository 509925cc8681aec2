//! Key layout of the registry inside the key-value store.

use shared_types::{NodeId, ValidationId};

/// `v/<validation_id>` -> bincode `Validation`
pub const VALIDATION_PREFIX: &[u8] = b"v/";
/// `n/<node_id>` -> live `ValidationId`
pub const NODE_PREFIX: &[u8] = b"n/";
/// Running total of counted weight (u64 BE).
pub const TOTAL_WEIGHT_KEY: &[u8] = b"m/total_weight";
/// Present once genesis has run.
pub const GENESIS_KEY: &[u8] = b"m/genesis";
/// bincode `ChurnTracker`
pub const CHURN_KEY: &[u8] = b"m/churn";

pub fn validation_key(id: &ValidationId) -> Vec<u8> {
    [VALIDATION_PREFIX, id.as_bytes()].concat()
}

pub fn node_key(node: &NodeId) -> Vec<u8> {
    [NODE_PREFIX, node.as_bytes()].concat()
}

/// Printable form of a key for error messages.
pub fn display_key(key: &[u8]) -> String {
    if key.starts_with(VALIDATION_PREFIX) || key.starts_with(NODE_PREFIX) {
        format!(
            "{}{}",
            String::from_utf8_lossy(&key[..2]),
            hex::encode(&key[2..])
        )
    } else {
        String::from_utf8_lossy(key).into_owned()
    }
}
