//! # Value Objects
//!
//! Immutable inputs to the coordinator: owner descriptors, genesis conversion
//! data and registration requests.

use serde::{Deserialize, Serialize};
use shared_types::{Address, BlsPublicKey, ChainId, NodeId};

/// Authorization descriptor for remote-side balance and disable ownership.
///
/// Passed through to the remote ledger untouched; the coordinator only checks
/// that it is well formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PChainOwner {
    /// Signatures required out of `addresses`.
    pub threshold: u32,
    /// Owner addresses, strictly ascending.
    pub addresses: Vec<Address>,
}

impl PChainOwner {
    /// Create an owner descriptor.
    pub fn new(threshold: u32, addresses: Vec<Address>) -> Self {
        Self {
            threshold,
            addresses,
        }
    }

    /// Single-address owner with threshold 1.
    pub fn single(address: Address) -> Self {
        Self::new(1, vec![address])
    }
}

/// One validator seeded at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialValidator {
    pub node_id: NodeId,
    pub bls_public_key: BlsPublicKey,
    pub weight: u64,
}

/// Genesis payload attested by the remote ledger when the L1 was converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionData {
    /// The L1 being converted.
    pub l1_id: ChainId,
    /// Chain hosting this coordinator.
    pub coordinator_chain_id: ChainId,
    /// Address of this coordinator on that chain.
    pub coordinator_address: Address,
    /// Initial validator set, in attested order.
    pub initial_validators: Vec<InitialValidator>,
}

impl ConversionData {
    /// Sum of initial weights, `None` on overflow.
    pub fn total_weight(&self) -> Option<u64> {
        self.initial_validators
            .iter()
            .try_fold(0u64, |acc, v| acc.checked_add(v.weight))
    }
}

/// Parameters of a new registration, as supplied by a policy module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub node_id: NodeId,
    pub bls_public_key: BlsPublicKey,
    /// Unix seconds after which the remote ledger ignores the request.
    pub expiry: u64,
    pub remaining_balance_owner: PChainOwner,
    pub disable_owner: PChainOwner,
    pub weight: u64,
}
