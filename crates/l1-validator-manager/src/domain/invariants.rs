//! # Domain Invariants
//!
//! Input rules checked before any registry mutation is staged.

use super::errors::{ValidatorManagerError, ValidatorManagerResult};
use super::value_objects::{ConversionData, PChainOwner};
use shared_types::{Address, ChainId, VerifiedMessage};

/// Default upper bound on how far in the future a registration may expire (48 hours).
pub const DEFAULT_MAX_REGISTRATION_EXPIRY_SECS: u64 = 48 * 3600;

/// Invariant: validators carry positive weight.
pub fn invariant_positive_weight(weight: u64) -> ValidatorManagerResult<()> {
    if weight == 0 {
        return Err(ValidatorManagerError::InvalidWeight { weight });
    }
    Ok(())
}

/// Invariant: `now < expiry <= now + max_window`.
pub fn invariant_expiry_window(
    expiry: u64,
    now: u64,
    max_window: u64,
) -> ValidatorManagerResult<()> {
    let max = now.saturating_add(max_window);
    if expiry <= now || expiry > max {
        return Err(ValidatorManagerError::InvalidExpiry { expiry, now, max });
    }
    Ok(())
}

/// Invariant: owner threshold is reachable and addresses are sorted and unique.
pub fn invariant_valid_owner(owner: &PChainOwner) -> ValidatorManagerResult<()> {
    let invalid = |reason: String| ValidatorManagerError::InvalidPChainOwner { reason };

    if owner.threshold as usize > owner.addresses.len() {
        return Err(invalid(format!(
            "threshold {} exceeds {} addresses",
            owner.threshold,
            owner.addresses.len()
        )));
    }
    if owner.threshold == 0 && !owner.addresses.is_empty() {
        return Err(invalid("zero threshold with non-empty addresses".to_string()));
    }
    if owner.addresses.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("addresses not strictly ascending".to_string()));
    }
    Ok(())
}

/// Invariant: conversion data targets this coordinator and is usable.
pub fn invariant_conversion_targets(
    data: &ConversionData,
    subnet_id: ChainId,
    chain_id: ChainId,
    manager_address: Address,
) -> ValidatorManagerResult<()> {
    if data.initial_validators.is_empty() {
        return Err(ValidatorManagerError::InvalidConversion {
            reason: "no initial validators".to_string(),
        });
    }
    if data.l1_id != subnet_id {
        return Err(ValidatorManagerError::ConversionMismatch {
            reason: format!("conversion is for L1 {}, coordinator manages {}", data.l1_id, subnet_id),
        });
    }
    if data.coordinator_chain_id != chain_id {
        return Err(ValidatorManagerError::ConversionMismatch {
            reason: format!(
                "conversion targets chain {}, coordinator runs on {}",
                data.coordinator_chain_id, chain_id
            ),
        });
    }
    if data.coordinator_address != manager_address {
        return Err(ValidatorManagerError::ConversionMismatch {
            reason: format!(
                "conversion targets address {}, coordinator is {}",
                data.coordinator_address, manager_address
            ),
        });
    }
    if data.total_weight().is_none() {
        return Err(ValidatorManagerError::InvalidConversion {
            reason: "total initial weight overflows".to_string(),
        });
    }
    Ok(())
}

/// Invariant: inbound messages originate from the remote ledger itself.
pub fn invariant_remote_origin(
    message: &VerifiedMessage,
    remote_ledger_id: ChainId,
) -> ValidatorManagerResult<()> {
    if message.source_chain_id != remote_ledger_id || !message.source_address.is_zero() {
        return Err(ValidatorManagerError::unexpected_source(
            message.index,
            message.source_chain_id,
            message.source_address,
        ));
    }
    Ok(())
}
