//! # Wire Codec
//!
//! Payloads exchanged with the remote ledger, their canonical `bincode`
//! encoding, and the content hashes derived from it.
//!
//! Every payload travels inside a tagged [`WarpPayload`], so bytes produced
//! for one message kind never decode as another.

use crate::domain::errors::{ValidatorManagerError, ValidatorManagerResult};
use crate::domain::value_objects::{ConversionData, PChainOwner};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{BlsPublicKey, ChainId, Hash, NodeId, ValidationId};

/// Registration request sent to the remote ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterValidatorMessage {
    pub subnet_id: ChainId,
    pub node_id: NodeId,
    pub bls_public_key: BlsPublicKey,
    pub expiry: u64,
    pub remaining_balance_owner: PChainOwner,
    pub disable_owner: PChainOwner,
    pub weight: u64,
}

/// Remote ledger accepted a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRegistrationAck {
    pub validation_id: ValidationId,
}

/// Weight change sent to the remote ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetValidatorWeightMessage {
    pub validation_id: ValidationId,
    pub nonce: u64,
    pub weight: u64,
}

/// Remote ledger applied a weight change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorWeightAck {
    pub validation_id: ValidationId,
    pub nonce: u64,
    pub weight: u64,
}

/// Remote ledger attests the hash of the L1's conversion data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionAttestation {
    pub conversion_id: Hash,
}

/// Remote ledger reports a validation will never be (or is no longer) active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationInvalidatedAck {
    pub validation_id: ValidationId,
}

/// Tagged payload carried in `WarpMessage::payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpPayload {
    RegisterValidator(RegisterValidatorMessage),
    ValidatorRegistration(ValidatorRegistrationAck),
    SetValidatorWeight(SetValidatorWeightMessage),
    ValidatorWeight(ValidatorWeightAck),
    Conversion(ConversionAttestation),
    ValidationInvalidated(ValidationInvalidatedAck),
}

impl WarpPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RegisterValidator(_) => "RegisterValidator",
            Self::ValidatorRegistration(_) => "ValidatorRegistration",
            Self::SetValidatorWeight(_) => "SetValidatorWeight",
            Self::ValidatorWeight(_) => "ValidatorWeight",
            Self::Conversion(_) => "Conversion",
            Self::ValidationInvalidated(_) => "ValidationInvalidated",
        }
    }

    fn unexpected(self, expected: &str) -> ValidatorManagerError {
        ValidatorManagerError::MalformedPayload {
            reason: format!("expected {}, got {}", expected, self.kind()),
        }
    }

    pub fn into_registration_ack(self) -> ValidatorManagerResult<ValidatorRegistrationAck> {
        match self {
            Self::ValidatorRegistration(ack) => Ok(ack),
            other => Err(other.unexpected("ValidatorRegistration")),
        }
    }

    pub fn into_weight_ack(self) -> ValidatorManagerResult<ValidatorWeightAck> {
        match self {
            Self::ValidatorWeight(ack) => Ok(ack),
            other => Err(other.unexpected("ValidatorWeight")),
        }
    }

    pub fn into_conversion(self) -> ValidatorManagerResult<ConversionAttestation> {
        match self {
            Self::Conversion(att) => Ok(att),
            other => Err(other.unexpected("Conversion")),
        }
    }

    pub fn into_invalidation(self) -> ValidatorManagerResult<ValidationInvalidatedAck> {
        match self {
            Self::ValidationInvalidated(ack) => Ok(ack),
            other => Err(other.unexpected("ValidationInvalidated")),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> ValidatorManagerResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| ValidatorManagerError::MalformedPayload {
        reason: format!("encode: {}", e),
    })
}

fn sha256(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Canonical bytes of a payload.
pub fn encode_payload(payload: &WarpPayload) -> ValidatorManagerResult<Vec<u8>> {
    encode(payload)
}

/// Decode payload bytes; trailing or truncated input is rejected.
pub fn decode_payload(bytes: &[u8]) -> ValidatorManagerResult<WarpPayload> {
    use bincode::Options;

    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .deserialize(bytes)
        .map_err(|e| ValidatorManagerError::MalformedPayload {
            reason: e.to_string(),
        })
}

/// Content hash of a registration request.
pub fn validation_id(request: &RegisterValidatorMessage) -> ValidatorManagerResult<ValidationId> {
    Ok(ValidationId(sha256(&encode(request)?)))
}

/// Content hash of conversion data.
pub fn conversion_id(data: &ConversionData) -> ValidatorManagerResult<Hash> {
    Ok(sha256(&encode(data)?))
}

/// Validation ID of the `index`-th genesis validator of `l1_id`.
pub fn genesis_validation_id(l1_id: ChainId, index: u32) -> ValidationId {
    let mut preimage = [0u8; 36];
    preimage[..32].copy_from_slice(&l1_id.0);
    preimage[32..].copy_from_slice(&index.to_be_bytes());
    ValidationId(sha256(&preimage))
}
