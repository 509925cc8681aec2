//! # Algorithms Module
//!
//! Canonical wire encoding and identifier derivation.

pub mod codec;

pub use codec::{
    conversion_id, decode_payload, encode_payload, genesis_validation_id, validation_id,
    ConversionAttestation, RegisterValidatorMessage, SetValidatorWeightMessage,
    ValidationInvalidatedAck, ValidatorRegistrationAck, ValidatorWeightAck, WarpPayload,
};
