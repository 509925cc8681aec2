//! Error types for the validator manager.

use super::entities::ValidationStatus;
use crate::config::ConfigError;
use shared_types::{Address, ChainId, MessageError, MessageIndex, NodeId, ValidationId};
use thiserror::Error;

/// Errors reported by the key-value backend and the registry codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    Io { message: String },

    /// A stored record could not be decoded.
    #[error("Corrupted record under key {key}: {message}")]
    Corrupted { key: String, message: String },

    /// A record could not be encoded for storage.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Validator manager errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorManagerError {
    /// Genesis bootstrapping has already run.
    #[error("Validator set already initialized")]
    AlreadyInitialized,

    /// Genesis has not run yet; the set cannot change before it does.
    #[error("Validator set not initialized")]
    NotInitialized,

    /// Conversion data does not match the attested conversion or this coordinator.
    #[error("Conversion mismatch: {reason}")]
    ConversionMismatch { reason: String },

    /// Conversion data is structurally unusable.
    #[error("Invalid conversion data: {reason}")]
    InvalidConversion { reason: String },

    /// A validation with this ID already exists.
    #[error("Duplicate validation ID: {validation_id}")]
    DuplicateValidationId { validation_id: ValidationId },

    /// No validation with this ID.
    #[error("Validation not found: {validation_id}")]
    ValidationNotFound { validation_id: ValidationId },

    /// The node already has a live validation.
    #[error("Node {node_id} already registered under {validation_id}")]
    NodeAlreadyRegistered {
        node_id: NodeId,
        validation_id: ValidationId,
    },

    /// Illegal status transition.
    #[error("Invalid transition for {validation_id}: {from:?} -> {to:?}")]
    InvalidTransition {
        validation_id: ValidationId,
        from: ValidationStatus,
        to: ValidationStatus,
    },

    /// Weight is zero where a positive weight is required, or overflows the total.
    #[error("Invalid weight: {weight}")]
    InvalidWeight { weight: u64 },

    /// Registration expiry outside the accepted window.
    #[error("Invalid expiry {expiry}: must be in ({now}, {max}]")]
    InvalidExpiry { expiry: u64, now: u64, max: u64 },

    /// Malformed balance/disable owner.
    #[error("Invalid PChainOwner: {reason}")]
    InvalidPChainOwner { reason: String },

    /// A weight update is already outstanding for this validation.
    #[error("Weight update already pending for {validation_id} (nonce {nonce})")]
    WeightUpdatePending {
        validation_id: ValidationId,
        nonce: u64,
    },

    /// Acknowledgment nonce does not match the outstanding update.
    #[error("Stale nonce for {validation_id}: expected {expected:?}, got {received}")]
    StaleNonce {
        validation_id: ValidationId,
        expected: Option<u64>,
        received: u64,
    },

    /// Acknowledged weight differs from the pending target.
    #[error("Weight mismatch for {validation_id}: pending {expected}, acknowledged {received}")]
    WeightMismatch {
        validation_id: ValidationId,
        expected: u64,
        received: u64,
    },

    /// Inbound message failed authentication or came from the wrong source.
    #[error("Message {index} verification failed: {reason}")]
    MessageVerificationFailed { index: MessageIndex, reason: String },

    /// Inbound message index was already consumed.
    #[error("Message {index} already consumed")]
    MessageAlreadyConsumed { index: MessageIndex },

    /// Payload bytes could not be decoded into the expected message kind.
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// Applying the change would exceed the churn limit.
    #[error("Churn limit exceeded: {churn} > {limit}")]
    ChurnLimitExceeded { churn: u64, limit: u64 },

    /// Caller is not allowed to drive the restricted operations.
    #[error("Unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    /// Outbound message could not be handed to the relay layer.
    #[error("Failed to emit message: {reason}")]
    EmitFailed { reason: String },

    /// Backend failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration rejected at startup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ValidatorManagerError {
    /// Whether resubmitting (possibly with fresh inputs) can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::StaleNonce { .. }
                | Self::MessageVerificationFailed { .. }
                | Self::ChurnLimitExceeded { .. }
                | Self::EmitFailed { .. }
                | Self::Storage(_)
        )
    }

    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyInitialized => "already_initialized",
            Self::NotInitialized => "not_initialized",
            Self::ConversionMismatch { .. } => "conversion_mismatch",
            Self::InvalidConversion { .. } => "invalid_conversion",
            Self::DuplicateValidationId { .. } => "duplicate_validation_id",
            Self::ValidationNotFound { .. } => "validation_not_found",
            Self::NodeAlreadyRegistered { .. } => "node_already_registered",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidWeight { .. } => "invalid_weight",
            Self::InvalidExpiry { .. } => "invalid_expiry",
            Self::InvalidPChainOwner { .. } => "invalid_pchain_owner",
            Self::WeightUpdatePending { .. } => "weight_update_pending",
            Self::StaleNonce { .. } => "stale_nonce",
            Self::WeightMismatch { .. } => "weight_mismatch",
            Self::MessageVerificationFailed { .. } => "message_verification_failed",
            Self::MessageAlreadyConsumed { .. } => "message_already_consumed",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::ChurnLimitExceeded { .. } => "churn_limit_exceeded",
            Self::Unauthorized { .. } => "unauthorized",
            Self::EmitFailed { .. } => "emit_failed",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
        }
    }

    /// Verification failure for a message from an unexpected origin.
    pub fn unexpected_source(index: MessageIndex, chain: ChainId, address: Address) -> Self {
        Self::MessageVerificationFailed {
            index,
            reason: format!("unexpected source {}/{}", chain, address),
        }
    }
}

impl From<MessageError> for ValidatorManagerError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::VerificationFailed { index, reason } => {
                Self::MessageVerificationFailed { index, reason }
            }
            MessageError::NotFound { index } => Self::MessageVerificationFailed {
                index,
                reason: "no message at index".to_string(),
            },
            MessageError::AlreadyConsumed { index } => Self::MessageAlreadyConsumed { index },
            MessageError::EmitFailed(reason) => Self::EmitFailed { reason },
        }
    }
}

/// Result type for validator manager operations
pub type ValidatorManagerResult<T> = Result<T, ValidatorManagerError>;
