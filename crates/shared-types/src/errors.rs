//! # Error Types
//!
//! Errors reported by message gateways.

use crate::envelope::MessageIndex;
use thiserror::Error;

/// Errors from authenticating, consuming or emitting cross-ledger messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Attestation did not verify.
    #[error("Message {index} failed verification: {reason}")]
    VerificationFailed { index: MessageIndex, reason: String },

    /// The index was already consumed.
    #[error("Message {index} has already been consumed")]
    AlreadyConsumed { index: MessageIndex },

    /// Nothing was delivered at this index.
    #[error("No message at index {index}")]
    NotFound { index: MessageIndex },

    /// The relay layer refused an outbound message.
    #[error("Failed to emit message: {0}")]
    EmitFailed(String),
}

impl MessageError {
    /// Index the error refers to, if any.
    pub fn index(&self) -> Option<MessageIndex> {
        match self {
            Self::VerificationFailed { index, .. }
            | Self::AlreadyConsumed { index }
            | Self::NotFound { index } => Some(*index),
            Self::EmitFailed(_) => None,
        }
    }
}
