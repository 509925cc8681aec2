//! # `WarpMessage` Envelope
//!
//! The wrapper for every message that crosses between the local chain and the
//! remote ledger.
//!
//! ## Security Properties
//!
//! - **Origin**: `source_chain_id` and `source_address` identify who produced
//!   the payload. Receivers MUST check them against the party they expect.
//! - **Opaque payload**: the envelope never interprets `payload`; decoding is
//!   the receiving subsystem's job.
//! - **Single consumption**: inbound messages are addressed by a
//!   `MessageIndex` and a gateway consumes each index at most once.

use crate::entities::{Address, ChainId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use uuid::Uuid;

/// Position of an inbound message in the gateway's inbox.
pub type MessageIndex = u32;

/// Unsigned cross-ledger message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpMessage {
    /// Chain that produced the message.
    pub source_chain_id: ChainId,
    /// Sender on the source chain (zero for the remote ledger itself).
    pub source_address: Address,
    /// Encoded payload.
    pub payload: Vec<u8>,
}

impl WarpMessage {
    /// Create a new message.
    pub fn new(source_chain_id: ChainId, source_address: Address, payload: Vec<u8>) -> Self {
        Self {
            source_chain_id,
            source_address,
            payload,
        }
    }

    /// Bytes covered by an attestation.
    ///
    /// Layout: `chain_id (32) ‖ address (20) ‖ payload_len (u32 BE) ‖ payload`.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(56 + self.payload.len());
        bytes.extend_from_slice(&self.source_chain_id.0);
        bytes.extend_from_slice(&self.source_address.0);
        bytes.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

/// A message together with its attestation.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedWarpMessage {
    /// The attested message.
    pub message: WarpMessage,
    /// Attestation tag over `message.signing_bytes()`.
    #[serde_as(as = "Bytes")]
    pub signature: [u8; 32],
}

/// An inbound message whose attestation a gateway has checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedMessage {
    /// Inbox index the message was read from.
    pub index: MessageIndex,
    /// Chain that produced the message.
    pub source_chain_id: ChainId,
    /// Sender on the source chain.
    pub source_address: Address,
    /// Encoded payload.
    pub payload: Vec<u8>,
}

impl VerifiedMessage {
    /// Build from an attested message read at `index`.
    pub fn from_warp(index: MessageIndex, message: WarpMessage) -> Self {
        Self {
            index,
            source_chain_id: message.source_chain_id,
            source_address: message.source_address,
            payload: message.payload,
        }
    }
}

/// Receipt for an outbound message handed to the relay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub Uuid);

impl MessageHandle {
    /// Fresh random handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageHandle {
    fn default() -> Self {
        Self::new()
    }
}
