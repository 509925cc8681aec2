//! In-memory message gateway.
//!
//! Inbound messages sit in an indexed inbox and are verified with a
//! [`MessageAuthenticator`] on every read. Consumed indices are remembered
//! forever. Outbound messages are appended to an outbox that a relayer (or a
//! test) drains.

use crate::ports::outbound::MessageGateway;
use parking_lot::RwLock;
use shared_types::{
    Address, ChainId, MessageAuthenticator, MessageError, MessageHandle, MessageIndex,
    SignedWarpMessage, VerifiedMessage, WarpMessage,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Outbound message recorded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedMessage {
    pub handle: MessageHandle,
    pub message: WarpMessage,
}

#[derive(Debug, Default)]
struct GatewayState {
    inbox: BTreeMap<MessageIndex, SignedWarpMessage>,
    next_index: MessageIndex,
    consumed: HashSet<MessageIndex>,
    outbox: Vec<EmittedMessage>,
}

/// HMAC-attested in-memory gateway.
#[derive(Debug)]
pub struct InMemoryMessageGateway {
    authenticator: MessageAuthenticator,
    state: RwLock<GatewayState>,
    fail_emit: AtomicBool,
    fail_consume: AtomicBool,
}

impl InMemoryMessageGateway {
    pub fn new(authenticator: MessageAuthenticator) -> Self {
        Self {
            authenticator,
            state: RwLock::new(GatewayState::default()),
            fail_emit: AtomicBool::new(false),
            fail_consume: AtomicBool::new(false),
        }
    }

    /// Place a signed message in the inbox at the next free index.
    pub fn deliver(&self, signed: SignedWarpMessage) -> MessageIndex {
        let mut state = self.state.write();
        let index = state.next_index;
        state.next_index += 1;
        state.inbox.insert(index, signed);
        debug!(message_index = index, "[l1-vm] Inbound message queued");
        index
    }

    /// Sign `payload` as coming from `source_chain_id` and deliver it.
    pub fn deliver_from(&self, source_chain_id: ChainId, payload: Vec<u8>) -> MessageIndex {
        let message = WarpMessage::new(source_chain_id, Address::ZERO, payload);
        self.deliver(self.authenticator.seal(message))
    }

    pub fn is_consumed(&self, index: MessageIndex) -> bool {
        self.state.read().consumed.contains(&index)
    }

    /// Snapshot of everything emitted so far.
    pub fn outbox(&self) -> Vec<EmittedMessage> {
        self.state.read().outbox.clone()
    }

    /// Remove and return everything emitted so far.
    pub fn drain_outbox(&self) -> Vec<EmittedMessage> {
        std::mem::take(&mut self.state.write().outbox)
    }

    /// Make `emit` fail until reset.
    pub fn set_emit_failure(&self, fail: bool) {
        self.fail_emit.store(fail, Ordering::SeqCst);
    }

    /// Make `consume` fail until reset, as if another relayer won the race.
    pub fn set_consume_failure(&self, fail: bool) {
        self.fail_consume.store(fail, Ordering::SeqCst);
    }
}

impl MessageGateway for InMemoryMessageGateway {
    fn authenticate(&self, index: MessageIndex) -> Result<VerifiedMessage, MessageError> {
        let state = self.state.read();
        if state.consumed.contains(&index) {
            return Err(MessageError::AlreadyConsumed { index });
        }
        let signed = state
            .inbox
            .get(&index)
            .ok_or(MessageError::NotFound { index })?;

        if !self.authenticator.verify(signed) {
            warn!(message_index = index, "[l1-vm] Attestation check failed");
            return Err(MessageError::VerificationFailed {
                index,
                reason: "invalid attestation".to_string(),
            });
        }

        Ok(VerifiedMessage::from_warp(index, signed.message.clone()))
    }

    fn consume(&self, index: MessageIndex) -> Result<(), MessageError> {
        let mut state = self.state.write();
        if self.fail_consume.load(Ordering::SeqCst) || !state.consumed.insert(index) {
            return Err(MessageError::AlreadyConsumed { index });
        }
        Ok(())
    }

    fn emit(&self, message: WarpMessage) -> Result<MessageHandle, MessageError> {
        if self.fail_emit.load(Ordering::SeqCst) {
            return Err(MessageError::EmitFailed("relay unavailable".to_string()));
        }
        let handle = MessageHandle::new();
        self.state
            .write()
            .outbox
            .push(EmittedMessage { handle, message });
        Ok(handle)
    }
}
