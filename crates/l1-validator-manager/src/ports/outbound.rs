//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the validator manager. All calls are
//! synchronous: an operation never suspends between its registry commit and
//! its gateway side effect.

use crate::domain::errors::StorageError;
use crate::events::ValidatorManagerEvent;
use shared_types::{MessageError, MessageHandle, MessageIndex, VerifiedMessage, WarpMessage};

/// Authenticated cross-ledger message transport.
///
/// Production: aggregate-signature verification plus a relayer queue.
/// Testing: `InMemoryMessageGateway`.
pub trait MessageGateway: Send + Sync {
    /// Verify the message at `index` without consuming it.
    ///
    /// Fails with `AlreadyConsumed` if the index has been consumed.
    fn authenticate(&self, index: MessageIndex) -> Result<VerifiedMessage, MessageError>;

    /// Mark `index` consumed. Fails with `AlreadyConsumed` on a second call.
    fn consume(&self, index: MessageIndex) -> Result<(), MessageError>;

    /// Verify then consume in one step.
    fn authenticate_and_consume(
        &self,
        index: MessageIndex,
    ) -> Result<VerifiedMessage, MessageError> {
        let message = self.authenticate(index)?;
        self.consume(index)?;
        Ok(message)
    }

    /// Hand an outbound message to the relay layer. Delivery is best effort.
    fn emit(&self, message: WarpMessage) -> Result<MessageHandle, MessageError>;
}

/// Abstract interface for key-value database operations.
///
/// The registry never iterates; every access is by exact key.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StorageError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, StorageError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Append-only notification log.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: ValidatorManagerEvent);
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in seconds since epoch.
    fn now(&self) -> u64;
}
