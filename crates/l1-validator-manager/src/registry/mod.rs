//! # Validator Registry
//!
//! Durable map of `ValidationId -> Validation` plus the aggregate total
//! weight, the node uniqueness index, the genesis flag and the churn window.
//!
//! Mutations are staged in a [`RegistryTxn`] and written with one atomic
//! batch. `commit` returns an [`UndoLog`] of pre-images so the caller can
//! roll the batch back if its gateway side effect fails afterwards.

pub mod keys;
mod txn;

pub use txn::{RegistryTxn, StagedChanges};

use crate::domain::churn::{ChurnConfig, ChurnTracker};
use crate::domain::entities::Validation;
use crate::domain::errors::StorageError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use keys::*;
use l1_telemetry::log_event;
use serde::{de::DeserializeOwned, Serialize};
use shared_types::{NodeId, ValidationId};

/// Pre-images of a committed batch.
#[derive(Debug, Clone)]
pub struct UndoLog {
    operations: Vec<BatchOperation>,
    total_weight: u64,
    initialized: bool,
    churn: Option<ChurnTracker>,
}

/// Validator registry over a key-value store.
pub struct ValidatorRegistry<S: KeyValueStore> {
    store: S,
    total_weight: u64,
    initialized: bool,
    churn: Option<ChurnTracker>,
}

pub(crate) fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode_record<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Corrupted {
        key: display_key(key),
        message: e.to_string(),
    })
}

fn corrupted(key: &[u8], message: &str) -> StorageError {
    StorageError::Corrupted {
        key: display_key(key),
        message: message.to_string(),
    }
}

impl<S: KeyValueStore> ValidatorRegistry<S> {
    /// Load cached aggregates from `store`.
    ///
    /// A persisted churn window is kept and re-configured with `churn`; with
    /// `churn = None` limiting is disabled and the stored window is ignored.
    pub fn open(store: S, churn: Option<ChurnConfig>) -> Result<Self, StorageError> {
        let total_weight = match store.get(TOTAL_WEIGHT_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| corrupted(TOTAL_WEIGHT_KEY, "expected 8 bytes"))?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };
        let initialized = store.exists(GENESIS_KEY)?;
        let stored: Option<ChurnTracker> = store
            .get(CHURN_KEY)?
            .map(|bytes| decode_record(CHURN_KEY, &bytes))
            .transpose()?;

        let churn = churn.map(|config| match stored {
            Some(mut tracker) => {
                tracker.reconfigure(config);
                tracker
            }
            None => ChurnTracker::new(config),
        });

        log_event!(
            debug,
            "registry",
            "[l1-vm] Registry opened",
            total_weight,
            initialized,
            churn_enabled = churn.is_some()
        );

        Ok(Self {
            store,
            total_weight,
            initialized,
            churn,
        })
    }

    pub fn get(&self, validation_id: &ValidationId) -> Result<Option<Validation>, StorageError> {
        let key = validation_key(validation_id);
        self.store
            .get(&key)?
            .map(|bytes| decode_record(&key, &bytes))
            .transpose()
    }

    /// Live validation of `node_id`, if any.
    pub fn node_validation(&self, node_id: &NodeId) -> Result<Option<ValidationId>, StorageError> {
        let key = node_key(node_id);
        match self.store.get(&key)? {
            Some(bytes) => {
                let raw: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| corrupted(&key, "expected 32-byte validation ID"))?;
                Ok(Some(ValidationId(raw)))
            }
            None => Ok(None),
        }
    }

    /// O(1): maintained on every commit.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn churn(&self) -> Option<&ChurnTracker> {
        self.churn.as_ref()
    }

    /// Start staging mutations.
    pub fn begin(&self) -> RegistryTxn<'_, S> {
        RegistryTxn::new(self)
    }

    /// Write staged changes in one atomic batch.
    pub fn commit(&mut self, changes: StagedChanges) -> Result<UndoLog, StorageError> {
        let mut operations = Vec::new();

        for (id, validation) in &changes.validations {
            operations.push(BatchOperation::put(
                validation_key(id),
                encode_record(validation)?,
            ));
        }
        for (node, entry) in &changes.nodes {
            operations.push(match entry {
                Some(id) => BatchOperation::put(node_key(node), id.as_bytes()),
                None => BatchOperation::delete(node_key(node)),
            });
        }
        if changes.total_weight != self.total_weight {
            operations.push(BatchOperation::put(
                TOTAL_WEIGHT_KEY,
                changes.total_weight.to_be_bytes().to_vec(),
            ));
        }
        if changes.initialized && !self.initialized {
            operations.push(BatchOperation::put(GENESIS_KEY, vec![1u8]));
        }
        if changes.churn_dirty {
            if let Some(tracker) = &changes.churn {
                operations.push(BatchOperation::put(CHURN_KEY, encode_record(tracker)?));
            }
        }

        let mut undo = Vec::with_capacity(operations.len());
        for op in &operations {
            let key = op.key();
            undo.push(match self.store.get(key)? {
                Some(previous) => BatchOperation::put(key, previous),
                None => BatchOperation::delete(key),
            });
        }

        if !operations.is_empty() {
            self.store.atomic_batch_write(operations)?;
        }

        let undo = UndoLog {
            operations: undo,
            total_weight: self.total_weight,
            initialized: self.initialized,
            churn: self.churn.clone(),
        };

        self.total_weight = changes.total_weight;
        self.initialized = changes.initialized;
        if changes.churn_dirty {
            self.churn = changes.churn;
        }

        Ok(undo)
    }

    /// Restore the state captured by `commit`.
    pub fn revert(&mut self, undo: UndoLog) -> Result<(), StorageError> {
        if !undo.operations.is_empty() {
            self.store.atomic_batch_write(undo.operations)?;
        }
        self.total_weight = undo.total_weight;
        self.initialized = undo.initialized;
        self.churn = undo.churn;
        Ok(())
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}
