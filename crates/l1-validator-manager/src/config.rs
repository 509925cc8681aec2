//! # Configuration
//!
//! Static identity of the coordinator plus tunables, loaded from JSON.

use crate::domain::churn::ChurnConfig;
use crate::domain::invariants::DEFAULT_MAX_REGISTRATION_EXPIRY_SECS;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("subnet_id must not be zero")]
    ZeroSubnetId,

    #[error("max_registration_expiry_secs must be positive")]
    ZeroExpiryWindow,

    #[error("churn period_secs must be positive")]
    ZeroChurnPeriod,

    #[error("churn max_churn_percent must be in 1..=100, got {0}")]
    InvalidChurnPercent(u8),
}

fn default_max_expiry() -> u64 {
    DEFAULT_MAX_REGISTRATION_EXPIRY_SECS
}

/// Validator manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorManagerConfig {
    /// The L1 whose validator set is managed.
    pub subnet_id: ChainId,
    /// Chain hosting this coordinator.
    pub chain_id: ChainId,
    /// Address of this coordinator on `chain_id`.
    pub manager_address: Address,
    /// Chain ID inbound messages must originate from.
    #[serde(default)]
    pub remote_ledger_id: ChainId,
    /// Upper bound on `expiry - now` for registrations.
    #[serde(default = "default_max_expiry")]
    pub max_registration_expiry_secs: u64,
    /// Churn limiting; disabled when absent.
    #[serde(default)]
    pub churn: Option<ChurnConfig>,
}

impl ValidatorManagerConfig {
    pub fn new(subnet_id: ChainId, chain_id: ChainId, manager_address: Address) -> Self {
        Self {
            subnet_id,
            chain_id,
            manager_address,
            remote_ledger_id: ChainId::ZERO,
            max_registration_expiry_secs: DEFAULT_MAX_REGISTRATION_EXPIRY_SECS,
            churn: None,
        }
    }

    pub fn with_churn(mut self, churn: ChurnConfig) -> Self {
        self.churn = Some(churn);
        self
    }

    pub fn with_remote_ledger(mut self, remote_ledger_id: ChainId) -> Self {
        self.remote_ledger_id = remote_ledger_id;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subnet_id.is_zero() {
            return Err(ConfigError::ZeroSubnetId);
        }
        if self.max_registration_expiry_secs == 0 {
            return Err(ConfigError::ZeroExpiryWindow);
        }
        if let Some(churn) = &self.churn {
            if churn.period_secs == 0 {
                return Err(ConfigError::ZeroChurnPeriod);
            }
            if !(1..=100).contains(&churn.max_churn_percent) {
                return Err(ConfigError::InvalidChurnPercent(churn.max_churn_percent));
            }
        }
        Ok(())
    }
}
