//! # Churn Limiter
//!
//! Bounds the absolute weight change admitted within a sliding time window.
//! Registrations add their weight, removals subtract it and updates net the
//! difference; the window sums the absolute values.
//!
//! The tracker is plain data so the registry can persist it in the same
//! batch as the mutation it gates.

use super::errors::{ValidatorManagerError, ValidatorManagerResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Churn limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnConfig {
    /// Window length in seconds.
    pub period_secs: u64,
    /// Maximum window churn as a percentage of total weight (1..=100).
    pub max_churn_percent: u8,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            period_secs: 3_600,
            max_churn_percent: 20,
        }
    }
}

/// A weight change admitted at `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnEntry {
    pub timestamp: u64,
    pub delta: i128,
}

/// Snapshot of the churn window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnStatus {
    pub period_secs: u64,
    pub max_churn_percent: u8,
    /// Absolute churn currently inside the window.
    pub window_churn: u64,
    /// Limit at the current total weight.
    pub limit: u64,
}

/// Sliding-window churn accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnTracker {
    config: ChurnConfig,
    entries: VecDeque<ChurnEntry>,
}

impl ChurnTracker {
    pub fn new(config: ChurnConfig) -> Self {
        Self {
            config,
            entries: VecDeque::new(),
        }
    }

    pub fn config(&self) -> ChurnConfig {
        self.config
    }

    /// Keep the recorded window but apply a new configuration.
    pub fn reconfigure(&mut self, config: ChurnConfig) {
        self.config = config;
    }

    /// Drop entries that have left the window ending at `now`.
    fn prune(&mut self, now: u64) {
        let period = self.config.period_secs;
        while let Some(front) = self.entries.front() {
            if front.timestamp.saturating_add(period) <= now {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Absolute churn inside the window ending at `now`.
    pub fn window_churn(&self, now: u64) -> u64 {
        let period = self.config.period_secs;
        let sum: u128 = self
            .entries
            .iter()
            .filter(|e| e.timestamp.saturating_add(period) > now)
            .map(|e| e.delta.unsigned_abs())
            .sum();
        u64::try_from(sum).unwrap_or(u64::MAX)
    }

    /// Churn allowed in one window at `total_weight`.
    pub fn limit(&self, total_weight: u64) -> u64 {
        let limit = u128::from(total_weight) * u128::from(self.config.max_churn_percent) / 100;
        limit as u64
    }

    /// Admit a change from `old_weight` to `new_weight`, or fail without recording.
    pub fn check_and_record(
        &mut self,
        now: u64,
        old_weight: u64,
        new_weight: u64,
        total_weight: u64,
    ) -> ValidatorManagerResult<()> {
        let delta = i128::from(new_weight) - i128::from(old_weight);
        if delta == 0 {
            return Ok(());
        }

        self.prune(now);
        let projected = self.window_churn(now).saturating_add(delta.unsigned_abs() as u64);
        let limit = self.limit(total_weight);
        if projected > limit {
            return Err(ValidatorManagerError::ChurnLimitExceeded {
                churn: projected,
                limit,
            });
        }

        self.entries.push_back(ChurnEntry {
            timestamp: now,
            delta,
        });
        Ok(())
    }

    pub fn status(&self, now: u64, total_weight: u64) -> ChurnStatus {
        ChurnStatus {
            period_secs: self.config.period_secs,
            max_churn_percent: self.config.max_churn_percent,
            window_churn: self.window_churn(now),
            limit: self.limit(total_weight),
        }
    }
}
