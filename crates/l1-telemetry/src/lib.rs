//! # L1 Telemetry
//!
//! Logging bootstrap shared by every binary and test harness that hosts the
//! validator manager.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use l1_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `L1VM_SERVICE_NAME` | `l1-validator-manager` | Service name attached to every event |
//! | `L1VM_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `L1VM_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `L1VM_CONSOLE_OUTPUT` | `true` | Emit to stdout at all |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Install logging and return a guard to hold for the lifetime of the host.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(config)?;
    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Guard that keeps telemetry active. Logs a shutdown line when dropped.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Structured log line tagged with the component that produced it.
///
/// ```rust,ignore
/// l1_telemetry::log_event!(info, "registry", "Validation stored", weight = 100);
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a validation-related event with the standard identifying fields.
#[macro_export]
macro_rules! log_validation_event {
    ($level:ident, $msg:expr, $validation_id:expr, $node_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            validation_id = %$validation_id,
            node_id = %$node_id,
            $($($field)*,)?
            $msg
        )
    };
}
