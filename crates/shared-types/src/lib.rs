//! # Shared Types Crate
//!
//! Types shared by every crate that touches the boundary between the local
//! chain and the remote ledger that owns the validator set.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers (`ChainId`, `NodeId`,
//!   `ValidationId`, ...) are defined once here.
//! - **Envelope Integrity**: `WarpMessage` is the only shape a cross-ledger
//!   message takes; payload bytes are opaque at this layer.
//! - **Attestation is external**: the coordinator never checks signatures
//!   itself. `MessageAuthenticator` is the development stand-in for the
//!   aggregate-signature layer that production gateways plug in.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod security;

pub use entities::*;
pub use envelope::{MessageHandle, MessageIndex, SignedWarpMessage, VerifiedMessage, WarpMessage};
pub use errors::*;
pub use security::MessageAuthenticator;
