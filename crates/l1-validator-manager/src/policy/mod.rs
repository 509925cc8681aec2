//! # Policy Modules
//!
//! Security policies composed with the core. A policy holds an `Arc` to a
//! [`ValidatorSetCoordinator`](crate::ports::ValidatorSetCoordinator) and
//! decides who may drive the restricted operations; the core never refers
//! back to its policy.

pub mod poa;

pub use poa::PoAValidatorManager;
