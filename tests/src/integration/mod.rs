//! # Integration Tests
//!
//! Each module drives a `ValidatorManager` through its ports, with a
//! `RemoteLedger` playing the other side of every handshake.

pub mod invariants;
pub mod lifecycle;
pub mod persistence;
