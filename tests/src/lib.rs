//! # L1 Validator Manager Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── ledger.rs         # Simulated remote ledger and deployment harness
//! └── integration/      # End-to-end handshakes
//!     ├── lifecycle.rs  # Genesis, registration, weight, removal, PoA
//!     ├── replay.rs     # Duplicate, reordered and forged deliveries
//!     ├── persistence.rs# Restarts over the file-backed store
//!     └── invariants.rs # Randomized total-weight invariant
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p l1-tests
//! cargo test -p l1-tests integration::replay::
//!
//! # Benchmarks
//! cargo bench -p l1-tests
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod ledger;
