//! # Identifier Types
//!
//! Fixed-width identifiers used on both sides of the ledger boundary.
//!
//! All identifiers are plain byte arrays wrapped in newtypes so that a node ID
//! can never be passed where a chain ID is expected. They render as lowercase
//! hex in `Display` and as a shortened hex prefix in `Debug`.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

macro_rules! hex_identifier {
    ($name:ident) => {
        impl $name {
            /// Raw bytes of the identifier.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// True when every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..)", stringify!($name), hex::encode(&self.0[..4]))
            }
        }
    };
}

/// Identifier of a chain: the L1 itself, the coordinator's host chain, or the
/// remote ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ChainId(pub Hash);

impl ChainId {
    /// The all-zero chain ID (the remote ledger's conventional ID).
    pub const ZERO: ChainId = ChainId([0u8; 32]);
}

hex_identifier!(ChainId);

/// Identifier of a validating node (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub [u8; 20]);

hex_identifier!(NodeId);

/// 20-byte account/contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Address = Address([0u8; 20]);
}

hex_identifier!(Address);

/// Identifier of one continuous membership span of a node.
///
/// Content hash of the canonical registration request, or the genesis
/// derivation for validators seeded from conversion data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ValidationId(pub Hash);

hex_identifier!(ValidationId);

/// Compressed BLS12-381 public key (48 bytes).
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlsPublicKey(#[serde_as(as = "Bytes")] pub [u8; 48]);

hex_identifier!(BlsPublicKey);
