//! # Message Attestation
//!
//! HMAC-SHA256 attestation for `WarpMessage`s.
//!
//! Production deployments verify aggregate validator signatures in the
//! message gateway. Development networks and the test suites use a shared
//! secret instead, which keeps the gateway contract identical: a message is
//! either attested or it is not.

use crate::envelope::{SignedWarpMessage, WarpMessage};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies messages with a shared secret.
#[derive(Clone)]
pub struct MessageAuthenticator {
    secret: [u8; 32],
}

impl MessageAuthenticator {
    /// Create an authenticator for `secret`.
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    /// Attestation tag for `message`.
    pub fn sign(&self, message: &WarpMessage) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(&message.signing_bytes());
        mac.finalize().into_bytes().into()
    }

    /// Wrap `message` with its attestation.
    pub fn seal(&self, message: WarpMessage) -> SignedWarpMessage {
        let signature = self.sign(&message);
        SignedWarpMessage { message, signature }
    }

    /// Constant-time check of a signed message.
    pub fn verify(&self, signed: &SignedWarpMessage) -> bool {
        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(m) => m,
            Err(_) => return false,
        };
        mac.update(&signed.message.signing_bytes());
        mac.verify_slice(&signed.signature).is_ok()
    }
}

impl std::fmt::Debug for MessageAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageAuthenticator")
            .field("secret", &"<redacted>")
            .finish()
    }
}
