//! Request signing for the AC management API.
//!
//! Every request carries a fresh nonce (`random`) and an MD5 digest of the
//! shared secret concatenated with that nonce (`md5`). The appliance recomputes
//! the digest from its own copy of the secret to authenticate the caller.
//!
//! # Signing Flow
//!
//! 1. Draw a `u64` from the signer's random source and render it in decimal
//! 2. Hash `secret ‖ nonce` with MD5
//! 3. Send both values with the request (query string for GET, body for POST)
//!
//! The nonce is not cryptographically secure; the strength of the scheme comes
//! from the secret.

use std::fmt;
use std::sync::{Arc, Mutex};

use md5::{Digest, Md5};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Query/body field carrying the nonce.
pub const RANDOM_FIELD: &str = "random";

/// Query/body field carrying the digest.
pub const DIGEST_FIELD: &str = "md5";

/// Random source owned by a [`Signer`].
pub type SharedRng = Arc<Mutex<dyn RngCore + Send>>;

/// A nonce and its keyed digest, generated once per outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedNonce {
    /// Decimal rendering of the random `u64`
    pub random: String,
    /// Lowercase hex MD5 of `secret ‖ random`
    pub md5: String,
}

/// Compute the digest the appliance expects for `secret` and `nonce`.
///
/// The two strings are concatenated as raw bytes and hashed once.
pub fn digest(secret: &str, nonce: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

/// Holds the shared secret and the random source used for nonces.
///
/// Clones share the same random source.
#[derive(Clone)]
pub struct Signer {
    secret: Arc<str>,
    rng: SharedRng,
}

impl Signer {
    /// Create a signer backed by an entropy-seeded [`StdRng`].
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_rng(secret, StdRng::from_entropy())
    }

    /// Create a signer with an explicit random source (e.g. a seeded `StdRng`).
    pub fn with_rng<R>(secret: impl Into<String>, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        let rng: SharedRng = Arc::new(Mutex::new(rng));
        Self {
            secret: Arc::from(secret.into()),
            rng,
        }
    }

    /// Generate a fresh nonce and its digest.
    pub fn sign(&self) -> SignedNonce {
        let random = self.next_nonce().to_string();
        let md5 = digest(&self.secret, &random);
        SignedNonce { random, md5 }
    }

    fn next_nonce(&self) -> u64 {
        // RNG state stays valid even if another caller panicked mid-draw.
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.next_u64()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("secret", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_value() {
        assert_eq!(digest("secret", "123"), "5d7845ac6ee7cfffafc5fe5f35cf666d");
        assert_eq!(digest("k", "0"), "28d61f7b1f07d88c18f1068410d140b5");
    }

    #[test]
    fn test_digest_is_pure() {
        let a = digest("YR9nQngmvhX&9BE83K", "42");
        let b = digest("YR9nQngmvhX&9BE83K", "42");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_changes_with_nonce() {
        assert_ne!(digest("secret", "1"), digest("secret", "2"));
    }

    #[test]
    fn test_sign_matches_digest() {
        let signer = Signer::with_rng("secret", StdRng::seed_from_u64(7));
        let signed = signer.sign();
        assert!(signed.random.parse::<u64>().is_ok());
        assert_eq!(signed.md5, digest("secret", &signed.random));
    }

    #[test]
    fn test_seeded_signers_are_deterministic() {
        let a = Signer::with_rng("secret", StdRng::seed_from_u64(1));
        let b = Signer::with_rng("secret", StdRng::seed_from_u64(1));
        assert_eq!(a.sign(), b.sign());
        assert_eq!(a.sign(), b.sign());
    }

    #[test]
    fn test_nonce_is_fresh_per_call() {
        let signer = Signer::with_rng("secret", StdRng::seed_from_u64(99));
        let first = signer.sign();
        let second = signer.sign();
        assert_ne!(first.random, second.random);
        assert_ne!(first.md5, second.md5);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let signer = Signer::new("top-secret");
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains("top-secret"));
    }
}
