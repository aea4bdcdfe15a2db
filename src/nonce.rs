//! Salt-producing nonce factories.
//!
//! A nonce factory is a zero-argument closure returning bytes. Two providers
//! cover both directions of the hashing protocol:
//!
//! - [`random_nonce`] draws fresh cryptographically random bytes, used when
//!   minting a new hash;
//! - [`fixed_nonce`] replays previously stored bytes, used to recompute a
//!   hash deterministically during verification.
//!
//! Passing the factory (rather than a materialized salt) to the strategy
//! registry lets the same construction path serve both cases without
//! branching in the caller.

use rand::{RngCore, rng};
use std::sync::Arc;

/// A salt source: invoked once per strategy construction.
pub type NonceFactory = Arc<dyn Fn() -> Vec<u8> + Send + Sync>;

/// Returns a nonce factory producing `length` fresh random bytes per call.
///
/// Randomness comes from the thread-local CSPRNG, which is safe for
/// concurrent use.
pub fn random_nonce(length: usize) -> NonceFactory {
    Arc::new(move || {
        let mut salt = vec![0u8; length];
        rng().fill_bytes(&mut salt);
        salt
    })
}

/// Returns a nonce factory that always replays the given salt.
pub fn fixed_nonce(salt: Vec<u8>) -> NonceFactory {
    Arc::new(move || salt.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_nonce_has_requested_length() {
        let factory = random_nonce(32);
        assert_eq!(factory().len(), 32);
    }

    #[test]
    fn random_nonce_draws_fresh_values() {
        let factory = random_nonce(32);
        // Collisions of two 256-bit draws are negligible.
        assert_ne!(factory(), factory());
    }

    #[test]
    fn fixed_nonce_replays_the_same_salt() {
        let salt = vec![1, 2, 3, 4];
        let factory = fixed_nonce(salt.clone());
        assert_eq!(factory(), salt);
        assert_eq!(factory(), salt);
    }
}
