//! Hashing strategies and their registry.
//!
//! A [`Strategy`] wraps one key derivation function together with its cost
//! parameters and the salt it is bound to, and exposes a single operation:
//! turn a password into a [`Metadata`] record. The registry is the closed
//! [`Algorithm`] enumeration plus one exhaustive dispatch function; there
//! is no runtime-mutable table, and the compiler guarantees that every
//! registered algorithm has a construction arm, a wire identifier and a
//! current parameter version.
//!
//! Strategies are ephemeral: one instance is built per hash or verify call,
//! bound to exactly one salt. Nothing is shared between concurrent calls.

mod metadata;
pub use self::metadata::Metadata;

pub mod argon2;
pub mod pbkdf2;
pub mod scrypt;

pub use self::argon2::{Argon2Settings, Argon2Strategy};
pub use self::pbkdf2::{
    HmacBlake2b512, HmacKeccak512, HmacSha512, Pbkdf2Prf, Pbkdf2Settings, Pbkdf2Strategy,
};
pub use self::scrypt::{ScryptSettings, ScryptStrategy};

use std::fmt;

use crate::error::ButcherResult;
use crate::nonce::NonceFactory;

/// A key derivation strategy bound to one salt and one parameter set.
///
/// `hash` fails only if the underlying primitive rejects its parameters,
/// a fatal configuration error, not a retryable condition. Every
/// implementation writes its own registry identity into the produced
/// metadata; the facade relies on this for self-verification.
pub trait Strategy {
    /// Derives a digest from `password` and returns the full hash record.
    fn hash(&self, password: &[u8]) -> ButcherResult<Metadata>;
}

/// Identity of a supported key derivation strategy.
///
/// The wire identifier of each variant is permanent: every value ever
/// written to storage must remain decodable forever, so variants are only
/// added, never removed or renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Argon2id (memory-hard hybrid).
    Argon2id,
    /// scrypt over an HMAC-Blake2b-512 pre-hash (salted-adaptive).
    ScryptBlake2b512,
    /// PBKDF2 with HMAC-SHA-512 (iterated-HMAC).
    Pbkdf2HmacSha512,
    /// PBKDF2 with HMAC-Blake2b-512 (iterated-HMAC).
    Pbkdf2HmacBlake2b512,
    /// PBKDF2 with HMAC-Keccak-512 (iterated-HMAC).
    Pbkdf2HmacKeccak512,
}

impl Algorithm {
    /// Every registered algorithm.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Argon2id,
        Algorithm::ScryptBlake2b512,
        Algorithm::Pbkdf2HmacSha512,
        Algorithm::Pbkdf2HmacBlake2b512,
        Algorithm::Pbkdf2HmacKeccak512,
    ];

    /// The permanent wire identifier of this algorithm.
    pub const fn id(self) -> u8 {
        match self {
            Algorithm::Argon2id => 1,
            Algorithm::ScryptBlake2b512 => 2,
            Algorithm::Pbkdf2HmacSha512 => 3,
            Algorithm::Pbkdf2HmacBlake2b512 => 4,
            Algorithm::Pbkdf2HmacKeccak512 => 5,
        }
    }

    /// Looks up an algorithm by its wire identifier.
    ///
    /// Returns `None` for identifiers with no registered implementation,
    /// e.g. a hash produced by a newer build.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Algorithm::Argon2id),
            2 => Some(Algorithm::ScryptBlake2b512),
            3 => Some(Algorithm::Pbkdf2HmacSha512),
            4 => Some(Algorithm::Pbkdf2HmacBlake2b512),
            5 => Some(Algorithm::Pbkdf2HmacKeccak512),
            _ => None,
        }
    }

    /// Builds a strategy for this algorithm with its default settings,
    /// bound to a salt drawn from `salt_source`.
    ///
    /// Taking the salt-producing closure instead of a materialized salt
    /// lets the same construction path serve both hashing (fresh random
    /// salt) and verification (replay of a stored salt).
    pub fn strategy(self, salt_source: &NonceFactory) -> Box<dyn Strategy> {
        let salt = salt_source();
        match self {
            Algorithm::Argon2id => {
                Box::new(Argon2Strategy::new(salt, Argon2Settings::DEFAULT))
            }
            Algorithm::ScryptBlake2b512 => {
                Box::new(ScryptStrategy::new(salt, ScryptSettings::DEFAULT))
            }
            Algorithm::Pbkdf2HmacSha512 => Box::new(Pbkdf2Strategy::<HmacSha512>::new(
                salt,
                Pbkdf2Settings::DEFAULT,
            )),
            Algorithm::Pbkdf2HmacBlake2b512 => Box::new(Pbkdf2Strategy::<HmacBlake2b512>::new(
                salt,
                Pbkdf2Settings::DEFAULT,
            )),
            Algorithm::Pbkdf2HmacKeccak512 => Box::new(Pbkdf2Strategy::<HmacKeccak512>::new(
                salt,
                Pbkdf2Settings::DEFAULT,
            )),
        }
    }

    /// The parameter version the default settings of this algorithm
    /// currently carry.
    pub fn current_version(self) -> u8 {
        match self {
            Algorithm::Argon2id => Argon2Settings::DEFAULT.version,
            Algorithm::ScryptBlake2b512 => ScryptSettings::DEFAULT.version,
            Algorithm::Pbkdf2HmacSha512
            | Algorithm::Pbkdf2HmacBlake2b512
            | Algorithm::Pbkdf2HmacKeccak512 => Pbkdf2Settings::DEFAULT.version,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Argon2id => "argon2id",
            Algorithm::ScryptBlake2b512 => "scrypt+blake2b-512",
            Algorithm::Pbkdf2HmacSha512 => "pbkdf2+hmac-sha512",
            Algorithm::Pbkdf2HmacBlake2b512 => "pbkdf2+hmac-blake2b-512",
            Algorithm::Pbkdf2HmacKeccak512 => "pbkdf2+hmac-keccak-512",
        };
        f.write_str(name)
    }
}
