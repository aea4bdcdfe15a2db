//! Iterated-HMAC strategy backed by PBKDF2.
//!
//! PBKDF2 forces an attacker to repeat the inner pseudo-random function for
//! every candidate password; the iteration count is the cost knob and must
//! stay high enough (hundreds of thousands) to dominate attacker
//! verification cost. The inner PRF is chosen at compile time through
//! [`Pbkdf2Prf`], and each PRF carries its own registry identity so a
//! variant cannot write the wrong algorithm into its metadata.

use std::marker::PhantomData;

use blake2::Blake2b512;
use hmac::SimpleHmac;
use sha2::Sha512;
use sha3::Keccak512;

use crate::error::ButcherResult;
use crate::hasher::{Algorithm, Metadata, Strategy};

/// Cost parameters for the PBKDF2 strategy.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Settings {
    /// Parameter revision written into produced metadata.
    pub version: u8,
    /// Number of PRF iterations.
    pub iterations: u32,
    /// Derived key length in bytes.
    pub output_len: usize,
}

impl Pbkdf2Settings {
    /// Production preset: 210k iterations.
    pub const DEFAULT: Self = Self {
        version: 1,
        iterations: 210_000,
        output_len: 64,
    };

    /// Fast preset for unit tests only.
    pub const TEST: Self = Self {
        version: 1,
        iterations: 1000,
        output_len: 64,
    };
}

/// An inner pseudo-random function usable with the PBKDF2 strategy.
pub trait Pbkdf2Prf {
    /// The registry identity of the PBKDF2 variant built on this PRF.
    const ALGORITHM: Algorithm;

    /// Fills `out` with the derived key.
    fn fill(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]);
}

/// HMAC-SHA-512 pseudo-random function.
pub struct HmacSha512;

impl Pbkdf2Prf for HmacSha512 {
    const ALGORITHM: Algorithm = Algorithm::Pbkdf2HmacSha512;

    fn fill(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, out);
    }
}

/// HMAC-Blake2b-512 pseudo-random function.
pub struct HmacBlake2b512;

impl Pbkdf2Prf for HmacBlake2b512 {
    const ALGORITHM: Algorithm = Algorithm::Pbkdf2HmacBlake2b512;

    fn fill(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        // Blake2b is lazy-buffered, so it goes through SimpleHmac instead of
        // the eager pbkdf2_hmac shortcut.
        pbkdf2::pbkdf2::<SimpleHmac<Blake2b512>>(password, salt, rounds, out)
            .expect("HMAC accepts keys of any length");
    }
}

/// HMAC-Keccak-512 pseudo-random function (legacy Keccak, not SHA-3).
pub struct HmacKeccak512;

impl Pbkdf2Prf for HmacKeccak512 {
    const ALGORITHM: Algorithm = Algorithm::Pbkdf2HmacKeccak512;

    fn fill(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        pbkdf2::pbkdf2_hmac::<Keccak512>(password, salt, rounds, out);
    }
}

/// PBKDF2 strategy bound to one salt, one PRF and one set of cost
/// parameters.
pub struct Pbkdf2Strategy<P: Pbkdf2Prf> {
    salt: Vec<u8>,
    settings: Pbkdf2Settings,
    _prf: PhantomData<P>,
}

impl<P: Pbkdf2Prf> Pbkdf2Strategy<P> {
    /// Creates a strategy bound to the given salt.
    pub fn new(salt: Vec<u8>, settings: Pbkdf2Settings) -> Self {
        Self {
            salt,
            settings,
            _prf: PhantomData,
        }
    }
}

impl<P: Pbkdf2Prf> Strategy for Pbkdf2Strategy<P> {
    fn hash(&self, password: &[u8]) -> ButcherResult<Metadata> {
        let mut digest = vec![0u8; self.settings.output_len];
        P::fill(password, &self.salt, self.settings.iterations, &mut digest);

        Ok(Metadata::new(
            P::ALGORITHM,
            self.settings.version,
            self.salt.clone(),
            digest,
        ))
    }
}
