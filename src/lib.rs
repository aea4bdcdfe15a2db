//! Pluggable password hashing with a self-describing encoded format.
//!
//! This crate hashes passwords under one of several key derivation
//! strategies and produces a compact, self-describing token. The token
//! carries the algorithm identity, parameter version, salt and digest, so a
//! candidate password can later be verified without knowing in advance
//! which strategy or parameters produced the hash.
//!
//! # Components
//!
//! - [`hasher`]: the [`Strategy`] abstraction over heterogeneous key
//!   derivation families (memory-hard, iterated-HMAC, salted-adaptive) and
//!   the closed [`Algorithm`] registry
//! - [`Metadata`]: the canonical hash record and its wire encoding
//! - [`Butcher`]: the facade orchestrating salt generation, peppering,
//!   strategy dispatch, constant-time verification and upgrade detection
//! - [`nonce`]: salt factories (fresh random bytes, or replay of a stored
//!   salt)
//!
//! The cryptographic primitives themselves are external collaborators
//! (RustCrypto crates); this crate only requires each of them to behave as
//! a pure function from password, salt and parameters to a fixed-length
//! byte string.
//!
//! # Example
//!
//! ```
//! // The process-wide default instance: scrypt+blake2b-512, 32-byte salts.
//! let encoded = butcher::hash(b"toto")?;
//!
//! assert!(butcher::verify(&encoded, b"toto")?);
//! assert!(!butcher::verify(&encoded, b"titi")?);
//!
//! // Fresh salt per call: hashing the same password twice gives two
//! // different tokens, and both verify.
//! assert_ne!(encoded, butcher::hash(b"toto")?);
//! # Ok::<(), butcher::ButcherError>(())
//! ```
//!
//! # Security considerations
//!
//! - Verification compares the full packed records in constant time, with no
//!   early exit on the first mismatching byte.
//! - An optional pepper (site-wide secret appended to every password) is
//!   kept in zeroize-on-drop memory and never stored in the token.
//! - The decoder bounds how many bytes it reads from an untrusted token
//!   before parsing anything.
//! - A `verify` error means "could not determine", not "wrong password";
//!   login flows should present both identically to avoid oracle behavior.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod butcher;
mod error;
pub mod hasher;
pub mod nonce;

pub use butcher::{
    Butcher, ButcherBuilder, DEFAULT_ALGORITHM, DEFAULT_SALT_LENGTH, hash, needs_upgrade, verify,
};
pub use error::{ButcherError, ButcherResult};
pub use hasher::{Algorithm, Metadata, Strategy};
