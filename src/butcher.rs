//! The password hashing facade.
//!
//! [`Butcher`] ties the pieces together: it draws a salt from the
//! configured nonce factory, optionally peppers the password, dispatches
//! the configured strategy, and packs the result into an opaque token.
//! Verification runs the same pipeline in reverse: the token itself
//! carries everything needed to select the right strategy and replay the
//! stored salt, so a facade can verify hashes it did not produce.
//!
//! All operations take `&self` and are safe to call from concurrent
//! threads; every call builds its own short-lived strategy instance.

use std::sync::LazyLock;

use subtle::ConstantTimeEq as _;
use zeroize::Zeroizing;

use crate::error::ButcherResult;
use crate::hasher::{Algorithm, Metadata};
use crate::nonce::{NonceFactory, fixed_nonce, random_nonce};

/// Algorithm used when the builder is not told otherwise.
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::ScryptBlake2b512;

/// Salt length, in bytes, of the default salt factory.
pub const DEFAULT_SALT_LENGTH: usize = 32;

/// Password hashing facade.
///
/// Configuration is immutable after construction; build an instance once
/// and share it for the lifetime of the process. For call sites that do
/// not want to manage their own configuration, the module-level
/// [`hash`], [`verify`] and [`needs_upgrade`] functions use a process-wide
/// default instance.
///
/// # Example
///
/// ```
/// use butcher::{Algorithm, Butcher};
///
/// let butcher = Butcher::builder()
///     .algorithm(Algorithm::Pbkdf2HmacSha512)
///     .pepper(b"site-wide secret".to_vec())
///     .build()?;
///
/// let encoded = butcher.hash(b"correct horse battery staple")?;
/// assert!(butcher.verify(&encoded, b"correct horse battery staple")?);
/// assert!(!butcher.verify(&encoded, b"tr0ub4dor&3")?);
/// # Ok::<(), butcher::ButcherError>(())
/// ```
pub struct Butcher {
    algorithm: Algorithm,
    salt_factory: NonceFactory,
    pepper: Option<Zeroizing<Vec<u8>>>,
    min_version: u8,
}

impl Butcher {
    /// Starts building a facade instance.
    pub fn builder() -> ButcherBuilder {
        ButcherBuilder::new()
    }

    /// Builds a facade with the default configuration.
    pub fn new() -> ButcherResult<Self> {
        Self::builder().build()
    }

    /// The configured default algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Hashes `password` under the configured default algorithm and
    /// returns the encoded token.
    ///
    /// Two calls with the same password produce different tokens: each
    /// call draws a fresh salt from the configured nonce factory.
    ///
    /// # Errors
    ///
    /// Propagates [`ButcherError::DerivationFailure`] if the underlying
    /// primitive rejects its parameters.
    ///
    /// [`ButcherError::DerivationFailure`]: crate::ButcherError::DerivationFailure
    pub fn hash(&self, password: &[u8]) -> ButcherResult<String> {
        let strategy = self.algorithm.strategy(&self.salt_factory);
        let metadata = strategy.hash(&self.peppered(password))?;
        Ok(metadata.pack())
    }

    /// Verifies a candidate password against an encoded token.
    ///
    /// The token's own metadata selects the strategy and replays the
    /// stored salt; the recomputed token is compared against the input
    /// byte-for-byte in constant time (no early exit on the first
    /// mismatching byte). Returns `Ok(true)` only on exact equality.
    ///
    /// # Errors
    ///
    /// [`ButcherError::InvalidHash`] if the token cannot be decoded and
    /// [`ButcherError::StrategyNotSupported`] if it names an algorithm
    /// this build does not know. An `Err` means "could not determine",
    /// but login flows exposed to untrusted actors should present it the
    /// same way as a wrong password, or the error becomes an oracle for
    /// probing stored hashes.
    ///
    /// [`ButcherError::InvalidHash`]: crate::ButcherError::InvalidHash
    /// [`ButcherError::StrategyNotSupported`]: crate::ButcherError::StrategyNotSupported
    pub fn verify(&self, encoded: &str, password: &[u8]) -> ButcherResult<bool> {
        let metadata = Metadata::decode(encoded.as_bytes())?;

        let strategy = metadata
            .algorithm()
            .strategy(&fixed_nonce(metadata.salt().to_vec()));
        let candidate = strategy.hash(&self.peppered(password))?.pack();

        Ok(bool::from(candidate.as_bytes().ct_eq(encoded.as_bytes())))
    }

    /// Reports whether a stored token was computed under superseded
    /// configuration and should be re-hashed on the next successful login.
    ///
    /// True iff the token's algorithm differs from the configured default
    /// and its parameter version is below the current minimum. This is a
    /// local heuristic, not a cryptographic statement.
    ///
    /// # Errors
    ///
    /// Propagates decoding failures like [`verify`](Butcher::verify) does.
    pub fn needs_upgrade(&self, encoded: &str) -> ButcherResult<bool> {
        let metadata = Metadata::decode(encoded.as_bytes())?;
        Ok(metadata.algorithm() != self.algorithm && metadata.version() < self.min_version)
    }

    /// Appends the configured pepper to the password, if any.
    fn peppered(&self, password: &[u8]) -> Zeroizing<Vec<u8>> {
        let pepper = self.pepper.as_deref().map(Vec::as_slice).unwrap_or(&[]);
        let mut buffer = Vec::with_capacity(password.len() + pepper.len());
        buffer.extend_from_slice(password);
        buffer.extend_from_slice(pepper);
        Zeroizing::new(buffer)
    }
}

/// Builder for [`Butcher`] instances.
///
/// Configuration errors surface at [`build`](ButcherBuilder::build),
/// before any hashing traffic is served.
pub struct ButcherBuilder {
    algorithm: Algorithm,
    salt_factory: NonceFactory,
    pepper: Option<Zeroizing<Vec<u8>>>,
}

impl ButcherBuilder {
    fn new() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM,
            salt_factory: random_nonce(DEFAULT_SALT_LENGTH),
            pepper: None,
        }
    }

    /// Selects the default algorithm used by [`Butcher::hash`].
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Overrides the salt source used when minting new hashes.
    pub fn salt_factory(mut self, salt_factory: NonceFactory) -> Self {
        self.salt_factory = salt_factory;
        self
    }

    /// Sets a static secret appended to every password before derivation.
    ///
    /// The pepper is held in zeroize-on-drop memory and is never part of
    /// the encoded token.
    pub fn pepper(mut self, pepper: Vec<u8>) -> Self {
        self.pepper = Some(Zeroizing::new(pepper));
        self
    }

    /// Validates the configuration and builds the facade.
    ///
    /// The set of algorithms is closed at compile time, so an unknown
    /// default algorithm is unrepresentable today; the fallible signature
    /// keeps the validation seam stable for future runtime-checked
    /// options.
    pub fn build(self) -> ButcherResult<Butcher> {
        let min_version = self.algorithm.current_version();
        Ok(Butcher {
            algorithm: self.algorithm,
            salt_factory: self.salt_factory,
            pepper: self.pepper,
            min_version,
        })
    }
}

static DEFAULT_INSTANCE: LazyLock<Butcher> =
    LazyLock::new(|| Butcher::new().expect("default configuration is valid"));

/// Hashes a password using the process-wide default instance.
pub fn hash(password: &[u8]) -> ButcherResult<String> {
    DEFAULT_INSTANCE.hash(password)
}

/// Verifies a password using the process-wide default instance.
pub fn verify(encoded: &str, password: &[u8]) -> ButcherResult<bool> {
    DEFAULT_INSTANCE.verify(encoded, password)
}

/// Reports upgrade need using the process-wide default instance.
pub fn needs_upgrade(encoded: &str) -> ButcherResult<bool> {
    DEFAULT_INSTANCE.needs_upgrade(encoded)
}
