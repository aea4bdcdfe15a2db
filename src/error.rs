use thiserror::Error;

use crate::hasher::Algorithm;

/// Errors returned by hashing, verification and decoding operations.
///
/// Nothing is retried internally; every error is returned to the immediate
/// caller. A failed [`verify`](crate::Butcher::verify) call means "could not
/// determine", never "password is wrong".
#[derive(Error, Debug)]
pub enum ButcherError {
    /// The requested or decoded algorithm identifier has no registered
    /// implementation.
    ///
    /// This is the forward-compatibility case: a hash produced by a newer
    /// build can carry an identifier this build does not know. It is never
    /// silently substituted with a default.
    #[error("no hashing strategy registered for algorithm identifier {algorithm}")]
    StrategyNotSupported {
        /// The unrecognized wire identifier.
        algorithm: u8,
    },

    /// The encoded input cannot be parsed into hash metadata.
    ///
    /// Covers malformed base64, truncated or malformed binary records, and
    /// oversized input. The reason is for diagnostics only; login flows
    /// exposed to untrusted actors must treat this the same as a wrong
    /// password to avoid oracle behavior.
    #[error("invalid encoded hash: {reason}")]
    InvalidHash {
        /// What the decoder rejected.
        reason: String,
    },

    /// The underlying key derivation primitive rejected its parameters.
    ///
    /// A configuration defect, not a runtime condition: it is logged at the
    /// failure site and surfaced, never retried.
    #[error("{algorithm} key derivation failed: {message}")]
    DerivationFailure {
        /// The strategy whose primitive failed.
        algorithm: Algorithm,
        /// The primitive's own error message.
        message: String,
    },
}

impl ButcherError {
    pub(crate) fn invalid_hash(reason: impl Into<String>) -> Self {
        Self::InvalidHash {
            reason: reason.into(),
        }
    }
}

/// Result alias for all fallible operations in this crate.
pub type ButcherResult<T> = Result<T, ButcherError>;
