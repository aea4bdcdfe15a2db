//! Memory-hard strategy backed by Argon2id.
//!
//! Argon2id is the hybrid variant of Argon2, combining the side-channel
//! resistance of Argon2i with the GPU-cracking resistance of Argon2d; this
//! strategy requests it unconditionally. Cost parameters follow published
//! hardening guidance and are revised upward over time; each revision bumps
//! the settings version so stored hashes computed under superseded
//! parameters can be detected.

use crate::error::{ButcherError, ButcherResult};
use crate::hasher::{Algorithm, Metadata, Strategy};

/// Cost parameters for the Argon2id strategy.
///
/// The version counter identifies the parameter revision that produced a
/// hash; bump it whenever `DEFAULT` is hardened.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Settings {
    /// Parameter revision written into produced metadata.
    pub version: u8,
    /// Number of passes over memory.
    pub time_cost: u32,
    /// Memory cost in KiB.
    pub memory_cost_kib: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
    /// Derived key length in bytes.
    pub output_len: usize,
}

impl Argon2Settings {
    /// Production preset: 128 MiB, 4 passes, 4 lanes.
    pub const DEFAULT: Self = Self {
        version: 1,
        time_cost: 4,
        memory_cost_kib: 128 * 1024,
        parallelism: 4,
        output_len: 64,
    };

    /// Fast preset for unit tests only: 1 MiB, single pass.
    pub const TEST: Self = Self {
        version: 1,
        time_cost: 1,
        memory_cost_kib: 1024,
        parallelism: 1,
        output_len: 64,
    };
}

/// Argon2id strategy bound to one salt and one set of cost parameters.
pub struct Argon2Strategy {
    salt: Vec<u8>,
    settings: Argon2Settings,
}

impl Argon2Strategy {
    /// Creates a strategy bound to the given salt.
    pub fn new(salt: Vec<u8>, settings: Argon2Settings) -> Self {
        Self { salt, settings }
    }

    fn derivation_failure(err: impl std::fmt::Display) -> ButcherError {
        log::error!("argon2id key derivation rejected its parameters: {err}");
        ButcherError::DerivationFailure {
            algorithm: Algorithm::Argon2id,
            message: err.to_string(),
        }
    }
}

impl Strategy for Argon2Strategy {
    fn hash(&self, password: &[u8]) -> ButcherResult<Metadata> {
        let params = argon2::Params::new(
            self.settings.memory_cost_kib,
            self.settings.time_cost,
            self.settings.parallelism,
            Some(self.settings.output_len),
        )
        .map_err(Self::derivation_failure)?;
        let context = argon2::Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        );

        let mut digest = vec![0u8; self.settings.output_len];
        context
            .hash_password_into(password, &self.salt, &mut digest)
            .map_err(Self::derivation_failure)?;

        Ok(Metadata::new(
            Algorithm::Argon2id,
            self.settings.version,
            self.salt.clone(),
            digest,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_salt() -> Vec<u8> {
        (0..32).collect()
    }

    #[test]
    fn produces_its_own_registry_identity() {
        let strategy = Argon2Strategy::new(test_salt(), Argon2Settings::TEST);
        let metadata = strategy.hash(b"toto").unwrap();
        assert_eq!(metadata.algorithm(), Algorithm::Argon2id);
        assert_eq!(metadata.version(), Argon2Settings::TEST.version);
        assert_eq!(metadata.salt(), test_salt());
        assert_eq!(metadata.digest().len(), Argon2Settings::TEST.output_len);
    }

    #[test]
    fn deterministic_for_fixed_salt() {
        let strategy = Argon2Strategy::new(test_salt(), Argon2Settings::TEST);
        let first = strategy.hash(b"toto").unwrap();
        let second = strategy.hash(b"toto").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_passwords_produce_different_digests() {
        let strategy = Argon2Strategy::new(test_salt(), Argon2Settings::TEST);
        let first = strategy.hash(b"toto").unwrap();
        let second = strategy.hash(b"titi").unwrap();
        assert_ne!(first.digest(), second.digest());
    }

    #[test]
    fn invalid_parameters_fail_derivation() {
        let settings = Argon2Settings {
            parallelism: 0,
            ..Argon2Settings::TEST
        };
        let strategy = Argon2Strategy::new(test_salt(), settings);
        let result = strategy.hash(b"toto");
        assert!(matches!(
            result,
            Err(ButcherError::DerivationFailure {
                algorithm: Algorithm::Argon2id,
                ..
            })
        ));
    }

    #[test]
    fn too_short_salt_fails_derivation() {
        let strategy = Argon2Strategy::new(vec![0x01], Argon2Settings::TEST);
        let result = strategy.hash(b"toto");
        assert!(matches!(
            result,
            Err(ButcherError::DerivationFailure { .. })
        ));
    }
}
