//! Salted-adaptive strategy: scrypt over an HMAC-Blake2b-512 pre-hash.
//!
//! The password is first compressed through HMAC-Blake2b-512 keyed with the
//! salt, then fed to scrypt. The pre-hash keeps arbitrarily long passwords
//! within the effective input bounds of the adaptive primitive and binds the
//! salt into the key material twice. A fresh HMAC context is allocated per
//! call; digest contexts are cheap next to the adaptive function's cost, so
//! nothing is shared between calls.

use blake2::Blake2b512;
use hmac::{Mac, SimpleHmac};
use zeroize::Zeroizing;

use crate::error::{ButcherError, ButcherResult};
use crate::hasher::{Algorithm, Metadata, Strategy};

/// Cost parameters for the scrypt strategy.
#[derive(Debug, Clone, Copy)]
pub struct ScryptSettings {
    /// Parameter revision written into produced metadata.
    pub version: u8,
    /// CPU/memory cost as log2(N).
    pub log_n: u8,
    /// Block size parameter.
    pub r: u32,
    /// Parallelization parameter.
    pub p: u32,
    /// Derived key length in bytes.
    pub output_len: usize,
}

impl ScryptSettings {
    /// Production preset: N = 2^17, r = 8, p = 1 (about 128 MiB).
    pub const DEFAULT: Self = Self {
        version: 1,
        log_n: 17,
        r: 8,
        p: 1,
        output_len: 64,
    };

    /// Fast preset for unit tests only: N = 2^10 (about 1 MiB).
    pub const TEST: Self = Self {
        version: 1,
        log_n: 10,
        r: 8,
        p: 1,
        output_len: 64,
    };
}

/// Scrypt+Blake2b-512 strategy bound to one salt and one set of cost
/// parameters.
pub struct ScryptStrategy {
    salt: Vec<u8>,
    settings: ScryptSettings,
}

impl ScryptStrategy {
    /// Creates a strategy bound to the given salt.
    pub fn new(salt: Vec<u8>, settings: ScryptSettings) -> Self {
        Self { salt, settings }
    }

    /// Compresses the password through HMAC-Blake2b-512 keyed with the salt.
    fn prehash(&self, password: &[u8]) -> Zeroizing<Vec<u8>> {
        let mut mac = SimpleHmac::<Blake2b512>::new_from_slice(&self.salt)
            .expect("HMAC accepts keys of any length");
        mac.update(password);
        Zeroizing::new(mac.finalize().into_bytes().to_vec())
    }

    fn derivation_failure(err: impl std::fmt::Display) -> ButcherError {
        log::error!("scrypt key derivation rejected its parameters: {err}");
        ButcherError::DerivationFailure {
            algorithm: Algorithm::ScryptBlake2b512,
            message: err.to_string(),
        }
    }
}

impl Strategy for ScryptStrategy {
    fn hash(&self, password: &[u8]) -> ButcherResult<Metadata> {
        let params = scrypt::Params::new(
            self.settings.log_n,
            self.settings.r,
            self.settings.p,
            self.settings.output_len,
        )
        .map_err(Self::derivation_failure)?;

        let prehashed = self.prehash(password);
        let mut digest = vec![0u8; self.settings.output_len];
        scrypt::scrypt(&prehashed, &self.salt, &params, &mut digest)
            .map_err(Self::derivation_failure)?;

        Ok(Metadata::new(
            Algorithm::ScryptBlake2b512,
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
        let strategy = ScryptStrategy::new(test_salt(), ScryptSettings::TEST);
        let metadata = strategy.hash(b"toto").unwrap();
        assert_eq!(metadata.algorithm(), Algorithm::ScryptBlake2b512);
        assert_eq!(metadata.version(), ScryptSettings::TEST.version);
        assert_eq!(metadata.salt(), test_salt());
        assert_eq!(metadata.digest().len(), ScryptSettings::TEST.output_len);
    }

    #[test]
    fn matches_independent_implementation() {
        // Pipeline computed with CPython's hmac/hashlib over the same salt,
        // password and TEST cost parameters.
        let strategy = ScryptStrategy::new(test_salt(), ScryptSettings::TEST);
        let metadata = strategy.hash(b"toto").unwrap();
        assert_eq!(
            hex::encode(metadata.digest()),
            "0f60103ceea41856c810b4d08f294712a77d1da9f8859d7ee2caf4b5cdf339b4\
             e31db3b0efbb5b11da1045bc326e1ff5f6446ee578fff9c10219f84ceca3681e"
        );
    }

    #[test]
    fn packed_form_is_stable() {
        // Locks the full strategy-to-wire pipeline.
        let strategy = ScryptStrategy::new(test_salt(), ScryptSettings::TEST);
        let metadata = strategy.hash(b"toto").unwrap();
        assert_eq!(
            metadata.pack(),
            "hAIBWCAAAQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eH1hAD2AQPO6kGFbIELTQ\
             jylHEqd9Han4hZ1+4sr0tc3zObTjHbOw77tbEdoQRbwybh/19kRu5Xj/+cECGfhM7KNoHg"
        );
    }

    #[test]
    fn different_salts_produce_different_digests() {
        let first = ScryptStrategy::new(test_salt(), ScryptSettings::TEST)
            .hash(b"toto")
            .unwrap();
        let second = ScryptStrategy::new(vec![0xff; 32], ScryptSettings::TEST)
            .hash(b"toto")
            .unwrap();
        assert_ne!(first.digest(), second.digest());
    }

    #[test]
    fn invalid_parameters_fail_derivation() {
        // N = 2^64 does not fit the cost parameter domain.
        let settings = ScryptSettings {
            log_n: 64,
            ..ScryptSettings::TEST
        };
        let strategy = ScryptStrategy::new(test_salt(), settings);
        let result = strategy.hash(b"toto");
        assert!(matches!(
            result,
            Err(ButcherError::DerivationFailure {
                algorithm: Algorithm::ScryptBlake2b512,
                ..
            })
        ));
    }
}
