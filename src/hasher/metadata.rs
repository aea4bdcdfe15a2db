//! Canonical record of a hash computation and its wire encoding.
//!
//! A [`Metadata`] value is the complete, self-describing result of one key
//! derivation: which algorithm produced it, under which parameter version,
//! with which salt, and the derived digest. Those four fields fully determine
//! whether a candidate password is correct; no other state is consulted
//! during verification.
//!
//! # Wire format
//!
//! `base64_nopad( cbor_array[ algorithm: u8, version: u8, salt: bytes,
//! digest: bytes ] )`: a fixed-order CBOR array (not a keyed map, for
//! compactness) encoded with the standard base64 alphabet without `=`
//! padding, so the result travels as a single opaque token.
//!
//! There is no checksum. Correctness of a decoded record is established
//! transitively: verification recomputes the digest and compares the packed
//! bytes, so a corrupted record simply fails to verify.

use std::fmt::Debug;
use std::io::Cursor;

use base64::engine::{Engine as _, general_purpose::STANDARD_NO_PAD};
use ciborium::Value;

use crate::error::{ButcherError, ButcherResult};
use crate::hasher::Algorithm;

/// The result of one hash computation, in memory.
///
/// Constructed once by a strategy at hash time, then immutable. Round-trips
/// through [`pack`](Metadata::pack) / [`decode`](Metadata::decode)
/// field-for-field.
#[derive(Clone, PartialEq, Eq)]
pub struct Metadata {
    algorithm: Algorithm,
    version: u8,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl Metadata {
    /// Largest salt length any registered strategy is configured with.
    pub const MAX_SALT_LEN: usize = 64;

    /// Largest digest length any registered strategy is configured with.
    pub const MAX_DIGEST_LEN: usize = 64;

    /// Upper bound on the raw CBOR record: array header, two small
    /// integers, and two length-prefixed byte strings.
    const MAX_RECORD_LEN: usize =
        1 + 2 + 2 + (2 + Self::MAX_SALT_LEN) + (2 + Self::MAX_DIGEST_LEN);

    /// Maximum accepted length of an encoded hash token, in bytes.
    ///
    /// [`decode`](Metadata::decode) refuses anything longer before touching
    /// it, bounding what an untrusted "hash" string can make the decoder
    /// allocate. Derived from the largest supported salt and digest
    /// combination rather than any single parameter set.
    pub const MAX_ENCODED_LEN: usize = Self::MAX_RECORD_LEN.div_ceil(3) * 4;

    /// Creates a metadata record from its four fields.
    pub fn new(algorithm: Algorithm, version: u8, salt: Vec<u8>, digest: Vec<u8>) -> Self {
        Self {
            algorithm,
            version,
            salt,
            digest,
        }
    }

    /// The strategy that produced this hash and must verify it.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Format/parameter version the hash was computed under.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The per-hash random salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The derived key.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Encodes this record as an opaque transport-safe token.
    pub fn pack(&self) -> String {
        let record = Value::Array(vec![
            Value::Integer(self.algorithm.id().into()),
            Value::Integer(self.version.into()),
            Value::Bytes(self.salt.clone()),
            Value::Bytes(self.digest.clone()),
        ]);
        let mut raw = Vec::with_capacity(Self::MAX_RECORD_LEN);
        ciborium::ser::into_writer(&record, &mut raw)
            .expect("CBOR serialization into a Vec cannot fail");
        STANDARD_NO_PAD.encode(raw)
    }

    /// Decodes an encoded token back into a metadata record.
    ///
    /// # Errors
    ///
    /// Returns [`ButcherError::InvalidHash`] for empty or oversized input,
    /// malformed base64, a malformed or truncated CBOR record, out-of-range
    /// integer fields, or trailing bytes after the record.
    /// Returns [`ButcherError::StrategyNotSupported`] when the record parses
    /// but carries an algorithm identifier this build does not know.
    pub fn decode(input: &[u8]) -> ButcherResult<Self> {
        if input.is_empty() {
            return Err(ButcherError::invalid_hash("empty input"));
        }
        if input.len() > Self::MAX_ENCODED_LEN {
            return Err(ButcherError::invalid_hash(format!(
                "input of {} bytes exceeds the {} byte limit",
                input.len(),
                Self::MAX_ENCODED_LEN
            )));
        }

        let raw = STANDARD_NO_PAD
            .decode(input)
            .map_err(|err| ButcherError::invalid_hash(format!("malformed base64: {err}")))?;

        let mut cursor = Cursor::new(raw.as_slice());
        let record: Value = ciborium::de::from_reader(&mut cursor)
            .map_err(|err| ButcherError::invalid_hash(format!("malformed binary record: {err}")))?;
        if cursor.position() as usize != raw.len() {
            return Err(ButcherError::invalid_hash(
                "trailing bytes after binary record",
            ));
        }

        let Value::Array(fields) = record else {
            return Err(ButcherError::invalid_hash("record is not an array"));
        };
        let [algorithm, version, salt, digest]: [Value; 4] = fields
            .try_into()
            .map_err(|_| ButcherError::invalid_hash("record must hold exactly four fields"))?;

        let algorithm = uint8_field(algorithm, "algorithm")?;
        let version = uint8_field(version, "version")?;
        let salt = bytes_field(salt, "salt")?;
        let digest = bytes_field(digest, "digest")?;

        let algorithm =
            Algorithm::from_id(algorithm).ok_or(ButcherError::StrategyNotSupported { algorithm })?;

        Ok(Self {
            algorithm,
            version,
            salt,
            digest,
        })
    }
}

fn uint8_field(value: Value, field: &str) -> ButcherResult<u8> {
    let Value::Integer(value) = value else {
        return Err(ButcherError::invalid_hash(format!(
            "{field} is not an integer"
        )));
    };
    u8::try_from(i128::from(value))
        .map_err(|_| ButcherError::invalid_hash(format!("{field} is out of range")))
}

fn bytes_field(value: Value, field: &str) -> ButcherResult<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        _ => Err(ButcherError::invalid_hash(format!(
            "{field} is not a byte string"
        ))),
    }
}

impl Debug for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metadata")
            .field("algorithm", &self.algorithm)
            .field("version", &self.version)
            .field("salt", &hex::encode(&self.salt))
            .field("digest", &hex::encode(&self.digest))
            .finish()
    }
}
