//! Facade integration tests exercising the public API end to end.

use rstest::rstest;

use butcher::{Algorithm, Butcher, ButcherError, DEFAULT_ALGORITHM, Metadata};

#[test]
fn default_facade_round_trips() {
    let butcher = Butcher::new().unwrap();

    let first = butcher.hash(b"toto").unwrap();
    assert!(!first.is_empty());

    // Fresh salt per call.
    let second = butcher.hash(b"toto").unwrap();
    assert_ne!(first, second);

    // The module-level convenience functions share the default
    // configuration, so they verify hashes from any default-config facade.
    assert!(butcher::verify(&first, b"toto").unwrap());
    assert!(butcher::verify(&second, b"toto").unwrap());
}

#[rstest]
fn every_strategy_round_trips(
    #[values(
        Algorithm::Argon2id,
        Algorithm::ScryptBlake2b512,
        Algorithm::Pbkdf2HmacSha512,
        Algorithm::Pbkdf2HmacBlake2b512,
        Algorithm::Pbkdf2HmacKeccak512
    )]
    algorithm: Algorithm,
) {
    let butcher = Butcher::builder().algorithm(algorithm).build().unwrap();

    let encoded = butcher.hash(b"toto").unwrap();
    assert!(!encoded.is_empty());
    assert!(butcher.verify(&encoded, b"toto").unwrap());
    assert!(!butcher.verify(&encoded, b"titi").unwrap());
}

#[test]
fn tokens_are_self_describing() {
    // A token carries its own algorithm and salt, so a facade configured
    // with a different default still verifies it.
    let pbkdf2 = Butcher::builder()
        .algorithm(Algorithm::Pbkdf2HmacSha512)
        .build()
        .unwrap();
    let encoded = pbkdf2.hash(b"toto").unwrap();

    let default = Butcher::new().unwrap();
    assert_ne!(default.algorithm(), pbkdf2.algorithm());
    assert!(default.verify(&encoded, b"toto").unwrap());
}

#[test]
fn peppered_memory_hard_scenario() {
    let butcher = Butcher::builder()
        .algorithm(Algorithm::Argon2id)
        .pepper(b"foobar".to_vec())
        .build()
        .unwrap();

    let first = butcher.hash(b"toto").unwrap();
    assert!(!first.is_empty());
    let second = butcher.hash(b"toto").unwrap();
    assert_ne!(first, second);

    assert!(butcher.verify(&first, b"toto").unwrap());
    assert!(butcher.verify(&second, b"toto").unwrap());
    assert!(!butcher.verify(&second, b"titi").unwrap());
}

#[rstest]
#[case::dollars("$$$")]
#[case::more_dollars("$$$$")]
#[case::whitespace("   ")]
#[case::misplaced_padding("hA==")]
fn verify_rejects_malformed_tokens(#[case] token: &str) {
    let butcher = Butcher::new().unwrap();
    assert!(matches!(
        butcher.verify(token, b"toto"),
        Err(ButcherError::InvalidHash { .. })
    ));
}

#[test]
fn verify_rejects_empty_token() {
    let butcher = Butcher::new().unwrap();
    assert!(matches!(
        butcher.verify("", b"toto"),
        Err(ButcherError::InvalidHash { .. })
    ));
}

#[test]
fn verify_rejects_oversized_token() {
    let butcher = Butcher::new().unwrap();
    let token = "A".repeat(Metadata::MAX_ENCODED_LEN + 1);
    assert!(matches!(
        butcher.verify(&token, b"toto"),
        Err(ButcherError::InvalidHash { .. })
    ));
}

#[test]
fn verify_surfaces_unknown_algorithms() {
    // A well-formed token minted by a hypothetical newer build, carrying
    // algorithm identifier 99.
    let token = "hBhjAVggAAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh9YQKurq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6s";

    let butcher = Butcher::new().unwrap();
    assert!(matches!(
        butcher.verify(token, b"toto"),
        Err(ButcherError::StrategyNotSupported { algorithm: 99 })
    ));
}

#[test]
fn fresh_hashes_do_not_need_upgrading() {
    let butcher = Butcher::new().unwrap();
    let encoded = butcher.hash(b"toto").unwrap();
    assert!(!butcher.needs_upgrade(&encoded).unwrap());
}

#[test]
fn superseded_hashes_need_upgrading() {
    let butcher = Butcher::new().unwrap();
    assert_ne!(DEFAULT_ALGORITHM, Algorithm::Pbkdf2HmacKeccak512);

    let stale = Metadata::new(
        Algorithm::Pbkdf2HmacKeccak512,
        0,
        vec![0u8; 32],
        vec![0u8; 64],
    );
    assert!(butcher.needs_upgrade(&stale.pack()).unwrap());
}
