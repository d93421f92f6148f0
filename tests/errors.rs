//! Typed failure paths: bad construction, foreign tokens, corrupt streams.

use markov_obfuscate::markov::{DecodeError, InvalidBase, Model};
use pretty_assertions::assert_eq;

#[test]
fn base_outside_bounds_is_rejected() {
    assert_eq!(Model::new(0).unwrap_err(), InvalidBase(0));
    assert_eq!(Model::new(1).unwrap_err(), InvalidBase(1));
    assert_eq!(Model::new(257).unwrap_err(), InvalidBase(257));
    assert!(Model::new(2).is_ok());
    assert!(Model::new(256).is_ok());
}

#[test]
fn token_never_trained_fails_decode() {
    let corpus = std::fs::read_to_string("tests/files/journal.txt").unwrap();
    let mut model = Model::new(16).unwrap();
    model.learn_book(&corpus);

    assert_eq!(
        model.deobfuscate("qqqq"),
        Err(DecodeError::UnknownToken("qqqq".to_owned()))
    );
}

#[test]
fn trained_token_in_impossible_position_fails_decode() {
    let mut model = Model::new(16).unwrap();
    model.learn_book("alpha beta. gamma delta.");

    // Both tokens are trained, but `delta` never follows `alpha`.
    assert_eq!(
        model.deobfuscate("alpha delta"),
        Err(DecodeError::BrokenChain {
            from: "alpha".to_owned(),
            to: "delta".to_owned(),
        })
    );
}

#[test]
fn misaligned_digit_stream_fails_decode() {
    // Base 2 over a two-token cycle keeps every step in the single-token
    // regime, so two tokens decode to two digits; one survives the guard
    // drop, which cannot fill a nine-digit byte group.
    let mut model = Model::new(2).unwrap();
    model.learn_book("a b. b a.");

    assert_eq!(
        model.deobfuscate("a b"),
        Err(DecodeError::Truncated { len: 1, width: 9 })
    );
}
