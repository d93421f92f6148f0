//! The Markov codec: training, encoding and decoding.
//!
//! This module consists of a model store and two walk directions over it.
//!
//! `model` owns the learned adjacency counts. Training interns every token to a
//! small integer id and counts adjacent pairs per sentence, with a reserved
//! boundary state standing in for both the start and the end of a sentence. The
//! first encode or decode freezes the counts into per-token successor lists sorted
//! by count, and those lists are what both walk directions consume.
//!
//! `encode` turns a digit stream into a token walk: each digit selects the
//! successor with that rank, or, where a token's out-degree is too small to carry
//! a whole digit, a backtracking search spreads the digit over a run of tokens.
//! `decode` inverts the walk by ranking each received token among the successors
//! of the previous one, re-accumulating runs from the same out-degree threshold.
//!
//! `format` decides what a token looks like on the wire; `radix` expands bytes
//! into fixed-width digit groups and back. The randomness driving an encode is
//! injected through [`encode::WalkRng`].
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to train on).
//! - Identical training input and alphabet size must yield identical successor
//!   lists on every instance; ties in count are broken by token text.
//! - Decoding never panics on malformed input; every failure is a typed error.

pub mod decode;
pub mod encode;
pub mod format;
pub mod model;
pub mod radix;

use thiserror::Error;

pub use self::{
    decode::DecodeError,
    encode::{EncodeError, FixedOpenings, WalkRng},
    format::{BinaryFormatter, BookFormatter, Formatter, LyricsFormatter},
    model::Model,
    radix::{InvalidBase, Radix},
};
#[cfg(feature = "rand")]
pub use self::encode::RandRng;

/// An error occurred while obfuscating or deobfuscating with a model.
///
/// Both walk directions convert into this for callers composing the two:
///
/// ```
/// use markov_obfuscate::markov::{MarkovError, Model};
///
/// fn round_trip(model: &Model, data: &[u8]) -> Result<Vec<u8>, MarkovError> {
///     let encoded = model.obfuscate(data)?;
///     Ok(model.deobfuscate(&encoded)?)
/// }
/// # let mut model = Model::new(16).unwrap();
/// # let corpus = std::fs::read_to_string("tests/files/journal.txt").unwrap();
/// # model.learn_book(&corpus);
/// # assert_eq!(round_trip(&model, b"ok").unwrap(), b"ok");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkovError {
    /// An error comes from the encoding walk.
    #[error("encode error: {0}")]
    Encode(EncodeError),
    /// An error comes from the decoding walk.
    #[error("decode error: {0}")]
    Decode(DecodeError),
}

impl From<EncodeError> for MarkovError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}
impl From<DecodeError> for MarkovError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

/// A custom result type for markov-obfuscate.
pub type Result<T> = std::result::Result<T, MarkovError>;
