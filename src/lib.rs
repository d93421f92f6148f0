//! Reversible byte-to-text codec driven by a Markov model.
//!
//! Two parties train a [`markov::Model`] on the same corpus, which then acts as a
//! pre-shared key: any byte string can be converted into a sequence of tokens that,
//! transition by transition, the model itself could have generated, and converted
//! back by the other party. The scheme is not a cipher, since whoever holds the
//! corpus can decode, but the wire text reads as prose rather than ciphertext.
//!
//! # Usage
//!
//! Train identical models on both sides, then round-trip arbitrary bytes:
//!
//! ```
//! use markov_obfuscate::markov::Model;
//!
//! let corpus = std::fs::read_to_string("tests/files/journal.txt").unwrap();
//!
//! let mut sender = Model::new(16).unwrap();
//! sender.learn_book(&corpus);
//! let mut receiver = Model::new(16).unwrap();
//! receiver.learn_book(&corpus);
//!
//! let encoded = sender.obfuscate(b"attack at dawn").unwrap();
//! assert_eq!(receiver.deobfuscate(&encoded).unwrap(), b"attack at dawn");
//! ```
//!
//! Both sides must agree on the corpus, the alphabet size passed to
//! [`markov::Model::new`], and the formatter. Encoding is randomized, so the same
//! input produces different text on each call; decoding is deterministic.
//!
//! # How it works
//!
//! Each input byte is expanded into a fixed number of base-`B` digits. The encoder
//! walks the model's transition graph so that every digit becomes the rank of the
//! chosen successor among the current token's successors, sorted by observed count.
//! Where a token has too few successors to express a whole digit, the digit is
//! spread over a run of several tokens whose out-degrees sum past `B`; the decoder
//! detects those runs from the same out-degree information and re-accumulates the
//! digit. See the [`markov`] module docs for the full walk semantics.
//!
//! # Features
//!
//! - `rand` (default) enables `markov::encode::RandRng` and the convenience
//!   `markov::Model::obfuscate` entry point backed by the thread RNG.
//! - `serde` derives [`serde::Serialize`] and [`serde::Deserialize`] for the model
//!   and formatter types, so a trained model can be stored or shipped.
//! - `cli` builds the `obfuscate` binary, which wraps the codec with zlib
//!   compression for file payloads.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod markov;

pub use markov::{
    BinaryFormatter, BookFormatter, DecodeError, EncodeError, Formatter, InvalidBase,
    LyricsFormatter, MarkovError, Model,
};
