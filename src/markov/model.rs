//! The model store: learned adjacency counts plus the configured alphabet.
//!
//! Tokens are interned to dense `u32` ids on first sight, so the adjacency
//! counts and the frozen successor lists index by id and the walk inner loops
//! touch contiguous memory. Id 0 is always the sentence boundary state.
//!
//! A model is mutable while training and read-only afterwards: the first call
//! to [`Model::obfuscate_with`] or [`Model::deobfuscate`] freezes the counts
//! into sorted successor lists, and any later `learn_*` call discards that
//! cache.
//! Concurrent reads of a frozen model are safe; training is not safe to
//! interleave with them.

use std::collections::HashMap;
use std::sync::OnceLock;

use itertools::Itertools;

use super::{
    decode,
    encode::{self, EncodeError, WalkRng},
    format::{BookFormatter, Formatter},
    radix::{InvalidBase, Radix},
    DecodeError,
};

/// Sentinel spelling of the sentence boundary state.
///
/// Chosen so it cannot collide with any learnable token: the default word rule
/// never produces leading dashes, and the binary formatter never produces
/// multi-character tokens.
pub(crate) const TERM_TEXT: &str = "--terminate--";

/// Interned id of the boundary state, always the first arena entry.
pub(crate) const TERM: TokenId = TokenId(0);

/// Dense id of an interned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct TokenId(pub(crate) u32);

impl TokenId {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Successor list of one token: `(successor, count)` sorted by count
/// descending, ties by token text ascending.
pub(crate) type SuccessorList = Vec<(TokenId, u32)>;

/// The default alphabet size.
pub const DEFAULT_BASE: u16 = 16;

/// A trainable Markov codec over a formatter `F`.
///
/// See the [crate docs](crate) for the full usage story. Two instances trained
/// on identical corpora with the same alphabet size and formatter produce
/// identical successor lists and therefore interoperate.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model<F: Formatter = BookFormatter> {
    format: F,
    radix: Radix,
    /// Token text by id; entry 0 is the boundary sentinel.
    tokens: Vec<String>,
    ids: HashMap<String, TokenId>,
    /// Adjacency counts by predecessor id.
    counts: Vec<HashMap<TokenId, u32>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    frozen: OnceLock<Vec<SuccessorList>>,
}

impl Model<BookFormatter> {
    /// Creates an empty model with the prose formatter.
    ///
    /// `base` is the alphabet size: the base bytes are expanded into and the
    /// out-degree threshold below which one digit spreads over several tokens.
    /// Smaller bases give longer output but encode faster on sparse models.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBase`] unless `base` lies in `2..=256`.
    pub fn new(base: u16) -> Result<Self, InvalidBase> {
        Self::with_formatter(base, BookFormatter)
    }
}

impl Default for Model<BookFormatter> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE).expect("default base is valid")
    }
}

impl<F: Formatter> Model<F> {
    /// Creates an empty model around an arbitrary formatter.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBase`] unless `base` lies in `2..=256`.
    pub fn with_formatter(base: u16, format: F) -> Result<Self, InvalidBase> {
        let radix = Radix::new(base)?;
        let mut ids = HashMap::new();
        ids.insert(TERM_TEXT.to_owned(), TERM);
        Ok(Self {
            format,
            radix,
            tokens: vec![TERM_TEXT.to_owned()],
            ids,
            counts: vec![HashMap::new()],
            frozen: OnceLock::new(),
        })
    }

    /// The configured alphabet size.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.radix.base()
    }

    /// Digits each input byte expands to, including the leading zero.
    #[must_use]
    pub const fn digit_width(&self) -> usize {
        self.radix.width()
    }

    /// Every token ever learned, in interning order.
    #[must_use]
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().skip(1).map(String::as_str)
    }

    /// The successors of `token` with their counts, most frequent first.
    ///
    /// Ties in count are broken by token text ascending, so the ordering is a
    /// pure function of the training input. Returns `None` for a token the
    /// model never learned.
    #[must_use]
    pub fn successors<'a>(
        &'a self,
        token: &str,
    ) -> Option<impl Iterator<Item = (&'a str, u32)> + 'a> {
        let id = self.ids.get(token)?;
        Some(
            self.freeze()[id.index()]
                .iter()
                .map(|&(succ, count)| (self.tokens[succ.index()].as_str(), count)),
        )
    }

    /// Learns one sentence: tokenizes it and counts every adjacency, with the
    /// boundary state standing before the first and after the last token.
    ///
    /// Empty sentences are no-ops. Invalidates the frozen successor cache.
    pub fn learn_sentence(&mut self, raw_sentence: &str) {
        let parts = self.format.split_tokens(raw_sentence);
        if parts.is_empty() {
            return;
        }
        self.frozen.take();
        let mut last = TERM;
        for part in parts {
            let current = self.intern(part);
            self.bump(last, current);
            last = current;
        }
        self.bump(last, TERM);
    }

    /// Learns a whole corpus by splitting it into sentences first.
    pub fn learn_book(&mut self, corpus: &str) {
        let sentences = self.format.split_sentences(corpus);
        for sentence in sentences {
            self.learn_sentence(sentence);
        }
    }

    /// Encodes `data` as model-plausible text using the thread RNG.
    ///
    /// # Errors
    ///
    /// [`EncodeError::Exhausted`] when no encoding walk is found within the
    /// retry budget; a symptom of a too-sparse model, not of the input.
    #[cfg(feature = "rand")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rand")))]
    pub fn obfuscate(&self, data: &[u8]) -> Result<String, EncodeError> {
        self.obfuscate_with(data, &mut encode::RandRng(rand::rng()))
    }

    /// Encodes `data` with an explicit random source.
    ///
    /// A deterministic [`WalkRng`] makes the output reproducible.
    ///
    /// # Errors
    ///
    /// [`EncodeError::Exhausted`] when no encoding walk is found within the
    /// retry budget.
    pub fn obfuscate_with(
        &self,
        data: &[u8],
        rng: &mut impl WalkRng,
    ) -> Result<String, EncodeError> {
        let digits = self.radix.digits_of(data);
        let walk = encode::encode(self, &digits, rng)?;
        let rendered: Vec<String> = walk
            .into_iter()
            .map(|id| {
                if id == TERM {
                    self.format.terminator().to_owned()
                } else {
                    self.tokens[id.index()].clone()
                }
            })
            .collect();
        Ok(self.format.join(&rendered))
    }

    /// Decodes text produced by [`Model::obfuscate_with`] on an identically
    /// trained model back into bytes.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`]; decoding is deterministic and never panics on
    /// malformed input.
    pub fn deobfuscate(&self, encoded: &str) -> Result<Vec<u8>, DecodeError> {
        let parts = self.format.split(encoded);
        let digits = decode::decode(self, &parts)?;
        self.radix.bytes_from(&digits)
    }

    /// Greedily walks the most common transitions from the sentence boundary
    /// until it recurs, rendering the single most likely sentence.
    ///
    /// Mostly a trained-model smoke check. The walk is capped, since an argmax
    /// cycle need not return to the boundary.
    #[must_use]
    pub fn most_likely_sentence(&self) -> String {
        const MAX_WALK: usize = 10_000;

        let lists = self.freeze();
        let mut parts: Vec<&str> = Vec::new();
        let mut last = TERM;
        while parts.len() < MAX_WALK {
            let Some(&(current, _)) = lists[last.index()].first() else {
                break;
            };
            if current == TERM {
                break;
            }
            parts.push(&self.tokens[current.index()]);
            last = current;
        }
        parts.join(" ")
    }

    /// Sorted successor list of `id`, freezing the cache on first use.
    pub(crate) fn successor_ids(&self, id: TokenId) -> &[(TokenId, u32)] {
        &self.freeze()[id.index()]
    }

    pub(crate) fn id_of(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    pub(crate) fn text(&self, id: TokenId) -> &str {
        &self.tokens[id.index()]
    }

    pub(crate) fn terminator(&self) -> &'static str {
        self.format.terminator()
    }

    fn freeze(&self) -> &Vec<SuccessorList> {
        self.frozen.get_or_init(|| {
            self.counts
                .iter()
                .map(|succ| {
                    succ.iter()
                        .map(|(&id, &count)| (id, count))
                        .sorted_by(|a, b| {
                            b.1.cmp(&a.1)
                                .then_with(|| self.tokens[a.0.index()].cmp(&self.tokens[b.0.index()]))
                        })
                        .collect()
                })
                .collect()
        })
    }

    fn intern(&mut self, token: String) -> TokenId {
        if let Some(&id) = self.ids.get(&token) {
            return id;
        }
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(token.clone());
        self.ids.insert(token, id);
        self.counts.push(HashMap::new());
        id
    }

    fn bump(&mut self, from: TokenId, to: TokenId) {
        *self.counts[from.index()].entry(to).or_insert(0) += 1;
    }
}
