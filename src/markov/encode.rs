//! The encoding walk: digits in, tokens out.
//!
//! Every digit is emitted as the rank of the next token among the current
//! token's successors. A token with more successors than the alphabet size can
//! carry any digit alone; one with fewer spreads the digit across a run of
//! tokens whose out-degrees sum past the alphabet size, found by a
//! backtracking search over the transition graph. The search dead-ending is
//! recoverable: the whole stream is re-encoded with fresh randomness until the
//! retry budget runs out.
//!
//! Randomness enters the walk at exactly two points, both behind the
//! [`WalkRng`] seam: the value carried by the throwaway opening emission, and
//! the order in which the search tries candidate ranks. A deterministic seam
//! pins the whole wire string; decoding never draws at all.

use thiserror::Error;
use tracing::debug;

use super::{
    format::Formatter,
    model::{Model, TokenId, TERM},
};

/// Whole-stream restart budget before giving up.
const MAX_ATTEMPTS: usize = 1000;

/// Encoding failed outright.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodeError {
    /// No encoding walk was found within the retry budget. This is a property
    /// of the trained model being too sparse, not of the input bytes.
    #[error("no encoding walk found after {attempts} attempts; the model is too sparse")]
    Exhausted {
        /// How many whole-stream attempts were made.
        attempts: usize,
    },
}

/// One digit emission dead-ended; the caller restarts the whole stream.
pub(crate) struct AlgorithmFail;

/// Source of the randomness driving an encoding walk.
pub trait WalkRng {
    /// Draws the opening emission's value, anywhere in `0..=alphabet`.
    ///
    /// The inclusive upper end is deliberate: the decoder discards the
    /// opening digit blindly, so the draw may exceed the largest real digit.
    fn opening_value(&mut self, alphabet: usize) -> usize;

    /// Reorders the candidate ranks the digit search tries next.
    fn shuffle_ranks(&mut self, ranks: &mut [usize]);
}

/// Deterministic [`WalkRng`] for tests and replayable encodes.
///
/// Opening values come from a fixed rotation, reduced into the drawn range;
/// the search keeps its rank order untouched. With it, the entire wire string
/// is a pure function of the model and the input bytes.
///
/// ```
/// use markov_obfuscate::markov::encode::{FixedOpenings, WalkRng};
///
/// let mut rng = FixedOpenings::new([1, 2]);
/// assert_eq!(rng.opening_value(16), 1);
/// assert_eq!(rng.opening_value(16), 2);
/// assert_eq!(rng.opening_value(16), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOpenings<const N: usize> {
    values: [usize; N],
    cursor: usize,
}

impl<const N: usize> FixedOpenings<N> {
    /// Creates a rotation over the given opening values.
    #[must_use]
    pub const fn new(values: [usize; N]) -> Self {
        Self { values, cursor: 0 }
    }
}

impl<const N: usize> WalkRng for FixedOpenings<N> {
    fn opening_value(&mut self, alphabet: usize) -> usize {
        if N == 0 {
            return 0;
        }
        let value = self.values[self.cursor % N];
        self.cursor += 1;
        value % (alphabet + 1)
    }

    fn shuffle_ranks(&mut self, _ranks: &mut [usize]) {}
}

/// Production [`WalkRng`] backed by the [`rand`] crate.
///
/// Wraps any [`rand::rand_core::RngCore`]; a seeded `StdRng` still makes an encode
/// reproducible end to end.
///
/// ```
/// use markov_obfuscate::markov::encode::{RandRng, WalkRng};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = RandRng(StdRng::seed_from_u64(42));
/// assert!(rng.opening_value(16) <= 16);
/// ```
#[cfg(feature = "rand")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand")))]
pub struct RandRng<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::rand_core::RngCore> WalkRng for RandRng<R> {
    fn opening_value(&mut self, alphabet: usize) -> usize {
        (self.0.next_u64() % (alphabet as u64 + 1)) as usize
    }

    fn shuffle_ranks(&mut self, ranks: &mut [usize]) {
        for slot in (1..ranks.len()).rev() {
            let pick = (self.0.next_u64() % (slot as u64 + 1)) as usize;
            ranks.swap(slot, pick);
        }
    }
}

/// Encodes a digit stream as a token walk starting from the sentence boundary.
///
/// The walk opens with a throwaway random emission whose digit the decoder
/// drops unconditionally, then emits every real digit in order.
pub(crate) fn encode<F: Formatter>(
    model: &Model<F>,
    digits: &[usize],
    rng: &mut impl WalkRng,
) -> Result<Vec<TokenId>, EncodeError> {
    let base = model.base();
    for attempt in 1..=MAX_ATTEMPTS {
        let opening = rng.opening_value(base);
        match try_encode(model, digits, opening, rng) {
            Ok(walk) => return Ok(walk),
            Err(AlgorithmFail) => {
                debug!(attempt, "encoding walk dead-ended, restarting");
            }
        }
    }
    Err(EncodeError::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}

fn try_encode<F: Formatter>(
    model: &Model<F>,
    digits: &[usize],
    opening: usize,
    rng: &mut impl WalkRng,
) -> Result<Vec<TokenId>, AlgorithmFail> {
    let mut out = emit_value(model, TERM, opening, rng)?;
    let mut last = *out.last().ok_or(AlgorithmFail)?;
    for &digit in digits {
        let emitted = emit_value(model, last, digit, rng)?;
        last = *emitted.last().ok_or(AlgorithmFail)?;
        out.extend(emitted);
    }
    Ok(out)
}

/// Emits the token run carrying one digit `value` after the token `last`.
///
/// With out-degree above the alphabet size the value indexes the successor
/// list directly. Otherwise a depth-first search extends the walk until the
/// out-degrees seen along it sum past the alphabet size; each step consumes
/// part of the value as the rank of the chosen child and the closing token's
/// rank supplies the remainder. Candidate children are visited in shuffled
/// order, and a branch is pruned when closing there could not cover what is
/// left of the value.
fn emit_value<F: Formatter>(
    model: &Model<F>,
    last: TokenId,
    value: usize,
    rng: &mut impl WalkRng,
) -> Result<Vec<TokenId>, AlgorithmFail> {
    let base = model.base();
    let start = model.successor_ids(last);
    if start.len() > base {
        return Ok(vec![start[value].0]);
    }

    let mut stack = vec![(vec![last], value, start.len())];
    while let Some((walk, remaining, count)) = stack.pop() {
        let Some(&tail) = walk.last() else {
            continue;
        };
        let successors = model.successor_ids(tail);

        if count >= base {
            // Enough accumulated width; the remainder ranks the closing token.
            if successors.len() <= remaining {
                continue;
            }
            let mut walk = walk;
            walk.push(successors[remaining].0);
            return Ok(walk.split_off(1));
        }

        if successors.is_empty() {
            // Only an untrained boundary state has no successors at all.
            continue;
        }
        let upper = remaining.min(successors.len() - 1);
        let mut ranks: Vec<usize> = (0..=upper).collect();
        rng.shuffle_ranks(&mut ranks);
        for rank in ranks {
            let (child, _) = successors[rank];
            let child_degree = model.successor_ids(child).len();
            let next_count = count + child_degree;
            let next_remaining = remaining - rank;
            if next_count >= base && child_degree <= next_remaining {
                // The run would close at `child` without covering the rest.
                continue;
            }
            let mut next_walk = walk.clone();
            next_walk.push(child);
            stack.push((next_walk, next_remaining, next_count));
        }
    }
    Err(AlgorithmFail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_model() -> Model {
        let mut model = Model::new(2).unwrap();
        model.learn_book("a b. b a.");
        model
    }

    #[test]
    fn fixed_openings_rotate_and_reduce() {
        let mut rng = FixedOpenings::new([3, 40]);
        assert_eq!(rng.opening_value(16), 3);
        assert_eq!(rng.opening_value(16), 40 % 17);
        assert_eq!(rng.opening_value(16), 3);
    }

    #[test]
    fn single_digit_emissions_close_immediately() {
        // Every vertex has out-degree 2 == base, so each emission is one
        // token whose rank is the digit itself.
        let model = two_state_model();
        let mut rng = FixedOpenings::new([0]);
        let walk = emit_value(&model, TERM, 1, &mut rng).ok().unwrap();
        assert_eq!(walk.len(), 1);
        assert_eq!(model.text(walk[0]), "b");
    }

    #[test]
    fn opening_value_above_every_degree_dead_ends() {
        let model = two_state_model();
        let mut rng = FixedOpenings::new([0]);
        assert!(emit_value(&model, TERM, 2, &mut rng).is_err());
    }

    #[test]
    fn untrained_model_cannot_encode() {
        let model = Model::new(16).unwrap();
        let mut rng = FixedOpenings::new([0]);
        assert_eq!(
            model.obfuscate_with(b"x", &mut rng),
            Err(EncodeError::Exhausted { attempts: 1000 })
        );
    }

    #[test]
    fn exhaustion_surfaces_after_retry_budget() {
        // A one-path chain can never express a nonzero digit.
        let mut model = Model::new(16).unwrap();
        model.learn_sentence("a b");
        let mut rng = FixedOpenings::new([0]);
        assert_eq!(
            model.obfuscate_with(&[0xFF], &mut rng),
            Err(EncodeError::Exhausted { attempts: 1000 })
        );
    }

    #[cfg(feature = "rand")]
    #[test]
    fn rand_draws_stay_in_range_and_permute() {
        use rand::{SeedableRng, rngs::StdRng};

        let mut rng = RandRng(StdRng::seed_from_u64(42));
        for _ in 0..100 {
            assert!(rng.opening_value(16) <= 16);
        }
        let mut ranks = [0usize, 1, 2, 3, 4, 5];
        rng.shuffle_ranks(&mut ranks);
        let mut sorted = ranks;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3, 4, 5]);
    }
}
