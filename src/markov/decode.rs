//! The decoding walk: tokens in, digits out.
//!
//! Decoding is the deterministic inverse of the encoding walk. Each received
//! token is ranked among the successors of the previous one; that rank is the
//! digit, except where the previous token's out-degree is below the alphabet
//! size. There the encoder must have spread one digit over a run, so the
//! decoder accumulates ranks and out-degrees until the widths sum past the
//! alphabet size, at which point the ranks sum to the digit. The first digit
//! recovered is always the encoder's randomized opening and is dropped.

use thiserror::Error;

use super::{
    format::Formatter,
    model::{Model, TERM, TERM_TEXT},
};

/// Decoding failed; the encoded text does not match the trained model.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// A received token does not appear in the trained model.
    #[error("token `{0}` does not appear in the trained model")]
    UnknownToken(String),
    /// A received token appears in the model but never follows its
    /// predecessor there.
    #[error("token `{to}` never follows `{from}` in the trained model")]
    BrokenChain {
        /// The predecessor token.
        from: String,
        /// The token that cannot follow it.
        to: String,
    },
    /// A recovered digit lies outside the alphabet.
    #[error("digit {0} is outside the configured alphabet")]
    BadDigit(usize),
    /// The digit stream does not divide into whole byte groups.
    #[error("digit stream length {len} is not a multiple of the byte width {width}")]
    Truncated {
        /// Recovered digit count.
        len: usize,
        /// Digits per byte for this model.
        width: usize,
    },
    /// A digit group exceeds a byte.
    #[error("digit group decodes to {0}, which exceeds a byte")]
    Overflow(usize),
}

/// A digit being re-accumulated across a multi-token run.
struct Run {
    values: Vec<usize>,
    width_sum: usize,
}

/// Recovers the digit stream from split-up encoded parts.
///
/// Empty parts are skipped; the formatter's terminator maps back to the
/// boundary state. The opening digit is dropped before returning.
pub(crate) fn decode<F: Formatter>(
    model: &Model<F>,
    parts: &[String],
) -> Result<Vec<usize>, DecodeError> {
    let base = model.base();
    let terminator = model.terminator();
    let mut last = TERM;
    let mut last_list = model.successor_ids(TERM);
    let mut digits = Vec::new();
    let mut run: Option<Run> = None;

    for part in parts {
        let text = if part == terminator {
            TERM_TEXT
        } else {
            part.as_str()
        };
        if text.is_empty() {
            continue;
        }
        let Some(current) = model.id_of(text) else {
            return Err(DecodeError::UnknownToken(part.clone()));
        };
        let rank = last_list
            .iter()
            .position(|&(id, _)| id == current)
            .ok_or_else(|| DecodeError::BrokenChain {
                from: model.text(last).to_owned(),
                to: part.clone(),
            })?;

        if let Some(mut active) = run.take() {
            active.values.push(rank);
            active.width_sum += last_list.len();
            if active.width_sum >= base {
                digits.push(active.values.iter().sum());
            } else {
                run = Some(active);
            }
        } else if last_list.len() < base {
            // Too narrow to carry a digit alone; a run starts here.
            run = Some(Run {
                values: vec![rank],
                width_sum: last_list.len(),
            });
        } else {
            digits.push(rank);
        }

        last = current;
        last_list = model.successor_ids(current);
    }

    // A run truncated by end of stream still carries its digit.
    if let Some(active) = run {
        digits.push(active.values.iter().sum());
    }

    // The opening digit only carries the encoder's randomized start.
    if !digits.is_empty() {
        digits.remove(0);
    }
    Ok(digits)
}
