//! Fixed-width base conversion between bytes and digit streams.

use thiserror::Error;

use super::decode::DecodeError;

/// The alphabet size passed to a model was outside `2..=256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("alphabet size must lie in 2..=256, got {0}")]
pub struct InvalidBase(pub u16);

/// Converts bytes to and from fixed-width big-endian base-`B` digit groups.
///
/// Every byte expands to exactly [`Radix::width`] digits. The width is one more
/// than the minimum needed to express 255, so each group carries a leading zero
/// digit. That slack is what lets the decoder discard the digit produced by the
/// encoder's randomized opening walk without losing byte alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Radix {
    base: usize,
    width: usize,
}

impl Radix {
    /// Creates a converter for the given alphabet size.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBase`] unless `base` lies in `2..=256`.
    pub fn new(base: u16) -> Result<Self, InvalidBase> {
        if !(2..=256).contains(&base) {
            return Err(InvalidBase(base));
        }
        let base = base as usize;
        let mut width = 1;
        let mut span = base;
        while span < 256 {
            span *= base;
            width += 1;
        }
        Ok(Self {
            base,
            width: width + 1,
        })
    }

    /// The alphabet size.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Digits per byte, including the leading zero.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Appends the digits of `byte`, most significant first, to `out`.
    pub fn push_digits(&self, byte: u8, out: &mut Vec<usize>) {
        let end = out.len() + self.width;
        out.resize(end, 0);
        let mut rest = byte as usize;
        let mut slot = end;
        while rest > 0 {
            slot -= 1;
            out[slot] = rest % self.base;
            rest /= self.base;
        }
    }

    /// Expands a whole byte string into one digit stream.
    #[must_use]
    pub fn digits_of(&self, data: &[u8]) -> Vec<usize> {
        let mut out = Vec::with_capacity(data.len() * self.width);
        for &byte in data {
            self.push_digits(byte, &mut out);
        }
        out
    }

    /// Reassembles a digit stream into bytes.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Truncated`] if the stream length is not a multiple of the
    /// width, [`DecodeError::BadDigit`] on a digit outside the alphabet, and
    /// [`DecodeError::Overflow`] if a group exceeds a byte.
    pub fn bytes_from(&self, digits: &[usize]) -> Result<Vec<u8>, DecodeError> {
        if digits.len() % self.width != 0 {
            tracing::debug!(
                len = digits.len(),
                width = self.width,
                "digit stream does not divide into byte groups"
            );
            return Err(DecodeError::Truncated {
                len: digits.len(),
                width: self.width,
            });
        }
        digits
            .chunks(self.width)
            .map(|group| {
                let mut value = 0usize;
                for &digit in group {
                    if digit >= self.base {
                        return Err(DecodeError::BadDigit(digit));
                    }
                    value = value * self.base + digit;
                }
                u8::try_from(value).map_err(|_| DecodeError::Overflow(value))
            })
            .collect()
    }
}
