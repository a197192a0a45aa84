//! Bitstring type shared by every pipeline stage.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing text into a [`Bitstring`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitstringError {
    #[error("invalid binary digit {found:?} at index {index}")]
    InvalidDigit { index: usize, found: char },
}

/// An ordered sequence of binary digits.
///
/// Stored as ASCII `'0'`/`'1'` text so it can be rendered and
/// serialized without conversion. Every constructor upholds that
/// invariant, which is why there is no mutable access.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitstring {
    digits: String,
}

impl Bitstring {
    /// Creates an empty bitstring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bitstring from a sequence of booleans (`true` = `1`).
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let digits = bits
            .into_iter()
            .map(|bit| if bit { '1' } else { '0' })
            .collect();
        Self { digits }
    }

    /// Keeps only the `0` and `1` characters of arbitrary text.
    ///
    /// Used for loosely formatted input such as files with line breaks
    /// or grouping spaces.
    pub fn from_text_lenient(text: &str) -> Self {
        let digits = text.chars().filter(|c| matches!(c, '0' | '1')).collect();
        Self { digits }
    }

    /// Returns the digits as text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Returns the number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if there are no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.digits.bytes().map(|b| b == b'1')
    }

    /// Counts the set bits.
    pub fn count_ones(&self) -> usize {
        self.digits.bytes().filter(|&b| b == b'1').count()
    }

    /// Counts the clear bits.
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Returns the first `n` bits (or all of them if shorter).
    pub fn prefix(&self, n: usize) -> Self {
        let end = n.min(self.len());
        Self {
            digits: self.digits[..end].to_owned(),
        }
    }

    /// Repeats the bits end to end `times` times.
    pub fn repeat(&self, times: usize) -> Self {
        Self {
            digits: self.digits.repeat(times),
        }
    }

    /// Packs the bits into bytes, most significant bit first.
    ///
    /// A trailing partial byte is padded on the right with zero bits.
    /// The padding is framing only and adds no entropy.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.digits
            .as_bytes()
            .chunks(8)
            .map(|chunk| {
                let byte = chunk
                    .iter()
                    .fold(0u8, |acc, &digit| (acc << 1) | u8::from(digit == b'1'));
                byte << (8 - chunk.len())
            })
            .collect()
    }

    /// Renders the bits as lowercase hexadecimal.
    ///
    /// The bits are read as a big-endian unsigned integer and padded to
    /// `ceil(len / 4)` digits. An empty bitstring renders as `""`.
    pub fn to_hex(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        // Left-pad to whole nibbles so leading zeros keep their width.
        let lead = (4 - self.len() % 4) % 4;
        let mut padded = Vec::with_capacity(lead + self.len());
        padded.resize(lead, b'0');
        padded.extend_from_slice(self.digits.as_bytes());

        padded
            .chunks(4)
            .map(|nibble| {
                let value = nibble
                    .iter()
                    .fold(0u32, |acc, &digit| (acc << 1) | u32::from(digit == b'1'));
                char::from_digit(value, 16).unwrap_or('0')
            })
            .collect()
    }
}

impl FromStr for Bitstring {
    type Err = BitstringError;

    /// Parses strict `0`/`1` text. Any other character is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((index, found)) = s.chars().enumerate().find(|(_, c)| !matches!(c, '0' | '1')) {
            return Err(BitstringError::InvalidDigit { index, found });
        }
        Ok(Self {
            digits: s.to_owned(),
        })
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl fmt::Debug for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 32;
        let preview = &self.digits[..self.len().min(PREVIEW)];
        f.debug_struct("Bitstring")
            .field("len", &self.len())
            .field("ones", &self.count_ones())
            .field(
                "bits",
                &format_args!("{}{}", preview, if self.len() > PREVIEW { "…" } else { "" }),
            )
            .finish()
    }
}

impl Serialize for Bitstring {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.digits)
    }
}

impl From<Bitstring> for String {
    fn from(bits: Bitstring) -> Self {
        bits.digits
    }
}
