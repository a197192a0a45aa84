//! Von Neumann debiasing over adjacent bit pairs.
//!
//! For independent draws with a fixed bias, `01` and `10` are equally
//! likely, so mapping them to distinct output bits removes the bias at
//! the cost of discarding most of the input.

use crate::bits::Bitstring;

/// Pairwise debiasing filter.
///
/// Inspects non-overlapping pairs starting at index 0:
/// `01` emits `0`, `10` emits `1`, `00` and `11` emit nothing.
/// An unpaired trailing bit is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VonNeumannExtractor;

impl VonNeumannExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }

    /// Debiases the input.
    ///
    /// The output length depends on the data: about a quarter of the
    /// input for a fair source, less for a biased one, and zero when
    /// every pair matches.
    pub fn extract(&self, bits: &Bitstring) -> Bitstring {
        let digits = bits.as_str().as_bytes();

        Bitstring::from_bits(digits.chunks_exact(2).filter_map(|pair| match pair {
            [b'0', b'1'] => Some(false),
            [b'1', b'0'] => Some(true),
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(s: &str) -> String {
        VonNeumannExtractor::new()
            .extract(&s.parse().unwrap())
            .into()
    }

    #[test]
    fn test_literal_pairs() {
        // 01 10 00 11 -> 0 1 - -
        assert_eq!(extract("01100011"), "01");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract(""), "");
    }

    #[test]
    fn test_trailing_bit_dropped() {
        assert_eq!(extract("101"), "1");
        assert_eq!(extract("0"), "");
    }

    #[test]
    fn test_matched_pairs_discarded() {
        assert_eq!(extract("00110011"), "");
        assert_eq!(extract(&"1".repeat(64)), "");
    }

    #[test]
    fn test_alternating_yields_half() {
        let out = extract(&"10".repeat(50));
        assert_eq!(out.len(), 50);
        assert!(out.chars().all(|c| c == '1'));
    }
}
