//! Cryptographic hash-based extraction.
//!
//! Compresses the raw bits through SHA-256, giving a fixed-size output
//! that is uniformly distributed as long as the input carries enough
//! min-entropy.

use crate::bits::Bitstring;
use sha2::{Digest, Sha256};

/// Number of bits in a SHA-256 digest.
pub const DIGEST_BITS: usize = 256;

/// SHA-256 extractor with a configurable output width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashExtractor {
    /// Output width in bits, never more than [`DIGEST_BITS`].
    digest_bits: usize,
}

impl HashExtractor {
    /// Creates an extractor emitting the first `digest_bits` digest bits.
    ///
    /// Widths above 256 are clamped; a digest cannot be stretched.
    pub fn new(digest_bits: usize) -> Self {
        Self {
            digest_bits: digest_bits.min(DIGEST_BITS),
        }
    }

    /// Returns the configured output width.
    #[inline]
    pub fn digest_bits(&self) -> usize {
        self.digest_bits
    }

    /// Hashes the input and returns the leading digest bits.
    ///
    /// The input is packed MSB-first with zero padding to a byte
    /// boundary. Empty input hashes the empty byte string, so the
    /// output width never depends on the input.
    pub fn extract(&self, bits: &Bitstring) -> Bitstring {
        let digest = Sha256::digest(bits.to_bytes());

        let expanded = digest
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1));

        Bitstring::from_bits(expanded.take(self.digest_bits))
    }
}

impl Default for HashExtractor {
    fn default() -> Self {
        Self::new(DIGEST_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Bitstring {
        s.parse().unwrap()
    }

    #[test]
    fn test_full_width_output() {
        let extractor = HashExtractor::default();
        let out = extractor.extract(&bits(&"0101".repeat(64)));
        assert_eq!(out.len(), 256);
    }

    #[test]
    fn test_empty_input_is_hashed() {
        // SHA-256("") = e3b0c442...
        let out = HashExtractor::default().extract(&Bitstring::new());
        assert_eq!(out.len(), 256);
        assert_eq!(&out.as_str()[..16], "1110001110110000");
    }

    #[test]
    fn test_known_vector() {
        // 01100001 is ASCII 'a'; SHA-256("a") = ca978112...
        let out = HashExtractor::default().extract(&bits("01100001"));
        assert_eq!(&out.to_hex()[..8], "ca978112");
    }

    #[test]
    fn test_byte_padding_is_zero_fill() {
        // 0110000 pads to 01100000, the same bytes as the full octet.
        let extractor = HashExtractor::default();
        assert_eq!(
            extractor.extract(&bits("0110000")),
            extractor.extract(&bits("01100000"))
        );
    }

    #[test]
    fn test_truncated_width() {
        let extractor = HashExtractor::new(128);
        let full = HashExtractor::default().extract(&bits("1011"));
        let short = extractor.extract(&bits("1011"));

        assert_eq!(short.len(), 128);
        assert_eq!(short, full.prefix(128));
    }

    #[test]
    fn test_width_clamped() {
        let extractor = HashExtractor::new(1024);
        assert_eq!(extractor.digest_bits(), 256);
        assert_eq!(extractor.extract(&bits("1")).len(), 256);
    }

    #[test]
    fn test_deterministic() {
        let extractor = HashExtractor::default();
        let input = bits("110010101111000011");
        assert_eq!(extractor.extract(&input), extractor.extract(&input));
    }

    #[test]
    fn test_different_input_different_output() {
        let extractor = HashExtractor::default();
        assert_ne!(
            extractor.extract(&bits("0000")),
            extractor.extract(&bits("0001"))
        );
    }
}
