//! Entropy extraction and length reconciliation.
//!
//! This module turns raw measurement bits into debiased output. Two
//! strategies are available:
//!
//! - [`VonNeumannExtractor`]: pairwise debiasing, variable output length
//! - [`HashExtractor`]: SHA-256 compression, fixed output length
//!
//! Because extractor output rarely matches the requested length,
//! [`reconcile`] fits it to size afterwards.

mod hash;
mod reconcile;
mod von_neumann;

pub use hash::{HashExtractor, DIGEST_BITS};
pub use reconcile::{reconcile, ReconcileOutcome, Reconciled};
pub use von_neumann::VonNeumannExtractor;

use crate::bits::Bitstring;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Names of the available extraction strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Pairwise debiasing.
    #[default]
    VonNeumann,
    /// SHA-256 compression.
    Hash,
}

impl ExtractorKind {
    /// Returns the wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::VonNeumann => "von_neumann",
            ExtractorKind::Hash => "hash",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by strict parsing of an extractor name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown extractor {0:?} (expected von_neumann or hash)")]
pub struct UnknownExtractor(pub String);

impl FromStr for ExtractorKind {
    type Err = UnknownExtractor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "von_neumann" => Ok(ExtractorKind::VonNeumann),
            "hash" => Ok(ExtractorKind::Hash),
            other => Err(UnknownExtractor(other.to_owned())),
        }
    }
}

/// An extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// Pairwise debiasing.
    VonNeumann(VonNeumannExtractor),
    /// SHA-256 compression.
    Hash(HashExtractor),
}

impl Extractor {
    /// Builds the extractor for `kind`, with the hash output width
    /// set to `digest_bits`.
    pub fn for_kind(kind: ExtractorKind, digest_bits: usize) -> Self {
        match kind {
            ExtractorKind::VonNeumann => Extractor::VonNeumann(VonNeumannExtractor::new()),
            ExtractorKind::Hash => Extractor::Hash(HashExtractor::new(digest_bits)),
        }
    }

    /// Returns which strategy this is.
    pub fn kind(&self) -> ExtractorKind {
        match self {
            Extractor::VonNeumann(_) => ExtractorKind::VonNeumann,
            Extractor::Hash(_) => ExtractorKind::Hash,
        }
    }

    /// Runs the strategy over the raw bits.
    pub fn extract(&self, bits: &Bitstring) -> Bitstring {
        match self {
            Extractor::VonNeumann(inner) => inner.extract(bits),
            Extractor::Hash(inner) => inner.extract(bits),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::VonNeumann(VonNeumannExtractor::new())
    }
}

/// Selects an extractor by name.
///
/// Only `"hash"` selects the hash extractor. Every other value,
/// including unknown names, selects Von Neumann without error. Use
/// [`ExtractorKind::from_str`] where unknown names must be rejected.
pub fn get_extractor(mode: &str) -> Extractor {
    match mode {
        "hash" => Extractor::Hash(HashExtractor::default()),
        "von_neumann" => Extractor::default(),
        other => {
            tracing::debug!(mode = other, "Unrecognized extractor, using von_neumann");
            Extractor::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extractor_hash() {
        assert_eq!(get_extractor("hash").kind(), ExtractorKind::Hash);
    }

    #[test]
    fn test_get_extractor_fallback() {
        let input: Bitstring = "0110100111000110".parse().unwrap();
        let fallback = get_extractor("anything-unrecognized");

        assert_eq!(fallback, get_extractor("von_neumann"));
        assert_eq!(
            fallback.extract(&input),
            get_extractor("von_neumann").extract(&input)
        );
        // Matching is exact; case variants fall back too.
        assert_eq!(get_extractor("HASH").kind(), ExtractorKind::VonNeumann);
    }

    #[test]
    fn test_strict_parsing() {
        assert_eq!("hash".parse::<ExtractorKind>(), Ok(ExtractorKind::Hash));
        assert_eq!("von_neumann".parse::<ExtractorKind>(), Ok(ExtractorKind::VonNeumann));
        assert!("xor".parse::<ExtractorKind>().is_err());
    }

    #[test]
    fn test_for_kind_passes_width() {
        let extractor = Extractor::for_kind(ExtractorKind::Hash, 64);
        let out = extractor.extract(&"1010".parse().unwrap());
        assert_eq!(out.len(), 64);
    }
}
