//! Entropy diagnostics.
//!
//! This module reports how balanced a bitstring is. The figures are
//! sanity checks on the output, not cryptographic proofs of entropy.

mod statistics;

pub use statistics::Statistics;
