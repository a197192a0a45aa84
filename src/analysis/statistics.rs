//! Entropy and bias estimation.
//!
//! These figures describe the frequency of zeros and ones only. A
//! perfectly balanced but predictable sequence (`0101...`) scores the
//! maximum entropy, so they are diagnostics, not proofs of randomness.

use crate::bits::Bitstring;
use serde::Serialize;

/// Frequency statistics for a bitstring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of `0` bits.
    pub zeros: usize,
    /// Number of `1` bits.
    pub ones: usize,
    /// Normalized imbalance `|zeros - ones| / total`, in [0, 1].
    pub bias: f64,
    /// Shannon binary entropy per bit, in [0, 1].
    pub entropy_per_bit: f64,
}

impl Statistics {
    /// Estimates entropy and bias from the bit frequencies.
    pub fn estimate(bits: &Bitstring) -> Self {
        let ones = bits.count_ones();
        let zeros = bits.len() - ones;
        let (entropy_per_bit, bias) = Self::entropy_and_bias(zeros, ones);

        Self {
            zeros,
            ones,
            bias,
            entropy_per_bit,
        }
    }

    fn entropy_and_bias(zeros: usize, ones: usize) -> (f64, f64) {
        let total = zeros + ones;
        if total == 0 {
            return (0.0, 0.0);
        }

        // Constant input: log2(0) is undefined, the limit is zero entropy.
        if zeros == 0 || ones == 0 {
            return (0.0, 1.0);
        }

        let total = total as f64;
        let p0 = zeros as f64 / total;
        let p1 = ones as f64 / total;

        let entropy = -p0 * p0.log2() - p1 * p1.log2();
        let bias = zeros.abs_diff(ones) as f64 / total;

        (entropy, bias)
    }

    /// Number of bits analyzed.
    #[inline]
    pub fn sample_size(&self) -> usize {
        self.zeros + self.ones
    }

    /// Entropy per bit scaled by the sample size.
    pub fn total_entropy(&self) -> f64 {
        self.entropy_per_bit * self.sample_size() as f64
    }
}
