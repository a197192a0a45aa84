//! Fitting extractor output to the requested length.
//!
//! Extractors produce a data-dependent (Von Neumann) or fixed (hash)
//! number of bits, while callers ask for an exact count. This stage
//! truncates, tiles, or falls back to the raw measurements so the
//! output always has the requested length.

use crate::bits::Bitstring;
use serde::Serialize;

/// How the final bits were obtained from the extractor output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Extractor produced enough bits; the tail was dropped.
    Truncated,
    /// Extractor output was repeated end to end. Bits are reused, so
    /// the output carries no more entropy than `extracted` bits.
    Tiled {
        /// Length of the extractor output that was repeated.
        extracted: usize,
    },
    /// Extractor produced nothing; raw (undebiased) bits were used.
    RawFallback,
}

impl ReconcileOutcome {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Truncated => "truncated",
            ReconcileOutcome::Tiled { .. } => "tiled",
            ReconcileOutcome::RawFallback => "raw_fallback",
        }
    }

    /// Returns true when the output is weaker than the extractor output.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ReconcileOutcome::Truncated)
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Bits of exactly the requested length.
    pub bits: Bitstring,
    /// Which policy branch produced them.
    pub outcome: ReconcileOutcome,
}

/// Reconciles extractor output with the desired length.
///
/// Postcondition: `bits.len() == desired` whenever `raw` holds at least
/// `desired` bits. With fewer raw bits the raw fallback can only return
/// what it has.
pub fn reconcile(extracted: Bitstring, raw: &Bitstring, desired: usize) -> Reconciled {
    if extracted.is_empty() {
        return Reconciled {
            bits: raw.prefix(desired),
            outcome: ReconcileOutcome::RawFallback,
        };
    }

    if extracted.len() < desired {
        let repetitions = desired / extracted.len() + 1;
        return Reconciled {
            bits: extracted.repeat(repetitions).prefix(desired),
            outcome: ReconcileOutcome::Tiled {
                extracted: extracted.len(),
            },
        };
    }

    Reconciled {
        bits: extracted.prefix(desired),
        outcome: ReconcileOutcome::Truncated,
    }
}
