//! Binary digit sequences.
//!
//! Every stage of the pipeline (source, extraction, analysis) speaks
//! in [`Bitstring`]s: ordered, immutable runs of `0`/`1` digits that
//! can be packed into bytes or rendered as hexadecimal.

mod bitstring;

pub use bitstring::{Bitstring, BitstringError};
