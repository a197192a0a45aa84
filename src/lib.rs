//! Quantum Random Bit Service Library
//!
//! Serves random bits measured from a qubit in equal superposition,
//! post-processed to reduce bias, together with entropy and bias
//! diagnostics for every response.
//!
//! # Architecture
//!
//! Each request follows an explicit data flow:
//!
//! ```text
//! source (2N shots) → extraction → reconcile (exactly N bits) → analysis
//! ```
//!
//! - [`source`]: the quantum backend behind the [`RandomnessSource`] trait
//! - [`extraction`]: Von Neumann or SHA-256 extraction, then length fitting
//! - [`analysis`]: Shannon entropy per bit and bias
//! - [`generator`]: validation and orchestration of the stages above
//!
//! # Design Principles
//!
//! - **Explicit source boundary**: the backend is a fallible capability and
//!   can be replaced by a deterministic fake
//! - **Exact lengths**: responses always carry the requested number of bits
//! - **Visible degradation**: tiled or raw-fallback output is logged and counted
//! - **No cryptographic claims**: statistics are sanity checks, not proofs
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use qrng::{
//!     extraction::ExtractorKind,
//!     generator::{GenerateRequest, GeneratorConfig, QuantumRandomGenerator},
//!     source::{Backend, DefaultSourceProvider},
//! };
//!
//! let generator = QuantumRandomGenerator::new(
//!     Arc::new(DefaultSourceProvider::default()),
//!     GeneratorConfig::default(),
//! )
//! .unwrap();
//!
//! let request = GenerateRequest::new(
//!     256,
//!     Backend::Simulator,
//!     ExtractorKind::VonNeumann,
//!     generator.config(),
//! )
//! .unwrap();
//!
//! let result = generator.generate(&request).unwrap();
//! println!("{} (entropy/bit {:.4})", result.hex, result.statistics.entropy_per_bit);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod bits;
pub mod config;
pub mod extraction;
pub mod generator;
pub mod metrics;
#[cfg(feature = "server")]
pub mod server;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::Statistics;
pub use bits::{Bitstring, BitstringError};
pub use config::{ConfigError, FileConfig, ServerConfig};
pub use extraction::{get_extractor, reconcile, Extractor, ExtractorKind, HashExtractor, VonNeumannExtractor};
pub use generator::{
    ErrorCategory, GenerateError, GenerateRequest, GeneratorConfig, QuantumRandomGenerator,
    RandomResult,
};
pub use source::{Backend, DefaultSourceProvider, RandomnessSource, SourceError, SourceProvider};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
