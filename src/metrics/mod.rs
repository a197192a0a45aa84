//! Prometheus metrics for the random bit service.
//!
//! # Metrics Exposed
//!
//! ## Request Metrics
//! - `qrng_requests_total` - Generation requests received
//! - `qrng_request_failures_total{category}` - Failures by error category
//! - `qrng_bits_served_total` - Random bits returned
//!
//! ## Extraction Metrics
//! - `qrng_reconcile_total{outcome}` - Responses by reconcile outcome
//!   (`truncated`, `tiled`, `raw_fallback`). The last two mark
//!   responses whose randomness is weaker than the extractor output.
//!
//! ## Output Quality
//! - `qrng_last_entropy_per_bit` - Entropy per bit of the latest response
//! - `qrng_last_bias` - Bias of the latest response
//!
//! # Example
//!
//! ```no_run
//! use qrng::generator::ErrorCategory;
//! use qrng::metrics::MetricsRegistry;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.record_failure(ErrorCategory::InvalidBits);
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
