//! Metrics collection and registry.

use crate::generator::{ErrorCategory, RandomResult};
use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus metrics registry for the random bit service.
///
/// All metrics are atomics, so a registry can be shared across
/// request handlers without locking.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,

    // Request metrics
    requests_total: IntCounter,
    failures_total: IntCounterVec,
    bits_served_total: IntCounter,

    // Extraction metrics
    reconcile_total: IntCounterVec,

    // Output quality of the most recent response
    last_entropy_per_bit: Gauge,
    last_bias: Gauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all service metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_total = IntCounter::new(
            "qrng_requests_total",
            "Total number of generation requests received",
        )?;
        let failures_total = IntCounterVec::new(
            Opts::new(
                "qrng_request_failures_total",
                "Failed generation requests by error category",
            ),
            &["category"],
        )?;
        let bits_served_total = IntCounter::new(
            "qrng_bits_served_total",
            "Total number of random bits returned",
        )?;
        let reconcile_total = IntCounterVec::new(
            Opts::new(
                "qrng_reconcile_total",
                "Responses by how extractor output was fitted to length",
            ),
            &["outcome"],
        )?;
        let last_entropy_per_bit = Gauge::new(
            "qrng_last_entropy_per_bit",
            "Shannon entropy per bit of the most recent response",
        )?;
        let last_bias = Gauge::new(
            "qrng_last_bias",
            "Zero/one imbalance of the most recent response",
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(bits_served_total.clone()))?;
        registry.register(Box::new(reconcile_total.clone()))?;
        registry.register(Box::new(last_entropy_per_bit.clone()))?;
        registry.register(Box::new(last_bias.clone()))?;

        // Pre-create labelled series so they are scraped as zero.
        for category in ErrorCategory::ALL {
            failures_total.with_label_values(&[category.as_str()]);
        }
        for outcome in ["truncated", "tiled", "raw_fallback"] {
            reconcile_total.with_label_values(&[outcome]);
        }

        Ok(Self {
            registry,
            requests_total,
            failures_total,
            bits_served_total,
            reconcile_total,
            last_entropy_per_bit,
            last_bias,
        })
    }

    /// Records a successful generation.
    pub fn record_success(&self, result: &RandomResult) {
        self.requests_total.inc();
        self.bits_served_total.inc_by(result.bits.len() as u64);
        self.reconcile_total
            .with_label_values(&[result.outcome.as_str()])
            .inc();
        self.last_entropy_per_bit
            .set(result.statistics.entropy_per_bit);
        self.last_bias.set(result.statistics.bias);
    }

    /// Records a failed request.
    pub fn record_failure(&self, category: ErrorCategory) {
        self.requests_total.inc();
        self.failures_total
            .with_label_values(&[category.as_str()])
            .inc();
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
