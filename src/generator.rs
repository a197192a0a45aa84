//! Request validation and pipeline orchestration.
//!
//! A generation request flows through the stages in a fixed order:
//!
//! ```text
//! validate → source (N × oversample shots) → extract → reconcile → estimate
//! ```
//!
//! Validation happens before any source is opened, and nothing is
//! returned unless every stage succeeds.

use crate::analysis::Statistics;
use crate::bits::Bitstring;
use crate::config::ConfigError;
use crate::extraction::{reconcile, Extractor, ExtractorKind, ReconcileOutcome, DIGEST_BITS};
use crate::source::{Backend, SourceError, SourceProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Bits returned when the request does not say.
    pub default_bits: usize,
    /// Largest request accepted.
    pub max_bits: usize,
    /// Raw shots requested per output bit. Von Neumann keeps about a
    /// quarter of its input, so this is a heuristic overcommit.
    pub oversample_factor: usize,
    /// Output width of the hash extractor.
    pub hash_digest_bits: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_bits: 256,
            max_bits: 4096,
            oversample_factor: 2,
            hash_digest_bits: DIGEST_BITS,
        }
    }
}

impl GeneratorConfig {
    /// Checks that every accepted request can be served at full length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bits == 0 {
            return Err(ConfigError::InvalidMaxBits);
        }
        if self.default_bits == 0 || self.default_bits > self.max_bits {
            return Err(ConfigError::InvalidDefaultBits {
                default: self.default_bits,
                max: self.max_bits,
            });
        }
        if self.oversample_factor == 0 {
            return Err(ConfigError::InvalidOversample);
        }
        if self.hash_digest_bits == 0 {
            return Err(ConfigError::InvalidDigestBits);
        }
        Ok(())
    }
}

/// Malformed or out-of-range request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bits must be an integer, got {0:?}")]
    BitsNotInteger(String),
    #[error("bits must be between 1 and {max}, got {requested}")]
    BitsOutOfRange { requested: i64, max: usize },
    #[error("mode must be simulator or ibmq, got {0:?}")]
    UnknownMode(String),
    #[error("extractor must be von_neumann or hash, got {0:?}")]
    UnknownExtractor(String),
}

/// Stable, machine-readable failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// `bits` is not an integer or is out of range.
    InvalidBits,
    /// `mode` or `extractor` names an unknown option.
    InvalidOption,
    /// The backend is not available.
    SourceUnavailable,
    /// The backend failed while running the job.
    SourceFailed,
}

impl ErrorCategory {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidBits => "invalid_bits",
            ErrorCategory::InvalidOption => "invalid_option",
            ErrorCategory::SourceUnavailable => "source_unavailable",
            ErrorCategory::SourceFailed => "source_failed",
        }
    }

    /// All categories, in a fixed order.
    pub const ALL: [ErrorCategory; 4] = [
        ErrorCategory::InvalidBits,
        ErrorCategory::InvalidOption,
        ErrorCategory::SourceUnavailable,
        ErrorCategory::SourceFailed,
    ];
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by [`QuantumRandomGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl GenerateError {
    /// Classifies the error for callers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenerateError::Validation(
                ValidationError::BitsNotInteger(_) | ValidationError::BitsOutOfRange { .. },
            ) => ErrorCategory::InvalidBits,
            GenerateError::Validation(
                ValidationError::UnknownMode(_) | ValidationError::UnknownExtractor(_),
            ) => ErrorCategory::InvalidOption,
            GenerateError::Source(SourceError::Unavailable(_)) => ErrorCategory::SourceUnavailable,
            GenerateError::Source(SourceError::Execution(_)) => ErrorCategory::SourceFailed,
        }
    }
}

/// A validated generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Exact number of output bits.
    pub bits: usize,
    /// Backend supplying raw measurements.
    pub backend: Backend,
    /// Extraction strategy.
    pub extractor: ExtractorKind,
}

impl GenerateRequest {
    /// Validates raw request parameters.
    ///
    /// Missing parameters take their defaults. `mode` and `extractor`
    /// are matched case-insensitively.
    pub fn from_params(
        bits: Option<&str>,
        mode: Option<&str>,
        extractor: Option<&str>,
        config: &GeneratorConfig,
    ) -> Result<Self, ValidationError> {
        let bits = match bits {
            None => config.default_bits,
            Some(raw) => {
                let requested: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::BitsNotInteger(raw.to_owned()))?;
                Self::check_range(requested, config.max_bits)?
            }
        };

        let backend = match mode {
            None => Backend::default(),
            Some(raw) => raw
                .to_lowercase()
                .parse()
                .map_err(|_| ValidationError::UnknownMode(raw.to_owned()))?,
        };

        let extractor = match extractor {
            None => ExtractorKind::default(),
            Some(raw) => raw
                .to_lowercase()
                .parse()
                .map_err(|_| ValidationError::UnknownExtractor(raw.to_owned()))?,
        };

        Ok(Self {
            bits,
            backend,
            extractor,
        })
    }

    /// Builds a request from typed values, checking only the range.
    pub fn new(
        bits: usize,
        backend: Backend,
        extractor: ExtractorKind,
        config: &GeneratorConfig,
    ) -> Result<Self, ValidationError> {
        let requested = i64::try_from(bits).unwrap_or(i64::MAX);
        let bits = Self::check_range(requested, config.max_bits)?;
        Ok(Self {
            bits,
            backend,
            extractor,
        })
    }

    fn check_range(requested: i64, max: usize) -> Result<usize, ValidationError> {
        match usize::try_from(requested) {
            Ok(bits) if (1..=max).contains(&bits) => Ok(bits),
            _ => Err(ValidationError::BitsOutOfRange { requested, max }),
        }
    }
}

/// Output of a successful generation.
#[derive(Debug, Clone)]
pub struct RandomResult {
    /// Final bits, exactly as many as requested.
    pub bits: Bitstring,
    /// Hexadecimal rendering of `bits`.
    pub hex: String,
    /// Frequency statistics of `bits`.
    pub statistics: Statistics,
    /// How extractor output was fitted to length.
    pub outcome: ReconcileOutcome,
    /// Backend that produced the raw bits.
    pub backend: Backend,
    /// Extractor applied to the raw bits.
    pub extractor: ExtractorKind,
}

/// Response payload for a successful request.
#[derive(Debug, Clone, Serialize)]
pub struct RandomResponse {
    /// Random bits as `0`/`1` text.
    pub bits: Bitstring,
    /// Hexadecimal rendering of `bits`.
    pub hex: String,
    /// Entropy per bit times length.
    pub entropy_estimate: f64,
    /// Number of bits.
    pub length: usize,
    /// Frequency statistics of `bits`.
    pub statistics: Statistics,
}

impl RandomResult {
    /// Total entropy estimate: entropy per bit times length.
    pub fn entropy_estimate(&self) -> f64 {
        self.statistics.total_entropy()
    }

    /// Builds the response payload.
    pub fn to_response(&self) -> RandomResponse {
        RandomResponse {
            bits: self.bits.clone(),
            hex: self.hex.clone(),
            entropy_estimate: self.entropy_estimate(),
            length: self.bits.len(),
            statistics: self.statistics,
        }
    }
}

/// Orchestrates source, extraction, reconciliation and estimation.
///
/// Holds no per-request state; clones share the provider.
#[derive(Clone)]
pub struct QuantumRandomGenerator {
    provider: Arc<dyn SourceProvider>,
    config: GeneratorConfig,
}

impl QuantumRandomGenerator {
    /// Creates a generator drawing from `provider`.
    ///
    /// Fails when `config` could produce output shorter than requested.
    pub fn new(
        provider: Arc<dyn SourceProvider>,
        config: GeneratorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Returns the generator settings.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the full pipeline for a validated request.
    ///
    /// Blocks for as long as the source takes to measure.
    pub fn generate(&self, request: &GenerateRequest) -> Result<RandomResult, GenerateError> {
        let shots = request.bits.saturating_mul(self.config.oversample_factor);

        let mut source = self.provider.open(request.backend)?;
        tracing::debug!(
            source = source.name(),
            shots,
            "Requesting raw measurements"
        );

        let raw = source.measure(shots)?;
        if raw.len() != shots {
            return Err(SourceError::Execution(format!(
                "{} returned {} bits, expected {}",
                source.name(),
                raw.len(),
                shots
            ))
            .into());
        }

        let extractor = Extractor::for_kind(request.extractor, self.config.hash_digest_bits);
        let extracted = extractor.extract(&raw);
        let extracted_len = extracted.len();

        let reconciled = reconcile(extracted, &raw, request.bits);
        if reconciled.outcome.is_degraded() {
            tracing::warn!(
                outcome = reconciled.outcome.as_str(),
                extractor = %request.extractor,
                extracted = extracted_len,
                requested = request.bits,
                "Extractor output shorter than requested; randomness is weakened"
            );
        }

        let statistics = Statistics::estimate(&reconciled.bits);
        let hex = reconciled.bits.to_hex();

        tracing::info!(
            bits = request.bits,
            backend = %request.backend,
            extractor = %request.extractor,
            entropy_per_bit = statistics.entropy_per_bit,
            bias = statistics.bias,
            "Generated random bits"
        );

        Ok(RandomResult {
            bits: reconciled.bits,
            hex,
            statistics,
            outcome: reconciled.outcome,
            backend: request.backend,
            extractor: request.extractor,
        })
    }
}

impl fmt::Debug for QuantumRandomGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumRandomGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DefaultSourceProvider, RandomnessSource, ReplaySource, SimulatorConfig};

    fn replay(pattern: &'static str) -> QuantumRandomGenerator {
        let provider = move |_: Backend| -> Result<Box<dyn RandomnessSource>, SourceError> {
            Ok(Box::new(ReplaySource::new(pattern.parse().unwrap())))
        };
        QuantumRandomGenerator::new(Arc::new(provider), GeneratorConfig::default()).unwrap()
    }

    fn request(bits: usize, extractor: ExtractorKind) -> GenerateRequest {
        GenerateRequest::new(bits, Backend::Simulator, extractor, &GeneratorConfig::default())
            .unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let req = GenerateRequest::from_params(None, None, None, &GeneratorConfig::default())
            .unwrap();
        assert_eq!(req.bits, 256);
        assert_eq!(req.backend, Backend::Simulator);
        assert_eq!(req.extractor, ExtractorKind::VonNeumann);
    }

    #[test]
    fn test_params_case_insensitive() {
        let req = GenerateRequest::from_params(
            Some("8"),
            Some("IBMQ"),
            Some("Hash"),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert_eq!(req.backend, Backend::Ibmq);
        assert_eq!(req.extractor, ExtractorKind::Hash);
    }

    #[test]
    fn test_params_rejected() {
        let config = GeneratorConfig::default();
        let check = |bits, mode, extractor| {
            GenerateRequest::from_params(bits, mode, extractor, &config)
                .map_err(|e| GenerateError::from(e).category())
        };

        assert_eq!(check(Some("abc"), None, None), Err(ErrorCategory::InvalidBits));
        assert_eq!(check(Some("0"), None, None), Err(ErrorCategory::InvalidBits));
        assert_eq!(check(Some("-3"), None, None), Err(ErrorCategory::InvalidBits));
        assert_eq!(check(Some("4097"), None, None), Err(ErrorCategory::InvalidBits));
        assert_eq!(check(Some("4096"), None, None).map(|r| r.bits), Ok(4096));
        assert_eq!(check(None, Some("aer"), None), Err(ErrorCategory::InvalidOption));
        assert_eq!(check(None, None, Some("xor")), Err(ErrorCategory::InvalidOption));
    }

    #[test]
    fn test_categories_distinct() {
        let mut names: Vec<_> = ErrorCategory::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ErrorCategory::ALL.len());
    }

    #[test]
    fn test_von_neumann_truncates() {
        // Each "0110" yields "01"; 16 raw bits -> 8 extracted for 8 requested.
        let result = replay("0110").generate(&request(8, ExtractorKind::VonNeumann)).unwrap();
        assert_eq!(result.bits.as_str(), "01010101");
        assert_eq!(result.outcome, ReconcileOutcome::Truncated);
        assert_eq!(result.hex, "55");
        assert_eq!(result.statistics.bias, 0.0);
        assert_eq!(result.entropy_estimate(), 8.0);
    }

    #[test]
    fn test_von_neumann_raw_fallback() {
        let result = replay("0011").generate(&request(6, ExtractorKind::VonNeumann)).unwrap();
        assert_eq!(result.bits.as_str(), "001100");
        assert_eq!(result.outcome, ReconcileOutcome::RawFallback);
    }

    #[test]
    fn test_von_neumann_tiles() {
        // "10000000" yields one "1" per 8 raw bits: 16 raw -> "11".
        let result = replay("10000000").generate(&request(8, ExtractorKind::VonNeumann)).unwrap();
        assert_eq!(result.bits.as_str(), "11111111");
        assert_eq!(result.outcome, ReconcileOutcome::Tiled { extracted: 2 });
        assert_eq!(result.statistics.entropy_per_bit, 0.0);
    }

    #[test]
    fn test_hash_lengths() {
        let generator = replay("1");
        let short = generator.generate(&request(100, ExtractorKind::Hash)).unwrap();
        assert_eq!(short.bits.len(), 100);
        assert_eq!(short.outcome, ReconcileOutcome::Truncated);

        let long = generator.generate(&request(1000, ExtractorKind::Hash)).unwrap();
        assert_eq!(long.bits.len(), 1000);
        assert_eq!(long.outcome, ReconcileOutcome::Tiled { extracted: 256 });
    }

    #[test]
    fn test_response_payload() {
        let result = replay("0110").generate(&request(8, ExtractorKind::VonNeumann)).unwrap();
        let json = serde_json::to_value(result.to_response()).unwrap();

        assert_eq!(json["bits"], "01010101");
        assert_eq!(json["hex"], "55");
        assert_eq!(json["length"], 8);
        assert_eq!(json["entropy_estimate"], 8.0);
        assert_eq!(json["statistics"]["zeros"], 4);
        assert_eq!(json["statistics"]["ones"], 4);
    }

    #[test]
    fn test_short_source_rejected() {
        struct Short;
        impl RandomnessSource for Short {
            fn name(&self) -> &str {
                "short"
            }
            fn measure(&mut self, _shots: usize) -> Result<Bitstring, SourceError> {
                Ok("01".parse().unwrap())
            }
        }

        let provider = |_: Backend| -> Result<Box<dyn RandomnessSource>, SourceError> {
            Ok(Box::new(Short))
        };
        let generator =
            QuantumRandomGenerator::new(Arc::new(provider), GeneratorConfig::default()).unwrap();
        let err = generator.generate(&request(8, ExtractorKind::Hash)).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::SourceFailed);
    }

    #[test]
    fn test_unavailable_backend() {
        let generator = QuantumRandomGenerator::new(
            Arc::new(DefaultSourceProvider::default()),
            GeneratorConfig::default(),
        )
        .unwrap();
        let req = GenerateRequest::new(
            16,
            Backend::Ibmq,
            ExtractorKind::VonNeumann,
            generator.config(),
        )
        .unwrap();

        let err = generator.generate(&req).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::SourceUnavailable);
    }

    #[test]
    fn test_simulator_end_to_end() {
        let provider = DefaultSourceProvider::new(SimulatorConfig {
            seed: Some(99),
            ..Default::default()
        });
        let generator =
            QuantumRandomGenerator::new(Arc::new(provider), GeneratorConfig::default()).unwrap();

        for extractor in [ExtractorKind::VonNeumann, ExtractorKind::Hash] {
            let result = generator.generate(&request(4096, extractor)).unwrap();
            assert_eq!(result.bits.len(), 4096);
            assert_eq!(result.hex.len(), 1024);
            assert_eq!(
                result.statistics.zeros + result.statistics.ones,
                4096
            );
        }
    }

    #[test]
    fn test_config_that_shortens_output_rejected() {
        let provider = Arc::new(DefaultSourceProvider::new(SimulatorConfig {
            seed: Some(5),
            ..Default::default()
        }));

        let no_oversample = GeneratorConfig {
            oversample_factor: 0,
            ..Default::default()
        };
        assert!(matches!(
            QuantumRandomGenerator::new(provider.clone(), no_oversample),
            Err(ConfigError::InvalidOversample)
        ));

        let empty_digest = GeneratorConfig {
            hash_digest_bits: 0,
            ..Default::default()
        };
        assert!(matches!(
            QuantumRandomGenerator::new(provider, empty_digest),
            Err(ConfigError::InvalidDigestBits)
        ));
    }

    #[test]
    fn test_minimal_oversample_keeps_length() {
        let provider = DefaultSourceProvider::new(SimulatorConfig {
            seed: Some(5),
            ..Default::default()
        });
        let config = GeneratorConfig {
            oversample_factor: 1,
            ..Default::default()
        };
        let generator = QuantumRandomGenerator::new(Arc::new(provider), config).unwrap();

        let result = generator.generate(&request(64, ExtractorKind::VonNeumann)).unwrap();
        assert_eq!(result.bits.len(), 64);
    }
}
