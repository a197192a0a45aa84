//! Deterministic stand-in source.

use super::{RandomnessSource, SourceError};
use crate::bits::Bitstring;

/// Source that replays a fixed pattern.
///
/// The pattern is repeated as often as needed to satisfy each job.
/// NOT random: intended for tests and reproducible demonstrations.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    pattern: Bitstring,
    jobs: u64,
}

impl ReplaySource {
    /// Creates a source that replays `pattern`.
    pub fn new(pattern: Bitstring) -> Self {
        Self { pattern, jobs: 0 }
    }

    /// Returns the number of jobs served.
    pub fn jobs(&self) -> u64 {
        self.jobs
    }
}

impl RandomnessSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn measure(&mut self, shots: usize) -> Result<Bitstring, SourceError> {
        if self.pattern.is_empty() && shots > 0 {
            return Err(SourceError::Execution(
                "replay pattern is empty".to_owned(),
            ));
        }

        self.jobs += 1;
        let repetitions = shots.div_ceil(self.pattern.len().max(1));
        Ok(self.pattern.repeat(repetitions).prefix(shots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_repeats() {
        let mut source = ReplaySource::new("011".parse().unwrap());
        let bits = source.measure(8).unwrap();

        assert_eq!(bits.as_str(), "01101101");
        assert_eq!(source.jobs(), 1);
    }

    #[test]
    fn test_empty_pattern_fails() {
        let mut source = ReplaySource::new(Bitstring::new());
        assert!(matches!(
            source.measure(4),
            Err(SourceError::Execution(_))
        ));
        assert!(source.measure(0).unwrap().is_empty());
    }
}
