//! Local simulation of single-qubit measurements.
//!
//! Models the circuit `H |0>` followed by a computational-basis
//! measurement: each shot collapses to `1` with probability
//! `|<1|H|0>|^2 = 0.5`. The outcome probability can be skewed to
//! emulate a miscalibrated device when studying debiasing.

use super::{RandomnessSource, SourceError};
use crate::bits::Bitstring;
use rand::distributions::Bernoulli;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for the simulator backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Probability that a shot measures `1`.
    pub p_one: f64,
    /// Maximum shots accepted in one job.
    pub max_shots: usize,
    /// Fixed RNG seed. Every job replays the same sequence when set.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            p_one: 0.5,
            max_shots: 8192,
            seed: None,
        }
    }
}

/// Simulated quantum measurement source.
pub struct SimulatorSource {
    rng: ChaCha20Rng,
    p_one: f64,
    max_shots: usize,
}

impl SimulatorSource {
    /// Creates a simulator from configuration.
    ///
    /// Without a configured seed the RNG is keyed from OS entropy.
    pub fn new(config: &SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => {
                let mut seed = [0u8; 32];
                OsRng.fill_bytes(&mut seed);
                ChaCha20Rng::from_seed(seed)
            }
        };

        Self {
            rng,
            p_one: config.p_one,
            max_shots: config.max_shots,
        }
    }

    /// Creates a fair simulator with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(&SimulatorConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }
}

impl RandomnessSource for SimulatorSource {
    fn name(&self) -> &str {
        "simulator"
    }

    fn measure(&mut self, shots: usize) -> Result<Bitstring, SourceError> {
        if shots > self.max_shots {
            return Err(SourceError::Execution(format!(
                "job requested {} shots, backend limit is {}",
                shots, self.max_shots
            )));
        }

        let shot = Bernoulli::new(self.p_one).map_err(|e| {
            SourceError::Execution(format!("invalid outcome probability {}: {}", self.p_one, e))
        })?;
        let outcomes: Vec<bool> = (&mut self.rng).sample_iter(shot).take(shots).collect();

        tracing::trace!(shots, "Simulated measurement job completed");

        Ok(Bitstring::from_bits(outcomes))
    }
}
