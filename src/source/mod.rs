//! Raw measurement sources.
//!
//! A source is the quantum backend, treated as a black box that can
//! measure a prepared qubit a given number of times and report the
//! outcomes. This module provides a trait-based abstraction over that
//! backend so the rest of the pipeline can run against a local
//! simulator, a remote device, or a deterministic stand-in in tests.

mod provider;
mod replay;
mod simulator;

pub use provider::{DefaultSourceProvider, SourceProvider};
pub use replay::ReplaySource;
pub use simulator::{SimulatorConfig, SimulatorSource};

use crate::bits::Bitstring;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when obtaining raw bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The backend is missing or not configured. Retrying later, or
    /// after fixing configuration, may succeed.
    #[error("randomness source unavailable: {0}")]
    Unavailable(String),
    /// The backend accepted the job but failed to run it.
    #[error("randomness source failed: {0}")]
    Execution(String),
}

/// Trait for raw measurement sources.
///
/// Implementations block until the measurements are complete.
pub trait RandomnessSource: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Performs `shots` measurements and returns one bit per shot.
    ///
    /// A successful result holds exactly `shots` bits.
    fn measure(&mut self, shots: usize) -> Result<Bitstring, SourceError>;
}

/// Selector for the backend that supplies raw bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Local statevector simulation.
    #[default]
    Simulator,
    /// Remote IBM Quantum device.
    Ibmq,
}

impl Backend {
    /// Returns the wire name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Simulator => "simulator",
            Backend::Ibmq => "ibmq",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by strict parsing of a backend name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode {0:?} (expected simulator or ibmq)")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simulator" => Ok(Backend::Simulator),
            "ibmq" => Ok(Backend::Ibmq),
            other => Err(UnknownBackend(other.to_owned())),
        }
    }
}
