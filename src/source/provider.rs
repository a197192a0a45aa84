//! Backend resolution.

use super::{Backend, RandomnessSource, SimulatorConfig, SimulatorSource, SourceError};

/// Opens a source for a requested backend.
///
/// Providers are shared across concurrent requests; each call returns
/// a fresh source owned by a single request.
pub trait SourceProvider: Send + Sync {
    /// Opens the backend, or reports why it cannot be used.
    fn open(&self, backend: Backend) -> Result<Box<dyn RandomnessSource>, SourceError>;
}

impl<F> SourceProvider for F
where
    F: Fn(Backend) -> Result<Box<dyn RandomnessSource>, SourceError> + Send + Sync,
{
    fn open(&self, backend: Backend) -> Result<Box<dyn RandomnessSource>, SourceError> {
        self(backend)
    }
}

/// Provider backed by the built-in simulator.
///
/// Remote devices are not linked into this crate: requests for
/// [`Backend::Ibmq`] report [`SourceError::Unavailable`]. Applications
/// with access to a remote device supply their own [`SourceProvider`].
#[derive(Debug, Clone, Default)]
pub struct DefaultSourceProvider {
    simulator: SimulatorConfig,
}

impl DefaultSourceProvider {
    /// Creates a provider whose simulator uses `simulator`.
    pub fn new(simulator: SimulatorConfig) -> Self {
        Self { simulator }
    }
}

impl SourceProvider for DefaultSourceProvider {
    fn open(&self, backend: Backend) -> Result<Box<dyn RandomnessSource>, SourceError> {
        match backend {
            Backend::Simulator => Ok(Box::new(SimulatorSource::new(&self.simulator))),
            Backend::Ibmq => Err(SourceError::Unavailable(
                "no remote quantum backend is configured".to_owned(),
            )),
        }
    }
}
