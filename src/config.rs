//! Service configuration.
//!
//! Loaded from a TOML file with one table per component. Every field
//! has a default, so an empty file (or no file) is a valid setup.
//!
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:8000"
//! cors_allowed_origins = ["http://localhost:5173"]
//!
//! [generator]
//! default_bits = 256
//! max_bits = 4096
//!
//! [simulator]
//! p_one = 0.5
//! ```

use crate::generator::GeneratorConfig;
use crate::source::SimulatorConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("default_bits {default} must be within 1..={max}")]
    InvalidDefaultBits { default: usize, max: usize },
    #[error("max_bits must be at least 1")]
    InvalidMaxBits,
    #[error("oversample_factor must be at least 1")]
    InvalidOversample,
    #[error("hash_digest_bits must be at least 1")]
    InvalidDigestBits,
    #[error("simulator p_one {0} must be within [0, 1]")]
    InvalidProbability(f64),
    #[error("simulator max_shots {max_shots} cannot serve {needed} shots per request")]
    InsufficientShots { max_shots: usize, needed: usize },
    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
    /// Allow requests from any origin.
    pub cors_allow_all: bool,
    /// Origins allowed to call the API when `cors_allow_all` is off.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 8000).into(),
            cors_allow_all: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Creates a config bound to all interfaces on `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], port).into(),
            ..Default::default()
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generator = &self.generator;
        generator.validate()?;

        let simulator = &self.simulator;
        if !(0.0..=1.0).contains(&simulator.p_one) {
            return Err(ConfigError::InvalidProbability(simulator.p_one));
        }
        let needed = generator.max_bits.saturating_mul(generator.oversample_factor);
        if simulator.max_shots < needed {
            return Err(ConfigError::InsufficientShots {
                max_shots: simulator.max_shots,
                needed,
            });
        }

        if let Some(origin) = self
            .server
            .cors_allowed_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(ConfigError::InvalidOrigin(origin.clone()));
        }

        Ok(())
    }
}
