//! Generator configuration.
//!
//! Boundaries control the size of generated strings, the magnitude of
//! generated integers and the length of generated slices and maps. A
//! configuration file may also pin the seed:
//!
//! ```yaml
//! seed: 42
//! boundaries:
//!   string: { start: 1, end: 16 }
//!   int: { start: 0, end: 1000 }
//!   collection: { start: 0, end: 4 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Boundary that cannot be sampled from
    #[error("Invalid {name} boundary [{start}, {end})")]
    InvalidBoundary {
        name: &'static str,
        start: i64,
        end: i64,
    },
}

/// Inclusive-exclusive numeric range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub start: i64,
    pub end: i64,
}

impl Boundary {
    /// Create a new boundary.
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

/// The set of boundaries consulted by the random source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boundaries {
    /// Possible lengths of generated strings
    pub string: Boundary,

    /// Possible range of generated integers
    pub int: Boundary,

    /// Possible lengths of generated slices and maps
    pub collection: Boundary,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self {
            string: Boundary::new(1, 64),
            int: Boundary::new(0, 65536),
            collection: Boundary::new(1, 64),
        }
    }
}

impl Boundaries {
    /// Check that every boundary is non-empty and that lengths are
    /// non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("string", self.string, true)?;
        check("int", self.int, false)?;
        check("collection", self.collection, true)
    }
}

fn check(name: &'static str, boundary: Boundary, is_length: bool) -> Result<(), ConfigError> {
    if boundary.start >= boundary.end || (is_length && boundary.start < 0) {
        return Err(ConfigError::InvalidBoundary {
            name,
            start: boundary.start,
            end: boundary.end,
        });
    }
    Ok(())
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeignConfig {
    /// Seed applied to the random source, if any
    pub seed: Option<u64>,

    /// Generation boundaries
    pub boundaries: Boundaries,
}

impl FeignConfig {
    /// Parse and validate a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.boundaries.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
