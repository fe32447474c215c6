//! CLI configuration
//!
//! Loaded from an optional TOML file; every field has a default so a partial
//! file (or no file) is valid.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use phishscan_core::{Scanner, DEFAULT_MAX_REASONS};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub display: DisplayConfig,
    pub limits: LimitsConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Reasons shown per message
    #[serde(default = "default_max_reasons")]
    pub max_reasons: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted message in characters (0 = unlimited)
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Messages analyzed at once in batch mode
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_max_reasons() -> usize {
    DEFAULT_MAX_REASONS
}

fn default_max_input_chars() -> usize {
    100_000
}

fn default_concurrency() -> usize {
    4
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_reasons: default_max_reasons(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl ScanConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScanConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Scanner honoring the configured input limit
    pub fn scanner(&self) -> Scanner {
        Scanner::new().with_max_input_chars(self.limits.max_input_chars)
    }
}
