//! Configuration types for dashguard.
//!
//! Each binary reads one YAML file; every field has a default, so an empty file or
//! no file at all reproduces the built-in conformance profile.
//!
//! # Configuration Files
//!
//! - **check config**: rule constants for `validator` (regions, resource names, tag keys, ...)
//! - **probe config**: invocation count, pauses and thresholds for `tester`
//! - **verifier config**: dashboard and metric targets for `widget-verifier`

pub mod check;
pub mod pricing;
pub mod probe;
pub mod verifier;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

pub use check::{CheckConfig, IdentityField, QueryGroup};
pub use pricing::PricingConfig;
pub use probe::{InferenceConfig, ProbeConfig};
pub use verifier::VerifierConfig;

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Loads any configuration struct from a YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path.as_ref())?;
    from_yaml(&content)
}

/// Parses any configuration struct from YAML text. Blank text yields the defaults.
pub fn from_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    if content.trim().is_empty() {
        return serde_yaml::from_str("{}").map_err(ConfigError::from);
    }
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
