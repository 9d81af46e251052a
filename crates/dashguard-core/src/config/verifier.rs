//! Widget verifier configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, PricingConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_dashboard_name")]
    pub dashboard_name: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_model_dimension")]
    pub model_dimension: String,

    /// Invocations required for a passing run.
    #[serde(default = "default_min_invocations")]
    pub min_invocations: f64,

    /// Weight applied to output tokens in the service throughput figure.
    #[serde(default = "default_output_weight")]
    pub output_weight: f64,

    #[serde(default = "default_period_minutes")]
    pub period_minutes: f64,

    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,

    #[serde(default)]
    pub pricing: PricingConfig,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_dashboard_name() -> String {
    "BedrockCompleteDashboard".to_string()
}

fn default_model_id() -> String {
    "amazon.nova-pro-v1:0".to_string()
}

fn default_namespace() -> String {
    "AWS/Bedrock".to_string()
}

fn default_model_dimension() -> String {
    "ModelId".to_string()
}

fn default_min_invocations() -> f64 {
    3.0
}

fn default_output_weight() -> f64 {
    5.0
}

fn default_period_minutes() -> f64 {
    5.0
}

fn default_lookback_hours() -> i64 {
    2
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            dashboard_name: default_dashboard_name(),
            model_id: default_model_id(),
            namespace: default_namespace(),
            model_dimension: default_model_dimension(),
            min_invocations: default_min_invocations(),
            output_weight: default_output_weight(),
            period_minutes: default_period_minutes(),
            lookback_hours: default_lookback_hours(),
            pricing: PricingConfig::default(),
        }
    }
}

impl VerifierConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = super::load_yaml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = super::from_yaml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_minutes <= 0.0 {
            return Err(ConfigError::Config("period_minutes must be positive".to_string()));
        }
        if self.min_invocations < 0.0 {
            return Err(ConfigError::Config(
                "min_invocations must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Metric period in seconds derived from `period_minutes`.
    pub fn period_seconds(&self) -> i32 {
        (self.period_minutes * 60.0).round() as i32
    }

    pub fn console_url(&self) -> String {
        format!(
            "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#dashboards:name={name}",
            region = self.region,
            name = self.dashboard_name
        )
    }
}
