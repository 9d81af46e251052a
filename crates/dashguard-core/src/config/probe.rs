//! Live probe configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, PricingConfig};

/// Configuration for the live probe (`tester`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Number of model invocations to send.
    #[serde(default = "default_invocations")]
    pub invocations: usize,

    /// Minutes to wait for telemetry to propagate before querying.
    #[serde(default = "default_wait_minutes")]
    pub wait_minutes: u64,

    #[serde(default = "default_pause_after_success_ms")]
    pub pause_after_success_ms: u64,

    #[serde(default = "default_pause_after_failure_ms")]
    pub pause_after_failure_ms: u64,

    /// Minimum fraction of successful invocations for a passing run.
    #[serde(default = "default_success_ratio")]
    pub success_ratio: f64,

    #[serde(default = "default_metric_period_seconds")]
    pub metric_period_seconds: i32,

    /// Trailing window for metric queries.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,

    /// Prompts sent in rotation.
    #[serde(default = "default_prompts")]
    pub prompts: Vec<String>,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    /// Used when the stack exposes no `ModelId`.
    #[serde(default = "default_model_id")]
    pub default_model_id: String,

    /// Used when the stack exposes no `DashboardName`.
    #[serde(default = "default_dashboard_name")]
    pub default_dashboard_name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_model_dimension")]
    pub model_dimension: String,

    /// Directory receiving the timestamped report file.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

/// Inference settings sent with every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

fn default_invocations() -> usize {
    10
}

fn default_wait_minutes() -> u64 {
    5
}

fn default_pause_after_success_ms() -> u64 {
    2000
}

fn default_pause_after_failure_ms() -> u64 {
    1000
}

fn default_success_ratio() -> f64 {
    0.8
}

fn default_metric_period_seconds() -> i32 {
    300
}

fn default_lookback_hours() -> i64 {
    2
}

fn default_prompts() -> Vec<String> {
    vec![
        "What is artificial intelligence?".to_string(),
        "Explain machine learning and its applications in modern technology.".to_string(),
        "Write about cloud computing benefits and challenges for enterprises.".to_string(),
    ]
}

fn default_model_id() -> String {
    "amazon.nova-pro-v1:0".to_string()
}

fn default_dashboard_name() -> String {
    "NovaProMonitoring".to_string()
}

fn default_namespace() -> String {
    "AWS/Bedrock".to_string()
}

fn default_model_dimension() -> String {
    "ModelId".to_string()
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.9
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            invocations: default_invocations(),
            wait_minutes: default_wait_minutes(),
            pause_after_success_ms: default_pause_after_success_ms(),
            pause_after_failure_ms: default_pause_after_failure_ms(),
            success_ratio: default_success_ratio(),
            metric_period_seconds: default_metric_period_seconds(),
            lookback_hours: default_lookback_hours(),
            prompts: default_prompts(),
            inference: InferenceConfig::default(),
            pricing: PricingConfig::default(),
            default_model_id: default_model_id(),
            default_dashboard_name: default_dashboard_name(),
            namespace: default_namespace(),
            model_dimension: default_model_dimension(),
            report_dir: default_report_dir(),
        }
    }
}

impl ProbeConfig {
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
        if self.prompts.is_empty() {
            return Err(ConfigError::Config("at least one prompt is required".to_string()));
        }
        if self.invocations == 0 {
            return Err(ConfigError::Config("invocations must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.success_ratio) {
            return Err(ConfigError::Config(format!(
                "success_ratio must be within 0..=1, got {}",
                self.success_ratio
            )));
        }
        Ok(())
    }

    pub fn pause_after_success(&self) -> Duration {
        Duration::from_millis(self.pause_after_success_ms)
    }

    pub fn pause_after_failure(&self) -> Duration {
        Duration::from_millis(self.pause_after_failure_ms)
    }

    /// Prompt for the 1-based invocation `sequence`, cycling through the list.
    pub fn prompt_for(&self, sequence: usize) -> &str {
        let index = sequence.saturating_sub(1) % self.prompts.len().max(1);
        self.prompts.get(index).map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.invocations, 10);
        assert_eq!(config.wait_minutes, 5);
        assert_eq!(config.pause_after_success(), Duration::from_secs(2));
        assert_eq!(config.pause_after_failure(), Duration::from_secs(1));
        assert_eq!(config.inference.max_tokens, 200);
        assert_eq!(config.prompts.len(), 3);
    }

    #[test]
    fn test_prompts_rotate() {
        let config = ProbeConfig::default();
        assert_eq!(config.prompt_for(1), "What is artificial intelligence?");
        assert_eq!(config.prompt_for(4), config.prompt_for(1));
        assert_eq!(config.prompt_for(3), config.prompts[2]);
    }

    #[test]
    fn test_yaml_overrides() {
        let config = ProbeConfig::from_yaml("invocations: 3\ninference:\n  max_tokens: 50\n").unwrap();
        assert_eq!(config.invocations, 3);
        assert_eq!(config.inference.max_tokens, 50);
        assert_eq!(config.inference.top_p, 0.9);
        assert_eq!(config.success_ratio, 0.8);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        assert!(ProbeConfig::from_yaml("success_ratio: 1.5").is_err());
        assert!(ProbeConfig::from_yaml("prompts: []").is_err());
    }
}
