//! Per-1000-token price constants.

use serde::{Deserialize, Serialize};

/// Token prices in USD per 1000 tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_input_per_1k")]
    pub input_per_1k: f64,

    #[serde(default = "default_output_per_1k")]
    pub output_per_1k: f64,
}

fn default_input_per_1k() -> f64 {
    0.0008
}

fn default_output_per_1k() -> f64 {
    0.0032
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            input_per_1k: default_input_per_1k(),
            output_per_1k: default_output_per_1k(),
        }
    }
}

impl PricingConfig {
    pub fn cost(&self, input_tokens: f64, output_tokens: f64) -> f64 {
        input_tokens / 1000.0 * self.input_per_1k + output_tokens / 1000.0 * self.output_per_1k
    }

    /// The two constants as they appear in query text (`0.0008`, `0.0032`).
    pub fn as_text(&self) -> [String; 2] {
        [self.input_per_1k.to_string(), self.output_per_1k.to_string()]
    }
}
