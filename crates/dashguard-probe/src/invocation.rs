//! Model invocation requests, responses and token estimates.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashguard_core::config::InferenceConfig;
use serde_json::{Value, json};

/// Estimated tokens per whitespace-separated word.
const TOKENS_PER_WORD: f64 = 1.3;

/// Output estimate used when the response text is empty.
const EMPTY_RESPONSE_TOKENS: u64 = 50;

/// The message-list request understood by the model endpoint.
pub fn request_body(prompt: &str, inference: &InferenceConfig) -> Value {
    json!({
        "messages": [
            { "role": "user", "content": [{ "text": prompt }] }
        ],
        "inferenceConfig": {
            "maxTokens": inference.max_tokens,
            "temperature": inference.temperature,
            "topP": inference.top_p,
        }
    })
}

/// `output.message.content[0].text`, when present.
pub fn response_text(response: &Value) -> Option<&str> {
    response
        .pointer("/output/message/content/0/text")
        .and_then(Value::as_str)
}

pub fn estimate_tokens(text: &str) -> u64 {
    (text.split_whitespace().count() as f64 * TOKENS_PER_WORD).floor() as u64
}

pub fn estimate_output_tokens(text: &str) -> u64 {
    if text.is_empty() {
        EMPTY_RESPONSE_TOKENS
    } else {
        estimate_tokens(text)
    }
}

/// Outcome of one invocation. Failed invocations carry no token estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRecord {
    /// 1-based position in the run.
    pub sequence: usize,
    pub success: bool,
    pub latency: Duration,
    pub input_tokens_estimate: u64,
    pub output_tokens_estimate: u64,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl InvocationRecord {
    pub fn succeeded(
        sequence: usize,
        latency: Duration,
        prompt: &str,
        response: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            success: true,
            latency,
            input_tokens_estimate: estimate_tokens(prompt),
            output_tokens_estimate: estimate_output_tokens(response),
            error: None,
            timestamp,
        }
    }

    pub fn failed(sequence: usize, error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sequence,
            success: false,
            latency: Duration::ZERO,
            input_tokens_estimate: 0,
            output_tokens_estimate: 0,
            error: Some(error.into()),
            timestamp,
        }
    }
}

/// Aggregates over the invocation phase.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationSummary {
    pub total: usize,
    pub successful: usize,
    pub average_latency_ms: Option<f64>,
    pub input_tokens_estimate: u64,
    pub output_tokens_estimate: u64,
}

impl InvocationSummary {
    pub fn from_records(records: &[InvocationRecord]) -> Self {
        let succeeded: Vec<&InvocationRecord> = records.iter().filter(|r| r.success).collect();
        let average_latency_ms = (!succeeded.is_empty()).then(|| {
            succeeded
                .iter()
                .map(|r| r.latency.as_micros() as f64 / 1000.0)
                .sum::<f64>()
                / succeeded.len() as f64
        });
        Self {
            total: records.len(),
            successful: succeeded.len(),
            average_latency_ms,
            input_tokens_estimate: succeeded.iter().map(|r| r.input_tokens_estimate).sum(),
            output_tokens_estimate: succeeded.iter().map(|r| r.output_tokens_estimate).sum(),
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }

    /// Fraction of successful invocations; zero for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 / self.total as f64
        }
    }
}
