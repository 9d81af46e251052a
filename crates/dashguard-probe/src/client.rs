//! The cloud seam: everything the probe and verifier ask of the provider.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::error::ProbeError;

/// Parameters and outputs of a deployed stack, merged into one map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackInfo {
    pub name: String,
    pub values: BTreeMap<String, String>,
}

impl StackInfo {
    /// Outputs win over parameters on a key clash.
    pub fn new(
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = (String, String)>,
        outputs: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut values: BTreeMap<String, String> = parameters.into_iter().collect();
        values.extend(outputs);
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }
}

/// One entry of a metric batch request.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub id: String,
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<(String, String)>,
    /// `Sum`, `Average`, `p99`, ...
    pub stat: String,
    pub period_seconds: i32,
}

impl MetricQuery {
    pub fn new(
        id: impl Into<String>,
        namespace: impl Into<String>,
        metric_name: impl Into<String>,
        stat: impl Into<String>,
        period_seconds: i32,
    ) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            dimensions: Vec::new(),
            stat: stat.into(),
            period_seconds,
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }
}

/// Values returned for one query id, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub id: String,
    pub values: Vec<f64>,
}

impl MetricSeries {
    pub fn has_data(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn latest(&self) -> f64 {
        self.values.last().copied().unwrap_or_default()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The `hours` leading up to `end`.
    pub fn trailing(hours: i64, end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::hours(hours),
            end,
        }
    }
}

/// Blocking access to the provider APIs. One call at a time.
pub trait CloudClient {
    fn describe_stack(&self, stack_name: &str) -> Result<StackInfo, ProbeError>;

    /// Sends a JSON request body to the model endpoint and returns the JSON response.
    fn invoke_model(&self, model_id: &str, body: &Value) -> Result<Value, ProbeError>;

    /// Returns the dashboard body as stored (JSON text).
    fn get_dashboard(&self, dashboard_name: &str) -> Result<String, ProbeError>;

    fn get_metric_data(
        &self,
        queries: &[MetricQuery],
        window: &TimeWindow,
    ) -> Result<Vec<MetricSeries>, ProbeError>;

    fn validate_template(&self, template_body: &str) -> Result<(), ProbeError>;
}
