//! Scripted provider and recording pause shared by the live tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::time::Duration;

use dashguard_probe::{CloudClient, MetricQuery, MetricSeries, Pause, ProbeError, StackInfo, TimeWindow};
use serde_json::{Value, json};

pub const DASHBOARD_BODY: &str = r#"{
  "widgets": [
    {"type": "metric", "properties": {"title": "Invocations", "region": "us-east-1",
      "metrics": [["AWS/Bedrock", "Invocations", "ModelId", "amazon.nova-pro-v1:0"]]}},
    {"type": "metric", "properties": {"title": "Token Usage", "region": "us-east-1",
      "metrics": [["AWS/Bedrock", "InputTokenCount", "ModelId", "amazon.nova-pro-v1:0"]]}},
    {"type": "log", "properties": {"title": "Top Users by Cost", "region": "us-east-1",
      "query": "stats count(*) by userId"}}
  ]
}"#;

// ============================================================================
// Provider
// ============================================================================

/// Answers every provider call from a script and records what it was asked.
pub struct FakeCloud {
    pub stack: Option<StackInfo>,
    /// One entry per invocation; `false` makes that call fail.
    pub invoke_plan: Vec<bool>,
    pub dashboard: Result<String, String>,
    pub metrics: Result<Vec<MetricSeries>, String>,

    pub invoked_models: RefCell<Vec<String>>,
    pub dashboards_requested: RefCell<Vec<String>>,
    pub metric_queries: RefCell<Vec<MetricQuery>>,
    calls: Cell<usize>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            stack: Some(StackInfo::new(
                "nova-pro-dashboard",
                pairs(&[("ModelId", "amazon.nova-pro-v1:0")]),
                pairs(&[
                    ("DashboardName", "NovaProMonitoring-test"),
                    ("DashboardURL", "https://console.example/dashboards/NovaProMonitoring-test"),
                ]),
            )),
            invoke_plan: vec![true; 10],
            dashboard: Ok(DASHBOARD_BODY.to_string()),
            metrics: Ok(vec![series("invocations", &[4.0, 5.0])]),
            invoked_models: RefCell::new(Vec::new()),
            dashboards_requested: RefCell::new(Vec::new()),
            metric_queries: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    pub fn with_invoke_plan(mut self, plan: Vec<bool>) -> Self {
        self.invoke_plan = plan;
        self
    }

    pub fn with_dashboard_error(mut self, message: &str) -> Self {
        self.dashboard = Err(message.to_string());
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<MetricSeries>) -> Self {
        self.metrics = Ok(metrics);
        self
    }

    pub fn with_metrics_error(mut self, message: &str) -> Self {
        self.metrics = Err(message.to_string());
        self
    }

    pub fn without_stack(mut self) -> Self {
        self.stack = None;
        self
    }

    pub fn invocation_calls(&self) -> usize {
        self.calls.get()
    }
}

impl CloudClient for &FakeCloud {
    fn describe_stack(&self, stack_name: &str) -> Result<StackInfo, ProbeError> {
        self.stack
            .clone()
            .ok_or_else(|| ProbeError::StackNotFound(stack_name.to_string()))
    }

    fn invoke_model(&self, model_id: &str, body: &Value) -> Result<Value, ProbeError> {
        let index = self.calls.get();
        self.calls.set(index + 1);
        self.invoked_models.borrow_mut().push(model_id.to_string());
        assert!(body.pointer("/messages/0/content/0/text").is_some());

        if self.invoke_plan.get(index).copied().unwrap_or(true) {
            Ok(json!({
                "output": {"message": {"content": [{"text": "Artificial intelligence is the study of machines that learn"}]}}
            }))
        } else {
            Err(ProbeError::service("InvokeModel", "ThrottlingException: rate exceeded"))
        }
    }

    fn get_dashboard(&self, dashboard_name: &str) -> Result<String, ProbeError> {
        self.dashboards_requested
            .borrow_mut()
            .push(dashboard_name.to_string());
        self.dashboard
            .clone()
            .map_err(|e| ProbeError::service("GetDashboard", e))
    }

    fn get_metric_data(
        &self,
        queries: &[MetricQuery],
        window: &TimeWindow,
    ) -> Result<Vec<MetricSeries>, ProbeError> {
        assert!(window.start < window.end);
        self.metric_queries.borrow_mut().extend_from_slice(queries);
        self.metrics
            .clone()
            .map_err(|e| ProbeError::service("GetMetricData", e))
    }

    fn validate_template(&self, _template_body: &str) -> Result<(), ProbeError> {
        Ok(())
    }
}

// ============================================================================
// Pause
// ============================================================================

#[derive(Default)]
pub struct RecordingPause {
    pub pauses: RefCell<Vec<Duration>>,
}

impl Pause for &RecordingPause {
    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn series(id: &str, values: &[f64]) -> MetricSeries {
    MetricSeries {
        id: id.to_string(),
        values: values.to_vec(),
    }
}
