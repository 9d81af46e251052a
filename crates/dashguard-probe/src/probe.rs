//! The live probe: generate traffic, wait for telemetry, then check the dashboard.
//!
//! Stages run strictly in order (`Invoking → Waiting → Querying → Verifying →
//! Reporting`) and never go back. Only describing the stack and writing the
//! report can abort a run; every other provider failure is recorded and the run
//! continues.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashguard_core::{Dashboard, ProbeConfig};

use crate::client::{CloudClient, MetricQuery, StackInfo, TimeWindow};
use crate::error::ProbeError;
use crate::invocation::{InvocationRecord, InvocationSummary, request_body, response_text};
use crate::pause::Pause;
use crate::report;

const MINUTE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Invoking,
    Waiting,
    Querying,
    Verifying,
    Reporting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Invoking => "invoking",
            Stage::Waiting => "waiting",
            Stage::Querying => "querying",
            Stage::Verifying => "verifying",
            Stage::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// The deployed stack under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub region: String,
    pub stack_name: String,
}

/// Names resolved from the stack, with configured fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub model_id: String,
    pub dashboard_name: String,
    pub dashboard_url: Option<String>,
}

impl Deployment {
    pub fn resolve(stack: &StackInfo, config: &ProbeConfig) -> Self {
        Self {
            model_id: stack.get_or("ModelId", &config.default_model_id).to_string(),
            dashboard_name: stack
                .get_or("DashboardName", &config.default_dashboard_name)
                .to_string(),
            dashboard_url: stack.get("DashboardURL").map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardCheck {
    pub accessible: bool,
    pub widget_count: usize,
    pub metrics_available: bool,
    /// Sum of the `Invocations` series over the window.
    pub observed_invocations: f64,
    pub dashboard_error: Option<String>,
    pub metrics_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
}

impl CostEstimate {
    pub fn total(&self) -> f64 {
        self.input_cost + self.output_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Enough invocations succeeded and the dashboard is reachable.
    Pass,
    /// Invocations succeeded but the dashboard could not be read.
    Partial,
    Fail,
}

impl Verdict {
    pub fn decide(summary: &InvocationSummary, dashboard: &DashboardCheck, ratio: f64) -> Self {
        let invocations_ok =
            summary.total > 0 && summary.successful as f64 >= summary.total as f64 * ratio;
        match (invocations_ok, dashboard.accessible) {
            (true, true) => Verdict::Pass,
            (true, false) => Verdict::Partial,
            (false, _) => Verdict::Fail,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Partial => "PARTIAL",
            Verdict::Fail => "FAIL",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Verdict::Pass => "✓ PASS - Test completed successfully",
            Verdict::Partial => {
                "⚠ PARTIAL - Invocations successful, dashboard needs verification"
            }
            Verdict::Fail => "✗ FAIL - Critical issues detected",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub target: ProbeTarget,
    pub deployment: Deployment,
    pub started_at: DateTime<Utc>,
    pub records: Vec<InvocationRecord>,
    pub summary: InvocationSummary,
    pub dashboard: DashboardCheck,
    pub cost: Option<CostEstimate>,
    pub verdict: Verdict,
    pub report: String,
    pub report_path: PathBuf,
}

impl ProbeOutcome {
    /// Only a full pass exits 0.
    pub fn exit_code(&self) -> i32 {
        if self.verdict == Verdict::Pass { 0 } else { 1 }
    }
}

pub struct LiveProbe<'a, C: CloudClient, P: Pause> {
    client: C,
    pause: P,
    config: &'a ProbeConfig,
}

impl<'a, C: CloudClient, P: Pause> LiveProbe<'a, C, P> {
    pub fn new(client: C, pause: P, config: &'a ProbeConfig) -> Self {
        Self {
            client,
            pause,
            config,
        }
    }

    pub fn run(&self, target: &ProbeTarget) -> Result<ProbeOutcome, ProbeError> {
        let started_at = Utc::now();
        let stack = self.client.describe_stack(&target.stack_name)?;
        let deployment = Deployment::resolve(&stack, self.config);
        tracing::info!(
            region = %target.region,
            stack = %target.stack_name,
            model_id = %deployment.model_id,
            dashboard = %deployment.dashboard_name,
            "initialized live probe"
        );

        tracing::info!(stage = %Stage::Invoking, "starting stage");
        let records = self.invoke(&deployment.model_id);
        let summary = InvocationSummary::from_records(&records);

        tracing::info!(stage = %Stage::Waiting, "starting stage");
        self.wait();

        tracing::info!(stage = %Stage::Querying, "starting stage");
        let dashboard = self.query(&deployment);

        tracing::info!(stage = %Stage::Verifying, "starting stage");
        let cost = self.verify(&summary);
        let verdict = Verdict::decide(&summary, &dashboard, self.config.success_ratio);

        tracing::info!(stage = %Stage::Reporting, "starting stage");
        let mut outcome = ProbeOutcome {
            target: target.clone(),
            deployment,
            started_at,
            records,
            summary,
            dashboard,
            cost,
            verdict,
            report: String::new(),
            report_path: PathBuf::new(),
        };
        outcome.report = report::render(&outcome);
        outcome.report_path = report::write(&outcome, &self.config.report_dir)?;
        tracing::info!(path = %outcome.report_path.display(), verdict = %verdict, "test report saved");
        Ok(outcome)
    }

    fn invoke(&self, model_id: &str) -> Vec<InvocationRecord> {
        let total = self.config.invocations;
        tracing::info!(total, "generating test invocations");

        let mut records = Vec::with_capacity(total);
        for sequence in 1..=total {
            let prompt = self.config.prompt_for(sequence);
            let body = request_body(prompt, &self.config.inference);
            let started = Instant::now();
            match self.client.invoke_model(model_id, &body) {
                Ok(response) => {
                    let latency = started.elapsed();
                    let text = response_text(&response).unwrap_or_default();
                    tracing::info!(
                        sequence,
                        total,
                        latency_ms = latency.as_millis() as u64,
                        "invocation succeeded"
                    );
                    records.push(InvocationRecord::succeeded(
                        sequence,
                        latency,
                        prompt,
                        text,
                        Utc::now(),
                    ));
                    self.pause.pause(self.config.pause_after_success());
                }
                Err(e) => {
                    tracing::error!(sequence, error = %e, "invocation failed");
                    records.push(InvocationRecord::failed(sequence, e.to_string(), Utc::now()));
                    self.pause.pause(self.config.pause_after_failure());
                }
            }
        }

        let successful = records.iter().filter(|r| r.success).count();
        tracing::info!(successful, total, "completed test invocations");
        records
    }

    /// A fixed wait, one log line per remaining minute.
    fn wait(&self) {
        let minutes = self.config.wait_minutes;
        tracing::info!(minutes, "waiting for metrics to propagate");
        for remaining in (1..=minutes).rev() {
            tracing::info!(remaining, "minutes remaining");
            self.pause.pause(MINUTE);
        }
        tracing::info!("metrics propagation wait complete");
    }

    fn query(&self, deployment: &Deployment) -> DashboardCheck {
        let mut check = DashboardCheck::default();

        let dashboard = self
            .client
            .get_dashboard(&deployment.dashboard_name)
            .and_then(|body| Ok(Dashboard::from_json(&body)?));
        match dashboard {
            Ok(dashboard) => {
                check.accessible = true;
                check.widget_count = dashboard.widgets.len();
                tracing::info!(widgets = check.widget_count, "dashboard accessible");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read dashboard");
                check.dashboard_error = Some(e.to_string());
            }
        }

        let query = MetricQuery::new(
            "invocations",
            &self.config.namespace,
            "Invocations",
            "Sum",
            self.config.metric_period_seconds,
        )
        .with_dimension(&self.config.model_dimension, &deployment.model_id);
        let window = TimeWindow::trailing(self.config.lookback_hours, Utc::now());
        match self.client.get_metric_data(&[query], &window) {
            Ok(series) => {
                check.metrics_available = series.iter().any(|s| s.has_data());
                check.observed_invocations = series.iter().map(|s| s.total()).sum();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read metric data");
                check.metrics_error = Some(e.to_string());
            }
        }
        check
    }

    fn verify(&self, summary: &InvocationSummary) -> Option<CostEstimate> {
        if summary.successful == 0 {
            tracing::warn!("no successful invocations; cost cannot be estimated");
            return None;
        }
        let pricing = self.config.pricing;
        let input_tokens = summary.input_tokens_estimate;
        let output_tokens = summary.output_tokens_estimate;
        let estimate = CostEstimate {
            input_tokens,
            output_tokens,
            input_cost: pricing.cost(input_tokens as f64, 0.0),
            output_cost: pricing.cost(0.0, output_tokens as f64),
        };
        tracing::info!(expected_cost = estimate.total(), "verified cost calculation");
        Some(estimate)
    }
}
