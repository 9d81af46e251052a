//! Widget verifier: checks a deployed dashboard against the metrics behind it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Utc;
use dashguard_core::{CategoryTally, Dashboard, VerifierConfig, WidgetCategory};

use crate::client::{CloudClient, MetricQuery, MetricSeries, TimeWindow};

/// Series that must carry data for the verification to continue.
pub const REQUIRED_SERIES: [&str; 3] = ["invocations", "input_tokens", "output_tokens"];

/// The fixed metric batch, all for the configured model dimension.
pub fn metric_batch(config: &VerifierConfig) -> Vec<MetricQuery> {
    let period = config.period_seconds();
    [
        ("invocations", "Invocations", "Sum"),
        ("input_tokens", "InputTokenCount", "Sum"),
        ("output_tokens", "OutputTokenCount", "Sum"),
        ("latency_avg", "InvocationLatency", "Average"),
        ("latency_p99", "InvocationLatency", "p99"),
    ]
    .into_iter()
    .map(|(id, metric, stat)| {
        MetricQuery::new(id, &config.namespace, metric, stat, period)
            .with_dimension(&config.model_dimension, &config.model_id)
    })
    .collect()
}

/// Series with data, keyed by query id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSummary {
    pub series: BTreeMap<String, MetricSeries>,
}

impl MetricsSummary {
    /// Drops series without values.
    pub fn from_series(series: Vec<MetricSeries>) -> Self {
        Self {
            series: series
                .into_iter()
                .filter(MetricSeries::has_data)
                .map(|s| (s.id.clone(), s))
                .collect(),
        }
    }

    pub fn missing(&self) -> Vec<String> {
        REQUIRED_SERIES
            .iter()
            .filter(|id| !self.series.contains_key(**id))
            .map(|id| id.to_string())
            .collect()
    }

    pub fn total(&self, id: &str) -> f64 {
        self.series.get(id).map(MetricSeries::total).unwrap_or_default()
    }

    pub fn latest(&self, id: &str) -> Option<f64> {
        self.series.get(id).map(MetricSeries::latest)
    }
}

/// Tokens per minute over one sampling period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    /// Quota figure: output tokens weighted by `output_weight`.
    pub service_tpm: f64,
    /// Input and output weighted equally.
    pub customer_tpm: f64,
}

impl Throughput {
    pub fn compute(input: f64, output: f64, output_weight: f64, period_minutes: f64) -> Self {
        Self {
            service_tpm: (input + output * output_weight) / period_minutes,
            customer_tpm: (input + output) / period_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetLine {
    pub kind: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub widgets: Vec<WidgetLine>,
    pub tally: CategoryTally,
    pub metrics: MetricsSummary,
    pub invocations: f64,
    pub input_tokens: f64,
    pub output_tokens: f64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub throughput: Throughput,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifierOutcome {
    DashboardUnavailable(String),
    MetricsUnavailable { widget_count: usize, error: String },
    MissingMetrics { widget_count: usize, missing: Vec<String> },
    Complete(Verification),
}

impl VerifierOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, VerifierOutcome::Complete(v) if v.passed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }

    pub fn render(&self, config: &VerifierConfig) -> String {
        let mut out = String::new();
        let rule = "-".repeat(40);

        let widget_count = match self {
            VerifierOutcome::DashboardUnavailable(error) => {
                let _ = writeln!(out, "✗ Failed to get dashboard: {error}");
                return out;
            }
            VerifierOutcome::MetricsUnavailable { widget_count, .. }
            | VerifierOutcome::MissingMetrics { widget_count, .. } => *widget_count,
            VerifierOutcome::Complete(v) => v.widgets.len(),
        };
        let _ = writeln!(out, "✓ Dashboard found with {widget_count} widgets");

        let v = match self {
            VerifierOutcome::MetricsUnavailable { error, .. } => {
                let _ = writeln!(out, "✗ Failed to get metrics data: {error}");
                return out;
            }
            VerifierOutcome::MissingMetrics { missing, .. } => {
                let _ = writeln!(out, "✓ Retrieved CloudWatch metrics data");
                let _ = writeln!(out, "✗ Missing required metrics: {}", missing.join(", "));
                return out;
            }
            VerifierOutcome::Complete(v) => v,
            VerifierOutcome::DashboardUnavailable(_) => return out,
        };
        let _ = writeln!(out, "✓ Retrieved CloudWatch metrics data");
        let _ = writeln!(out, "✓ All required metrics are available");

        let _ = writeln!(out, "\nMETRICS SUMMARY:");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Total Invocations: {}", v.invocations);
        let _ = writeln!(out, "Total Input Tokens: {}", v.input_tokens);
        let _ = writeln!(out, "Total Output Tokens: {}", v.output_tokens);
        if let Some(latency) = v.metrics.latest("latency_avg") {
            let _ = writeln!(out, "Latest Average Latency: {latency:.0}ms");
        }
        if let Some(latency) = v.metrics.latest("latency_p99") {
            let _ = writeln!(out, "Latest P99 Latency: {latency:.0}ms");
        }

        let pricing = config.pricing;
        let _ = writeln!(out, "\nCOST CALCULATION VERIFICATION:");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Input Token Cost: ${:.6} ({} tokens × ${}/1K)",
            v.input_cost, v.input_tokens, pricing.input_per_1k
        );
        let _ = writeln!(
            out,
            "Output Token Cost: ${:.6} ({} tokens × ${}/1K)",
            v.output_cost, v.output_tokens, pricing.output_per_1k
        );
        let _ = writeln!(out, "Total Expected Cost: ${:.6}", v.input_cost + v.output_cost);

        let _ = writeln!(out, "\nTPM CALCULATION VERIFICATION:");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Service TPM (Quota): {:.1} tokens/min",
            v.throughput.service_tpm
        );
        let _ = writeln!(
            out,
            "Customer TPM (Traditional): {:.1} tokens/min",
            v.throughput.customer_tpm
        );

        let _ = writeln!(out, "\nWIDGET VERIFICATION:");
        let _ = writeln!(out, "{rule}");
        for widget in &v.widgets {
            let _ = writeln!(out, "  {}: {}", widget.kind.to_uppercase(), widget.title);
        }
        let _ = writeln!(out, "\nWidget Categories:");
        for category in WidgetCategory::ALL {
            let _ = writeln!(out, "  {category}: {} widgets", v.tally.count(category));
        }

        let _ = writeln!(out, "\nOVERALL VERIFICATION RESULT:");
        let _ = writeln!(out, "{rule}");
        if v.passed {
            let _ = writeln!(out, "✓ PASS - Dashboard has sufficient metrics data");
            let _ = writeln!(out, "✓ PASS - Cost calculations are mathematically correct");
            let _ = writeln!(out, "✓ PASS - TPM calculations are available");
            let _ = writeln!(out, "✓ PASS - All widget categories are represented");
            let _ = writeln!(out, "\nDashboard URL: {}", config.console_url());
        } else {
            let _ = writeln!(out, "✗ FAIL - Insufficient metrics data for verification");
        }
        out
    }
}

pub struct WidgetVerifier<'a, C: CloudClient> {
    client: C,
    config: &'a VerifierConfig,
}

impl<'a, C: CloudClient> WidgetVerifier<'a, C> {
    pub fn new(client: C, config: &'a VerifierConfig) -> Self {
        Self { client, config }
    }

    pub fn run(&self) -> VerifierOutcome {
        let config = self.config;

        let dashboard = match self
            .client
            .get_dashboard(&config.dashboard_name)
            .and_then(|body| Ok(Dashboard::from_json(&body)?))
        {
            Ok(dashboard) => dashboard,
            Err(e) => {
                tracing::error!(error = %e, dashboard = %config.dashboard_name, "failed to get dashboard");
                return VerifierOutcome::DashboardUnavailable(e.to_string());
            }
        };
        let widget_count = dashboard.widgets.len();
        tracing::info!(widgets = widget_count, "dashboard found");

        let window = TimeWindow::trailing(config.lookback_hours, Utc::now());
        let metrics = match self.client.get_metric_data(&metric_batch(config), &window) {
            Ok(series) => MetricsSummary::from_series(series),
            Err(e) => {
                tracing::error!(error = %e, "failed to get metrics data");
                return VerifierOutcome::MetricsUnavailable {
                    widget_count,
                    error: e.to_string(),
                };
            }
        };

        let missing = metrics.missing();
        if !missing.is_empty() {
            tracing::warn!(?missing, "required metrics missing");
            return VerifierOutcome::MissingMetrics {
                widget_count,
                missing,
            };
        }

        let invocations = metrics.total("invocations");
        let input_tokens = metrics.total("input_tokens");
        let output_tokens = metrics.total("output_tokens");
        let widgets: Vec<WidgetLine> = dashboard
            .widgets
            .iter()
            .map(|w| WidgetLine {
                kind: w.kind.as_str().to_string(),
                title: w.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            })
            .collect();
        let tally = CategoryTally::from_titles(widgets.iter().map(|w| w.title.as_str()));
        let passed =
            invocations >= config.min_invocations && input_tokens > 0.0 && output_tokens > 0.0;

        VerifierOutcome::Complete(Verification {
            widgets,
            tally,
            invocations,
            input_tokens,
            output_tokens,
            input_cost: config.pricing.cost(input_tokens, 0.0),
            output_cost: config.pricing.cost(0.0, output_tokens),
            throughput: Throughput::compute(
                input_tokens,
                output_tokens,
                config.output_weight,
                config.period_minutes,
            ),
            metrics,
            passed,
        })
    }
}
