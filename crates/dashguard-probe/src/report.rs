//! Plain-text live probe report.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::ProbeError;
use crate::probe::ProbeOutcome;

/// `dashboard_test_report_YYYYMMDD_HHMMSS.txt`
pub fn file_name(started_at: DateTime<Utc>) -> String {
    format!(
        "dashboard_test_report_{}.txt",
        started_at.format("%Y%m%d_%H%M%S")
    )
}

/// Digits grouped by thousands, `12,345`.
fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render(outcome: &ProbeOutcome) -> String {
    let mut out = String::new();
    let rule = "-".repeat(40);
    let summary = &outcome.summary;
    let dashboard = &outcome.dashboard;

    let _ = writeln!(out, "{}", "=".repeat(80));
    let _ = writeln!(out, "NOVA PRO CLOUDWATCH DASHBOARD - TEST REPORT");
    let _ = writeln!(out, "{}", "=".repeat(80));
    let _ = writeln!(out, "Test Date: {}", outcome.started_at.to_rfc3339());
    let _ = writeln!(out, "Region: {}", outcome.target.region);
    let _ = writeln!(out, "Stack: {}", outcome.target.stack_name);
    let _ = writeln!(out, "Model ID: {}", outcome.deployment.model_id);
    let _ = writeln!(out, "Dashboard: {}", outcome.deployment.dashboard_name);
    let _ = writeln!(out);

    let _ = writeln!(out, "TEST INVOCATION SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Invocations: {}", summary.total);
    let _ = writeln!(out, "Successful: {}", summary.successful);
    let _ = writeln!(out, "Failed: {}", summary.failed());
    let _ = writeln!(out, "Success Rate: {:.1}%", summary.success_rate() * 100.0);
    if let Some(latency) = summary.average_latency_ms {
        let _ = writeln!(out, "Average Latency: {latency:.0}ms");
        let _ = writeln!(
            out,
            "Total Input Tokens (est): {}",
            grouped(summary.input_tokens_estimate)
        );
        let _ = writeln!(
            out,
            "Total Output Tokens (est): {}",
            grouped(summary.output_tokens_estimate)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "DASHBOARD VERIFICATION");
    let _ = writeln!(out, "{rule}");
    if dashboard.accessible {
        let _ = writeln!(out, "✓ Dashboard accessible");
        let _ = writeln!(out, "✓ Found {} widgets", dashboard.widget_count);
        if dashboard.metrics_available {
            let _ = writeln!(out, "✓ Metrics data available");
        } else {
            let _ = writeln!(out, "⚠ No metrics data yet (may need more time)");
        }
    } else {
        let _ = writeln!(out, "✗ Dashboard not accessible");
        if let Some(error) = &dashboard.dashboard_error {
            let _ = writeln!(out, "Error: {error}");
        }
    }
    if let Some(error) = &dashboard.metrics_error {
        let _ = writeln!(out, "Metrics error: {error}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "COST CALCULATION VERIFICATION");
    let _ = writeln!(out, "{rule}");
    match &outcome.cost {
        Some(cost) => {
            let _ = writeln!(out, "✓ Cost calculation data available");
            let _ = writeln!(out, "Expected Total Cost: ${:.4}", cost.total());
        }
        None => {
            let _ = writeln!(out, "✗ Cost calculation data not available");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "OVERALL TEST RESULT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", outcome.verdict.description());
    let _ = writeln!(out);

    let url = outcome.deployment.dashboard_url.as_deref().unwrap_or("N/A");
    let _ = writeln!(out, "Dashboard URL: {url}");
    out
}

/// Persists the rendered report under `dir` and returns its path.
pub fn write(outcome: &ProbeOutcome, dir: &Path) -> Result<PathBuf, ProbeError> {
    let path = dir.join(file_name(outcome.started_at));
    std::fs::write(&path, &outcome.report)?;
    Ok(path)
}
