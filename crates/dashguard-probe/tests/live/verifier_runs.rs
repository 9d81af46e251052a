use dashguard_core::{VerifierConfig, WidgetCategory};
use dashguard_probe::{VerifierOutcome, WidgetVerifier};
use pretty_assertions::assert_eq;

use crate::common::{FakeCloud, series};

fn full_metrics(invocations: &[f64]) -> Vec<dashguard_probe::MetricSeries> {
    vec![
        series("invocations", invocations),
        series("input_tokens", &[600.0, 400.0]),
        series("output_tokens", &[200.0]),
        series("latency_avg", &[850.0, 910.0]),
        series("latency_p99", &[1400.0]),
    ]
}

#[test]
fn test_complete_verification_passes() {
    let config = VerifierConfig::default();
    let cloud = FakeCloud::new().with_metrics(full_metrics(&[2.0, 3.0]));

    let outcome = WidgetVerifier::new(&cloud, &config).run();

    let VerifierOutcome::Complete(verification) = &outcome else {
        panic!("expected a complete verification, got {outcome:?}");
    };
    assert!(verification.passed);
    assert_eq!(verification.invocations, 5.0);
    assert_eq!(verification.input_tokens, 1000.0);
    assert_eq!(verification.output_tokens, 200.0);
    assert_eq!(verification.throughput.service_tpm, 400.0);
    assert_eq!(verification.throughput.customer_tpm, 240.0);
    assert!((verification.input_cost - 0.0008).abs() < 1e-12);
    assert!((verification.output_cost - 0.00064).abs() < 1e-12);
    assert_eq!(verification.tally.count(WidgetCategory::UsageOverview), 1);
    assert_eq!(verification.tally.count(WidgetCategory::CostTracking), 1);
    assert_eq!(verification.tally.count(WidgetCategory::InvocationPatterns), 1);
    assert_eq!(outcome.exit_code(), 0);

    assert_eq!(*cloud.dashboards_requested.borrow(), vec!["BedrockCompleteDashboard"]);
    let queries = cloud.metric_queries.borrow();
    assert_eq!(queries.len(), 5);
    assert!(queries.iter().all(|q| q.period_seconds == 300));

    let text = outcome.render(&config);
    assert!(text.contains("✓ Dashboard found with 3 widgets"));
    assert!(text.contains("Latest Average Latency: 910ms"));
    assert!(text.contains("Service TPM (Quota): 400.0 tokens/min"));
    assert!(text.contains("  LOG: Top Users by Cost"));
    assert!(text.contains("✓ PASS - Dashboard has sufficient metrics data"));
    assert!(text.contains("dashboards:name=BedrockCompleteDashboard"));
}

#[test]
fn test_too_few_invocations_fails() {
    let config = VerifierConfig::default();
    let cloud = FakeCloud::new().with_metrics(full_metrics(&[2.0]));

    let outcome = WidgetVerifier::new(&cloud, &config).run();

    assert!(matches!(&outcome, VerifierOutcome::Complete(v) if !v.passed));
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.render(&config).contains("✗ FAIL - Insufficient metrics data"));
}

#[test]
fn test_missing_series_stops_early() {
    let config = VerifierConfig::default();
    let cloud = FakeCloud::new().with_metrics(vec![
        series("invocations", &[5.0]),
        series("input_tokens", &[100.0]),
        series("output_tokens", &[]),
    ]);

    let outcome = WidgetVerifier::new(&cloud, &config).run();

    assert_eq!(
        outcome,
        VerifierOutcome::MissingMetrics {
            widget_count: 3,
            missing: vec!["output_tokens".to_string()],
        }
    );
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome
        .render(&config)
        .contains("✗ Missing required metrics: output_tokens"));
}

#[test]
fn test_unavailable_dashboard_skips_metrics() {
    let config = VerifierConfig::default();
    let cloud = FakeCloud::new().with_dashboard_error("ResourceNotFound");

    let outcome = WidgetVerifier::new(&cloud, &config).run();

    assert!(matches!(&outcome, VerifierOutcome::DashboardUnavailable(e) if e.contains("ResourceNotFound")));
    assert!(cloud.metric_queries.borrow().is_empty());
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.render(&config).starts_with("✗ Failed to get dashboard"));
}

#[test]
fn test_metrics_error_is_reported() {
    let config = VerifierConfig::default();
    let cloud = FakeCloud::new().with_metrics_error("AccessDenied");

    let outcome = WidgetVerifier::new(&cloud, &config).run();

    assert!(matches!(
        &outcome,
        VerifierOutcome::MetricsUnavailable { widget_count: 3, error } if error.contains("AccessDenied")
    ));
    let text = outcome.render(&config);
    assert!(text.contains("✓ Dashboard found with 3 widgets"));
    assert!(text.contains("✗ Failed to get metrics data"));
}
