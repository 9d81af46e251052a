use std::time::Duration;

use dashguard_core::ProbeConfig;
use dashguard_probe::{LiveProbe, ProbeError, ProbeTarget, Verdict};

use crate::common::{FakeCloud, RecordingPause};

fn target() -> ProbeTarget {
    ProbeTarget {
        region: "us-east-1".to_string(),
        stack_name: "nova-pro-dashboard".to_string(),
    }
}

fn config(report_dir: &std::path::Path) -> ProbeConfig {
    ProbeConfig {
        report_dir: report_dir.to_path_buf(),
        ..ProbeConfig::default()
    }
}

#[test]
fn test_nine_of_ten_with_reachable_dashboard_passes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let mut plan = vec![true; 10];
    plan[3] = false;
    let cloud = FakeCloud::new().with_invoke_plan(plan);
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.summary.total, 10);
    assert_eq!(outcome.summary.successful, 9);
    assert_eq!(outcome.verdict, Verdict::Pass);
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.dashboard.accessible);
    assert_eq!(outcome.dashboard.widget_count, 3);
    assert!(outcome.dashboard.metrics_available);
    assert_eq!(outcome.dashboard.observed_invocations, 9.0);
    assert!(outcome.cost.is_some());

    // Failed invocations carry their error and no token estimates.
    let failed = &outcome.records[3];
    assert!(!failed.success);
    assert_eq!(failed.sequence, 4);
    assert!(failed.error.as_deref().unwrap().contains("ThrottlingException"));
    assert_eq!(failed.input_tokens_estimate, 0);

    let report = std::fs::read_to_string(&outcome.report_path).unwrap();
    assert_eq!(report, outcome.report);
    assert!(report.contains("Success Rate: 90.0%"));
    assert!(report.contains("✓ PASS - Test completed successfully"));
    assert!(report.contains("Dashboard URL: https://console.example/dashboards/NovaProMonitoring-test"));
    let file_name = outcome.report_path.file_name().unwrap().to_string_lossy();
    assert!(file_name.starts_with("dashboard_test_report_"));
    assert_eq!(outcome.report_path.parent(), Some(dir.path()));
}

#[test]
fn test_pause_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let cloud = FakeCloud::new().with_invoke_plan(vec![true, false, true]);
    let pause = RecordingPause::default();
    let config = ProbeConfig {
        invocations: 3,
        wait_minutes: 2,
        ..config
    };

    LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    let success = Duration::from_secs(2);
    let failure = Duration::from_secs(1);
    let minute = Duration::from_secs(60);
    assert_eq!(
        *pause.pauses.borrow(),
        vec![success, failure, success, minute, minute]
    );
    assert_eq!(cloud.invocation_calls(), 3);
}

#[test]
fn test_stack_outputs_drive_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        invocations: 2,
        wait_minutes: 0,
        ..config(dir.path())
    };
    let cloud = FakeCloud::new();
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.deployment.dashboard_name, "NovaProMonitoring-test");
    assert_eq!(*cloud.dashboards_requested.borrow(), vec!["NovaProMonitoring-test"]);
    assert!(cloud
        .invoked_models
        .borrow()
        .iter()
        .all(|m| m == "amazon.nova-pro-v1:0"));

    let queries = cloud.metric_queries.borrow();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].metric_name, "Invocations");
    assert_eq!(queries[0].stat, "Sum");
    assert_eq!(
        queries[0].dimensions,
        vec![("ModelId".to_string(), "amazon.nova-pro-v1:0".to_string())]
    );
}

#[test]
fn test_missing_outputs_fall_back_to_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        invocations: 1,
        wait_minutes: 0,
        ..config(dir.path())
    };
    let mut cloud = FakeCloud::new();
    cloud.stack = Some(dashguard_probe::StackInfo::new(
        "nova-pro-dashboard",
        Vec::new(),
        Vec::new(),
    ));
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.deployment.model_id, config.default_model_id);
    assert_eq!(outcome.deployment.dashboard_name, config.default_dashboard_name);
    assert_eq!(outcome.deployment.dashboard_url, None);
    assert!(outcome.report.contains("Dashboard URL: N/A"));
}

#[test]
fn test_unreachable_dashboard_is_partial() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        wait_minutes: 0,
        ..config(dir.path())
    };
    let cloud = FakeCloud::new().with_dashboard_error("ResourceNotFound: dashboard does not exist");
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Partial);
    assert_eq!(outcome.exit_code(), 1);
    assert!(!outcome.dashboard.accessible);
    assert!(outcome
        .dashboard
        .dashboard_error
        .as_deref()
        .unwrap()
        .contains("ResourceNotFound"));
    // The metric query still runs after the dashboard read fails.
    assert!(outcome.dashboard.metrics_available);
    assert!(outcome.report.contains("✗ Dashboard not accessible"));
    assert!(outcome.report.contains("⚠ PARTIAL"));
}

#[test]
fn test_malformed_dashboard_body_is_partial() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        wait_minutes: 0,
        ..config(dir.path())
    };
    let mut cloud = FakeCloud::new();
    cloud.dashboard = Ok("{\"rows\": []}".to_string());
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Partial);
    assert!(outcome.dashboard.dashboard_error.is_some());
}

#[test]
fn test_metric_failure_does_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        wait_minutes: 0,
        ..config(dir.path())
    };
    let cloud = FakeCloud::new().with_metrics_error("AccessDenied");
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Pass);
    assert!(!outcome.dashboard.metrics_available);
    assert!(outcome.report.contains("Metrics error:"));
}

#[test]
fn test_below_ratio_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        wait_minutes: 0,
        ..config(dir.path())
    };
    let plan = vec![true, true, false, true, false, true, true, false, true, true];
    let cloud = FakeCloud::new().with_invoke_plan(plan);
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.summary.successful, 7);
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.report.contains("✗ FAIL - Critical issues detected"));
}

#[test]
fn test_exact_ratio_passes() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        wait_minutes: 0,
        ..config(dir.path())
    };
    let mut plan = vec![true; 10];
    plan[0] = false;
    plan[9] = false;
    let cloud = FakeCloud::new().with_invoke_plan(plan);
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.summary.successful, 8);
    assert_eq!(outcome.verdict, Verdict::Pass);
}

#[test]
fn test_no_successes_has_no_cost() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        invocations: 3,
        wait_minutes: 0,
        ..config(dir.path())
    };
    let cloud = FakeCloud::new().with_invoke_plan(vec![false; 3]);
    let pause = RecordingPause::default();

    let outcome = LiveProbe::new(&cloud, &pause, &config).run(&target()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(outcome.cost, None);
    assert_eq!(outcome.summary.average_latency_ms, None);
    assert!(outcome.report.contains("✗ Cost calculation data not available"));
}

#[test]
fn test_missing_stack_aborts_before_invoking() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let cloud = FakeCloud::new().without_stack();
    let pause = RecordingPause::default();

    let err = LiveProbe::new(&cloud, &pause, &config)
        .run(&target())
        .unwrap_err();

    assert!(matches!(err, ProbeError::StackNotFound(ref name) if name == "nova-pro-dashboard"));
    assert_eq!(cloud.invocation_calls(), 0);
    assert!(pause.pauses.borrow().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unwritable_report_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig {
        invocations: 1,
        wait_minutes: 0,
        ..config(&dir.path().join("missing"))
    };
    let cloud = FakeCloud::new();
    let pause = RecordingPause::default();

    let err = LiveProbe::new(&cloud, &pause, &config)
        .run(&target())
        .unwrap_err();

    assert!(matches!(err, ProbeError::Io(_)));
}
