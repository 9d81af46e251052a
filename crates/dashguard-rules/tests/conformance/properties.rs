//! Property tests over subsets of the reference template.

use super::common::*;
use dashguard_core::{CheckConfig, Template};
use dashguard_rules::{RuleContext, RuleSet};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

const CRITICAL_RESOURCES: [&str; 8] = [
    "NovaProDashboard",
    "AlarmTopic",
    "HighErrorRateAlarm",
    "HighP99LatencyAlarm",
    "DailyCostLimitAlarm",
    "HighThrottlingRateAlarm",
    "DashboardViewerPolicy",
    "DashboardViewerRole",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_dropping_any_default_names_that_parameter(name in select(OPTIONAL_PARAMETERS.to_vec())) {
        let source = remove_line_after(REFERENCE, &parameter_anchor(name), "Default:");
        let report = check(&source);
        let errors = errors_for(&report, "parameter-defaults");
        let location = format!("Parameters.{name}");
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].location.as_deref(), Some(location.as_str()));
    }

    #[test]
    fn test_dropped_retain_policies_are_reported(
        names in subsequence(CRITICAL_RESOURCES.to_vec(), 1..=4)
    ) {
        let mut source = REFERENCE.to_string();
        for name in &names {
            source = remove_line_after(&source, &format!("  {name}:"), "DeletionPolicy: Retain");
        }
        let report = check(&source);
        let errors = errors_for(&report, "update-safety");
        prop_assert_eq!(errors.len(), names.len());
        for name in &names {
            let location = format!("Resources.{name}");
            prop_assert!(errors.iter().any(|f| f.location.as_deref() == Some(location.as_str())));
        }
    }

    #[test]
    fn test_report_is_independent_of_rule_order(
        rules in Just(RuleSet::standard().rules().to_vec()).prop_shuffle()
    ) {
        let source = remove_line_after(REFERENCE, "  HighP99LatencyAlarm:", "AlarmActions:");
        let template = Template::parse(source);
        let config = CheckConfig::default();
        let ctx = RuleContext::new(&template, &config);
        let shuffled = RuleSet::new(rules).run(&ctx);
        let standard = RuleSet::standard().run(&ctx);
        prop_assert_eq!(shuffled, standard);
    }
}

#[test]
fn test_rerun_is_identical() {
    let source = without_section(REFERENCE, "Outputs");
    let first = check(&source);
    let second = check(&source);
    assert_eq!(first, second);
    assert_eq!(first.exit_code(), second.exit_code());
    assert_eq!(
        first.render("Validation"),
        second.render("Validation")
    );
}
