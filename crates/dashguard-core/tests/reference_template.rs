//! Extraction against the bundled reference template.

use dashguard_core::iam::policy_statements;
use dashguard_core::{
    CheckConfig, Dashboard, IdentityUse, LogQuery, Template, WidgetCategory, WidgetKind,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const REFERENCE: &str = include_str!("../../../templates/nova-pro-dashboard-template.yaml");

fn reference() -> Template {
    Template::parse(REFERENCE)
}

#[test]
fn test_reference_parses_as_tree() {
    let template = reference();
    assert!(!template.is_text_only(), "{:?}", template.parse_error());
    assert_eq!(template.parameters().unwrap().len(), 13);
    assert_eq!(
        template.output_names().unwrap(),
        vec!["DashboardURL", "DashboardName", "AlarmTopicArn", "ViewerRoleArn"]
    );
}

#[test]
fn test_reference_dashboard() {
    let config = CheckConfig::default();
    let dashboard = Dashboard::extract(&reference(), &config.substitution_table()).unwrap();
    assert_eq!(dashboard.resource.as_deref(), Some("NovaProDashboard"));
    assert_eq!(dashboard.metric_widgets().count(), 6);
    assert_eq!(dashboard.log_widgets().count(), 3);
    assert!(
        dashboard
            .widgets
            .iter()
            .all(|w| w.region.as_deref() == Some("us-east-1"))
    );
    for widget in dashboard.metric_widgets() {
        for spec in widget.metric_specs() {
            assert_eq!(spec.dimension("ModelId"), Some("amazon.nova-pro-v1:0"));
        }
    }
    assert!(
        dashboard
            .log_widgets()
            .all(|w| w.kind == WidgetKind::Log && w.query.is_some())
    );
}

#[test]
fn test_reference_queries_are_parameterised() {
    let config = CheckConfig::default();
    let dashboard = Dashboard::extract(&reference(), &config.substitution_table()).unwrap();
    let queries = LogQuery::from_dashboard(&dashboard);
    assert_eq!(queries.len(), 3);

    let user = &config.identity_fields[0];
    let application = &config.identity_fields[1];
    assert_eq!(queries[0].identity_use(user), IdentityUse::Parameterised);
    assert_eq!(queries[1].identity_use(application), IdentityUse::Parameterised);
    assert_eq!(queries[2].identity_use(user), IdentityUse::Parameterised);
    assert_eq!(queries[2].identity_use(application), IdentityUse::Parameterised);
}

#[test]
fn test_reference_statements() {
    let statements = policy_statements(&reference()).unwrap();
    assert_eq!(statements.len(), 4);
    assert!(statements.iter().all(|s| s.policy == "DashboardViewerPolicy"));
    let wildcard: Vec<_> = statements
        .iter()
        .filter(|s| s.has_wildcard_resource())
        .collect();
    assert_eq!(wildcard.len(), 2);
    assert!(wildcard.iter().all(|s| s.has_condition));
}

#[test]
fn test_reference_widget_categories() {
    let config = CheckConfig::default();
    let dashboard = Dashboard::extract(&reference(), &config.substitution_table()).unwrap();
    let categories: Vec<Option<WidgetCategory>> = dashboard
        .widgets
        .iter()
        .map(|w| WidgetCategory::classify(w.title_or_empty()))
        .collect();
    assert_eq!(categories[0], Some(WidgetCategory::UsageOverview));
    assert_eq!(categories[1], Some(WidgetCategory::CostTracking));
    assert_eq!(categories[2], Some(WidgetCategory::UsageOverview));
    assert_eq!(categories[3], Some(WidgetCategory::ErrorMonitoring));
    assert_eq!(categories[4], Some(WidgetCategory::InvocationPatterns));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn substitution_without_bindings_is_identity(text in "[a-zA-Z0-9 {}$\"]{0,64}") {
        let out = dashguard_core::dashboard::substitute(&text, |_| None);
        prop_assert_eq!(out, text);
    }

    #[test]
    fn classification_matches_a_keyword_of_its_category(title in "[a-zA-Z ]{0,32}") {
        if let Some(category) = WidgetCategory::classify(&title) {
            let lower = title.to_lowercase();
            prop_assert!(category.keywords().iter().any(|k| lower.contains(k)));
            for earlier in WidgetCategory::ALL.iter().take_while(|c| **c != category) {
                prop_assert!(!earlier.keywords().iter().any(|k| lower.contains(k)));
            }
        }
    }
}
