//! End-to-end scenarios over whole documents.

use super::common::*;
use dashguard_core::Template;
use dashguard_rules::{FindingKind, Status};
use pretty_assertions::assert_eq;

// =============================================================================
// REFERENCE TEMPLATE
// =============================================================================

#[test]
fn test_reference_template_passes_every_rule() {
    let report = check(REFERENCE);
    let errors: Vec<String> = report
        .errors()
        .iter()
        .map(|f| format!("[{}] {}", f.rule, f.message))
        .collect();
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(report.warning_count(), 0);
    assert_eq!(report.status(), Status::Passed);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_reference_render_mentions_verdict() {
    let rendered = check(REFERENCE).render("Nova Pro Dashboard Template Validation");
    assert!(rendered.contains("✅ PASSED CHECKS"));
    assert!(rendered.contains("VALIDATION PASSED - Template is production ready"));
    assert!(!rendered.contains("❌ ERRORS"));
}

// =============================================================================
// SCENARIO A - MISSING OUTPUTS
// =============================================================================

#[test]
fn test_missing_outputs_is_precondition_failure() {
    let source = without_section(REFERENCE, "Outputs");
    let template = Template::parse(source.as_str());
    assert!(template.section("Outputs").unwrap_err().is_missing_section());

    let report = check(&source);
    let sections = errors_for(&report, "required-sections");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].kind, FindingKind::Precondition);
    assert_eq!(sections[0].location.as_deref(), Some("Outputs"));
    assert_eq!(report.status(), Status::Failed);
    assert_eq!(report.exit_code(), 1);
}

// =============================================================================
// SCENARIO B - ALARM WITHOUT ACTIONS
// =============================================================================

#[test]
fn test_alarm_without_actions_fails_wiring() {
    let source = remove_line_after(REFERENCE, "  HighErrorRateAlarm:", "AlarmActions:");
    let report = check(&source);
    let wiring = errors_for(&report, "alarm-wiring");
    assert_eq!(wiring.len(), 1);
    assert_eq!(wiring[0].kind, FindingKind::Assertion);
    assert!(wiring[0].message.contains("HighErrorRateAlarm"));
    assert_eq!(report.exit_code(), 1);
}

// =============================================================================
// SCENARIO C - DENIED TOPIC ACTION
// =============================================================================

#[test]
fn test_unsubscribe_anywhere_fails() {
    let source = format!("{REFERENCE}# sns:Unsubscribe is never granted here\n");
    let report = check(&source);
    let topic = errors_for(&report, "topic-policy-actions");
    assert!(
        topic
            .iter()
            .any(|f| f.message == "sns:Unsubscribe is not a valid SNS topic policy action")
    );
    assert!(
        topic
            .iter()
            .any(|f| f.message == "Invalid SNS action found: sns:Unsubscribe")
    );
    assert_eq!(report.status(), Status::Failed);
}

#[test]
fn test_wildcard_topic_action_fails() {
    let source = REFERENCE.replacen("Action: sns:Publish", "Action: '*'", 1);
    let report = check(&source);
    assert!(
        errors_for(&report, "topic-policy-actions")
            .iter()
            .any(|f| f.message.contains("Wildcard action"))
    );
}

// =============================================================================
// ASSERTIONS ON FOUND DATA
// =============================================================================

#[test]
fn test_hardcoded_identity_field_fails() {
    let source = REFERENCE.replacen(r#"/\"${UserIdField}\":"#, r#"/\"userId\":"#, 1);
    let report = check(&source);
    let identity = errors_for(&report, "identity-fields");
    assert_eq!(identity.len(), 1);
    assert!(identity[0].location.as_deref().unwrap().contains("Top Users"));
}

#[test]
fn test_mutating_viewer_action_fails() {
    let source = REFERENCE.replacen(
        "- cloudwatch:ListDashboards",
        "- cloudwatch:PutDashboard",
        1,
    );
    let report = check(&source);
    let privilege = errors_for(&report, "least-privilege");
    assert_eq!(privilege.len(), 1);
    assert!(privilege[0].message.contains("cloudwatch:PutDashboard"));
    assert!(privilege[0].location.as_deref().unwrap().contains("DashboardRead"));
}

#[test]
fn test_missing_tags_only_warn() {
    let source = REFERENCE.replace("- Key: CostCenter", "- Key: Department");
    let report = check(&source);
    assert_eq!(report.status(), Status::PassedWithWarnings);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.warnings()[0].message, "Missing CostCenter tag");
}

// =============================================================================
// TEXT-ONLY DOCUMENTS
// =============================================================================

#[test]
fn test_unparseable_document_still_runs_text_rules() {
    let source = format!("{REFERENCE}@broken: [\n");
    let template = Template::parse(source.as_str());
    assert!(template.is_text_only());

    let report = check(&source);
    assert!(errors_for(&report, "topic-policy-actions").is_empty());
    assert!(errors_for(&report, "required-sections").is_empty());
    assert!(errors_for(&report, "region-consistency").is_empty());

    let defaults = errors_for(&report, "parameter-defaults");
    assert_eq!(defaults.len(), 1);
    assert!(defaults[0].is_precondition());
    assert_eq!(report.status(), Status::Failed);
}
