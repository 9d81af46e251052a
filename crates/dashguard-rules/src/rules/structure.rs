//! Structural completeness, size limit and dashboard schema.

use std::sync::LazyLock;

use dashguard_core::dashboard::DASHBOARD_TYPE;
use dashguard_core::template::REQUIRED_SECTIONS;
use regex::Regex;
use serde_json::Value;

use super::alarms::ALARM_TYPE;
use crate::context::RuleContext;
use crate::finding::Finding;

const OPTIONAL_TYPES: [(&str, &str); 3] = [
    ("AWS::SNS::Topic", "SNS Topic (conditional)"),
    ("AWS::IAM::Role", "IAM Role (optional - customer may use existing)"),
    (
        "AWS::IAM::ManagedPolicy",
        "IAM Managed Policy (optional - customer may use existing)",
    ),
];

const DASHBOARD_SCHEMA: &str = include_str!("../../../../schemas/DashboardBody.schema.json");

static RESOURCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^  \w+:\s*$").expect("resource line pattern"));

pub(crate) fn required_sections(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    Ok(REQUIRED_SECTIONS
        .iter()
        .map(|section| match ctx.template.require_section(section) {
            Ok(()) => Finding::pass(format!("Found section: {section}")),
            Err(e) => Finding::precondition(&e).with_location(*section),
        })
        .collect())
}

pub(crate) fn resource_completeness(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let mut findings = Vec::new();

    let count = match ctx.resources() {
        Ok(resources) => resources.len(),
        Err(_) => RESOURCE_LINE.find_iter(ctx.template.source()).count(),
    };
    if count > 0 {
        findings.push(Finding::pass(format!("Found {count} resources")));
    } else {
        findings.push(Finding::fail("No resources found in template"));
    }

    for (resource_type, description) in [
        (DASHBOARD_TYPE, "CloudWatch Dashboard"),
        (ALARM_TYPE, "CloudWatch Alarms"),
    ] {
        if ctx.declares_type(resource_type) {
            findings.push(Finding::pass(format!("Found {description}")));
        } else {
            findings.push(Finding::fail(format!(
                "Missing required {description} ({resource_type})"
            )));
        }
    }

    for (resource_type, description) in OPTIONAL_TYPES {
        if ctx.declares_type(resource_type) {
            findings.push(Finding::pass(format!("Found {description}")));
        } else {
            findings.push(Finding::pass(format!("{description} not found")));
        }
    }
    Ok(findings)
}

pub(crate) fn template_size(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let size = ctx.template.size_bytes();
    let limit = ctx.config.size_limit_bytes;
    let finding = if size > limit {
        Finding::warn(format!(
            "Template size ({size} bytes) exceeds the validation limit ({limit} bytes); deploy it from object storage"
        ))
    } else {
        Finding::pass(format!("Template size ({size} bytes) within limits"))
    };
    Ok(vec![finding])
}

pub(crate) fn dashboard_schema(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let dashboard = ctx.dashboard()?;

    let schema: Value = match serde_json::from_str(DASHBOARD_SCHEMA) {
        Ok(schema) => schema,
        Err(e) => {
            return Ok(vec![Finding::fail(format!(
                "Failed to parse embedded dashboard schema: {e}"
            ))]);
        }
    };
    let compiled = match jsonschema::validator_for(&schema) {
        Ok(c) => c,
        Err(e) => {
            return Ok(vec![Finding::fail(format!(
                "Failed to compile dashboard schema: {e}"
            ))]);
        }
    };

    let mut findings = Vec::new();
    for error in compiled.iter_errors(&dashboard.body) {
        let path = error.instance_path().to_string();
        let location = if path.is_empty() {
            "(root)".to_string()
        } else {
            path
        };
        findings.push(Finding::fail(format!("{error}")).with_location(location));
    }
    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "Dashboard body matches schema ({} widgets)",
            dashboard.widgets.len()
        )));
    }
    Ok(findings)
}
