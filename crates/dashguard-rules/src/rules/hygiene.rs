//! Security hygiene and production readiness.
//!
//! Hygiene findings are informational. Tagging and alarm coverage only warn.

use dashguard_core::{Node, Resource};

use crate::context::RuleContext;
use crate::finding::Finding;

const ALARM_TYPE_TAG: &str = "AlarmType";

pub(crate) fn security_hygiene(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let retains = match ctx.resources() {
        Ok(resources) => resources.iter().any(Resource::retains_on_delete),
        Err(_) => ctx.source_contains("DeletionPolicy: Retain"),
    };

    let checks = [
        (
            ctx.declares_resource(&ctx.config.viewer_policy),
            "Found least-privilege IAM policy",
            "No IAM resources - customer will use existing role",
        ),
        (
            ctx.source_contains("KmsMasterKeyId"),
            "SNS topic encryption configured",
            "SNS topic encryption not configured",
        ),
        (
            retains,
            "Deletion protection configured",
            "No resource retains on delete",
        ),
        (
            ctx.source_contains("aws:SecureTransport"),
            "Secure transport enforcement found",
            "No aws:SecureTransport condition",
        ),
        (
            ctx.source_contains("aws:SourceAccount"),
            "Account-based access restrictions found",
            "No aws:SourceAccount condition",
        ),
    ];

    Ok(checks
        .into_iter()
        .map(|(present, found, missing)| Finding::pass(if present { found } else { missing }))
        .collect())
}

/// `(key, value)` pairs of every resource's `Tags` list.
fn tag_pairs(resource: &Resource) -> Vec<(String, String)> {
    resource
        .property("Tags")
        .map(Node::items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tag| {
            let key = tag.get("Key")?.render();
            let value = tag.get("Value").map(Node::render).unwrap_or_default();
            Some((key, value))
        })
        .collect()
}

pub(crate) fn tagging(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let keys: Option<Vec<String>> = ctx.resources().ok().map(|resources| {
        resources
            .iter()
            .flat_map(tag_pairs)
            .map(|(key, _)| key)
            .collect()
    });

    Ok(ctx
        .config
        .tag_keys
        .iter()
        .map(|tag| {
            let present = match &keys {
                Some(keys) => keys.iter().any(|k| k == tag),
                None => ctx.source_contains(&format!("Key: {tag}")),
            };
            if present {
                Finding::pass(format!("Found {tag} tag"))
            } else {
                Finding::warn(format!("Missing {tag} tag"))
            }
        })
        .collect())
}

pub(crate) fn alarm_coverage(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let types: Option<Vec<String>> = ctx.resources().ok().map(|resources| {
        resources
            .iter()
            .flat_map(tag_pairs)
            .filter(|(key, _)| key == ALARM_TYPE_TAG)
            .map(|(_, value)| value)
            .collect()
    });

    Ok(ctx
        .config
        .alarm_types
        .iter()
        .map(|alarm_type| {
            let present = match &types {
                Some(types) => types.iter().any(|t| t == alarm_type),
                None => ctx.source_contains(&format!("{ALARM_TYPE_TAG}: {alarm_type}")),
            };
            if present {
                Finding::pass(format!("Found {alarm_type} alarm"))
            } else {
                Finding::warn(format!("Missing {alarm_type} alarm"))
            }
        })
        .collect())
}

pub(crate) fn parameterization(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let required = &ctx.config.required_parameter;
    let parameterised = match ctx.parameters() {
        Ok(parameters) => parameters.iter().any(|p| &p.name == required),
        Err(_) => ctx.template.require_section("Parameters").is_ok() && ctx.source_contains(required),
    };
    let message = if parameterised {
        "Template is properly parameterized".to_string()
    } else {
        format!("Template does not declare the {required} parameter")
    };
    Ok(vec![Finding::pass(message)])
}

pub(crate) fn essential_outputs(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let outputs = ctx.template.output_names();
    let has = |name: &str| match &outputs {
        Ok(outputs) => outputs.iter().any(|o| o == name),
        Err(_) => ctx.source_contains(name),
    };
    let message = if has("DashboardURL") && has("DashboardName") {
        "Essential outputs provided"
    } else {
        "DashboardURL and DashboardName outputs not both provided"
    };
    Ok(vec![Finding::pass(message)])
}
