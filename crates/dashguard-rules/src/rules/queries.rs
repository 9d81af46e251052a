//! Log-query analytics: identity extraction, group coverage and unattributed usage.

use dashguard_core::{IdentityUse, LogQuery, TemplateError};

use crate::context::RuleContext;
use crate::finding::Finding;

const UNKNOWN_MARKERS: [&str; 2] = ["unknown", "unattributed"];
const FALLBACK_MARKERS: [&str; 2] = ["coalesce(", "ispresent("];
const PERCENT_MARKERS: [&str; 2] = ["* 100", "100 *"];

pub(crate) fn identity_fields(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let queries = ctx.queries()?;
    let mut findings = Vec::new();
    let mut extracting = 0usize;

    for query in &queries {
        for field in &ctx.config.identity_fields {
            let message = match query.identity_use(field) {
                IdentityUse::Absent => continue,
                IdentityUse::Parameterised => {
                    extracting += 1;
                    continue;
                }
                IdentityUse::Hardcoded => format!(
                    "Query extracts {} with a hardcoded field name instead of ${{{}}}",
                    field.capture, field.parameter
                ),
                IdentityUse::Uncaptured => format!(
                    "Query uses ${{{}}} but never captures (?<{}>",
                    field.parameter, field.capture
                ),
            };
            findings.push(Finding::fail(message).with_location(query.location.clone()));
        }
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "{extracting} identity extractions use the field-name parameters"
        )));
    }
    Ok(findings)
}

pub(crate) fn analytics_completeness(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let queries = ctx.queries()?;
    let [input_price, output_price] = ctx.config.pricing.as_text();
    let markers = [
        "count(".to_string(),
        "inputTokenCount".to_string(),
        "outputTokenCount".to_string(),
        input_price,
        output_price,
    ];
    let mut findings = Vec::new();

    for group in &ctx.config.query_groups {
        let members: Vec<&LogQuery> = queries
            .iter()
            .filter(|q| group.matches_title(&q.title))
            .collect();
        if members.is_empty() {
            let error =
                TemplateError::section_not_found(format!("log widgets for the {} group", group.name));
            findings.push(Finding::precondition(&error));
            continue;
        }

        let union: String = members
            .iter()
            .map(|q| q.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let missing: Vec<&str> = markers
            .iter()
            .map(String::as_str)
            .filter(|m| !union.contains(m))
            .collect();
        if missing.is_empty() {
            findings.push(Finding::pass(format!(
                "The {} group ({} queries) covers invocations, tokens and cost",
                group.name,
                members.len()
            )));
        } else {
            findings.push(
                Finding::fail(format!(
                    "The {} group is missing: {}",
                    group.name,
                    missing.join(", ")
                ))
                .with_location(
                    members
                        .iter()
                        .map(|q| q.location.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            );
        }
    }
    Ok(findings)
}

pub(crate) fn unknown_usage(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let queries = ctx.queries()?;
    let unattributed: Vec<&LogQuery> = queries
        .iter()
        .filter(|q| UNKNOWN_MARKERS.iter().any(|m| q.title_contains_ci(m)))
        .collect();
    if unattributed.is_empty() {
        return Err(Finding::precondition(&TemplateError::section_not_found(
            "log widget for unattributed usage",
        )));
    }

    let mut findings = Vec::new();
    for query in &unattributed {
        let fail = |message: String| Finding::fail(message).with_location(query.location.clone());
        for field in &ctx.config.identity_fields {
            if !query.references_identity(field) {
                findings.push(fail(format!(
                    "Unattributed usage query does not reference the {} field",
                    field.label
                )));
            }
        }
        if !FALLBACK_MARKERS.iter().any(|m| query.contains_ci(m)) {
            findings.push(fail(
                "Unattributed usage query needs a coalesce() or ispresent() fallback".to_string(),
            ));
        }
        if !PERCENT_MARKERS.iter().any(|m| query.text.contains(m)) {
            findings.push(fail(
                "Unattributed usage query does not compute a percentage".to_string(),
            ));
        }
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "{} unattributed usage queries fall back and compute percentages",
            unattributed.len()
        )));
    }
    Ok(findings)
}
