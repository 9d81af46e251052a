//! Least-privilege checks over every IAM statement the template declares.
//!
//! Only `Allow` statements are judged. A statement may raise several findings;
//! each one names the statement by policy, index and `Sid`.

use dashguard_core::{PolicyStatement, TemplateError};

use crate::context::RuleContext;
use crate::finding::Finding;

/// Verb prefixes that mark an action as mutating.
pub(crate) const MUTATING_VERBS: [&str; 12] = [
    "create", "delete", "update", "put", "post", "modify", "change", "set", "add", "remove",
    "attach", "detach",
];

const NAMESPACE_CONDITION: &str = "cloudwatch:namespace";

/// True when the action's verb starts with a mutating verb, or is a wildcard.
pub(crate) fn is_mutating(action: &str) -> bool {
    let verb = verb(action);
    if !verb.is_empty() && verb.chars().all(|c| c == '*') {
        return true;
    }
    let verb = verb.to_ascii_lowercase();
    MUTATING_VERBS.iter().any(|m| verb.starts_with(m))
}

fn verb(action: &str) -> &str {
    action.split_once(':').map_or(action, |(_, verb)| verb)
}

pub(crate) fn least_privilege(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let statements = ctx.statements()?;
    if statements.is_empty() && !ctx.declares_resource(&ctx.config.viewer_policy) {
        let error = TemplateError::section_not_found(format!(
            "Resources.{}",
            ctx.config.viewer_policy
        ));
        return Err(Finding::precondition(&error));
    }

    let mut findings = Vec::new();
    let allowed: Vec<&PolicyStatement> = statements.iter().filter(|s| s.is_allow()).collect();
    for statement in &allowed {
        findings.extend(check_statement(ctx, statement));
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "All {} allow statements are read-only and scoped",
            allowed.len()
        )));
    }
    Ok(findings)
}

fn check_statement(ctx: &RuleContext<'_>, statement: &PolicyStatement) -> Vec<Finding> {
    let mut findings = Vec::new();
    let fail = |message: String| Finding::fail(message).with_location(statement.location());

    for action in statement.actions.iter().filter(|a| is_mutating(a)) {
        findings.push(fail(format!("Action {action} is not read-only")));
    }

    let dashboard_actions = statement.uses_service("cloudwatch")
        && statement.actions.iter().any(|a| verb(a).contains("Dashboard"));
    if dashboard_actions
        && !(statement.resource_scoped()
            && statement.resources.iter().any(|r| r.contains(":dashboard/")))
    {
        findings.push(fail(
            "Dashboard actions must be scoped to a dashboard ARN".to_string(),
        ));
    }

    if statement.uses_service("logs") {
        let log_group = &ctx.config.invocation_log_group;
        if !(statement.resource_scoped() && statement.resources.iter().any(|r| r.contains(log_group)))
        {
            findings.push(fail(format!(
                "Logs actions must be scoped to the {log_group} log group"
            )));
        }
    }

    if statement.has_wildcard_resource() {
        let keys = &ctx.config.wildcard_condition_keys;
        if !statement.has_condition {
            findings.push(fail(
                "Wildcard resource requires a condition".to_string(),
            ));
        } else if !keys.is_empty() && !keys.iter().any(|k| statement.has_condition_key(k)) {
            findings.push(fail(format!(
                "Wildcard resource condition must use one of: {}",
                keys.join(", ")
            )));
        }

        let metric_actions = statement.uses_service("cloudwatch")
            && statement.actions.iter().any(|a| verb(a).contains("Metric"));
        if metric_actions && !statement.has_condition_key(NAMESPACE_CONDITION) {
            findings.push(fail(format!(
                "Metric actions on all resources require a {NAMESPACE_CONDITION} condition"
            )));
        }
    }
    findings
}
