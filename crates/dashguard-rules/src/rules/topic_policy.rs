//! Topic-policy action validity.
//!
//! These checks run over the raw text so they also work in text-only mode: any
//! `sns:` action anywhere in the document is judged, whatever surrounds it.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::context::RuleContext;
use crate::finding::Finding;

static TOPIC_ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sns:(\w+)").expect("topic action pattern"));

static WILDCARD_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r#"Action:\s*["']?\*["']?"#)
        .case_insensitive(true)
        .build()
        .expect("wildcard action pattern")
});

pub(crate) fn topic_policy_actions(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let source = ctx.template.source();
    let mut findings = Vec::new();

    let actions: BTreeSet<&str> = TOPIC_ACTION
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let invalid: Vec<&str> = actions
        .iter()
        .copied()
        .filter(|action| !ctx.config.allowed_topic_actions.iter().any(|a| a == action))
        .collect();

    if invalid.is_empty() {
        let listed = actions
            .iter()
            .map(|a| format!("sns:{a}"))
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(Finding::pass(format!("All SNS actions are valid: [{listed}]")));
    } else {
        for action in invalid {
            findings.push(Finding::fail(format!("Invalid SNS action found: sns:{action}")));
        }
    }

    if WILDCARD_ACTION.is_match(source) {
        findings.push(Finding::fail(
            "Wildcard action (*) not allowed in SNS policies",
        ));
    }

    let lower = source.to_lowercase();
    for denied in &ctx.config.denied_topic_actions {
        if lower.contains(&denied.to_lowercase()) {
            findings.push(Finding::fail(format!(
                "{denied} is not a valid SNS topic policy action"
            )));
        }
    }

    Ok(findings)
}
