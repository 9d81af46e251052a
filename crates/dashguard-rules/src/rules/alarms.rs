//! Alarm notification wiring.

use dashguard_core::{Node, Resource};

use crate::context::RuleContext;
use crate::finding::Finding;

pub(crate) const ALARM_TYPE: &str = "AWS::CloudWatch::Alarm";
const TOPIC_TYPE: &str = "AWS::SNS::Topic";
const SUBSCRIPTION_TYPE: &str = "AWS::SNS::Subscription";

/// True when `node` holds a `Ref` or `GetAtt` to the named resource.
fn references(node: &Node, name: &str) -> bool {
    match node {
        Node::Intrinsic { function, argument } => {
            let direct = match function.as_str() {
                "Ref" => argument.as_str() == Some(name),
                "GetAtt" => argument.render().split('.').next() == Some(name)
                    || argument.items().first().and_then(|n| n.as_str()) == Some(name),
                _ => false,
            };
            direct || references(argument, name)
        }
        Node::Sequence(items) => items.iter().any(|n| references(n, name)),
        Node::Mapping(entries) => entries.iter().any(|(_, n)| references(n, name)),
        _ => false,
    }
}

fn check_alarm(alarm: &Resource, topic: &str) -> Option<String> {
    let Some(actions) = alarm.property("AlarmActions") else {
        return Some(format!("Alarm {} has no AlarmActions", alarm.name));
    };
    if actions.is_null() || actions.as_sequence().is_some_and(<[Node]>::is_empty) {
        return Some(format!("Alarm {} has an empty AlarmActions list", alarm.name));
    }
    if !actions.contains_intrinsic("If") {
        return Some(format!(
            "Alarm {} AlarmActions is not conditional on the notification condition",
            alarm.name
        ));
    }
    if !references(actions, topic) {
        return Some(format!(
            "Alarm {} AlarmActions does not reference {topic}",
            alarm.name
        ));
    }
    None
}

pub(crate) fn alarm_wiring(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let config = ctx.config;
    let mut findings = Vec::new();

    for name in &config.expected_alarms {
        match ctx.resource(name)? {
            Some(resource) if resource.is_type(ALARM_TYPE) => {}
            Some(resource) => findings.push(
                Finding::fail(format!(
                    "{name} has type '{}', expected {ALARM_TYPE}",
                    resource.resource_type
                ))
                .with_location(format!("Resources.{name}")),
            ),
            None => findings.push(
                Finding::fail(format!("Expected alarm {name} is not declared"))
                    .with_location(format!("Resources.{name}")),
            ),
        }
    }

    let mut alarms = 0usize;
    for alarm in ctx.resources_of_type(ALARM_TYPE)? {
        alarms += 1;
        if let Some(message) = check_alarm(alarm, &config.topic_resource) {
            findings.push(
                Finding::fail(message).with_location(format!("Resources.{}.Properties", alarm.name)),
            );
        }
    }

    for (name, expected) in [
        (&config.topic_resource, TOPIC_TYPE),
        (&config.subscription_resource, SUBSCRIPTION_TYPE),
    ] {
        let finding = match ctx.resource(name)? {
            Some(resource) if resource.is_type(expected) => continue,
            Some(resource) => Finding::fail(format!(
                "{name} has type '{}', expected {expected}",
                resource.resource_type
            )),
            None => Finding::fail(format!("{name} ({expected}) is not declared")),
        };
        findings.push(finding.with_location(format!("Resources.{name}")));
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "All {alarms} alarms notify {} through a conditional action list",
            config.topic_resource
        )));
    }
    Ok(findings)
}
