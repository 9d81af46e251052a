//! Stack update safety: critical resources survive deletes and replacements.

use dashguard_core::{Node, Resource};

use crate::context::RuleContext;
use crate::finding::Finding;

fn location(resource: &Resource) -> String {
    format!("Resources.{}", resource.name)
}

pub(crate) fn update_safety(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let resources = ctx.resources()?;
    let config = ctx.config;
    let mut findings = Vec::new();

    for name in &config.critical_resources {
        let Some(resource) = resources.iter().find(|r| &r.name == name) else {
            findings.push(
                Finding::fail(format!("Critical resource {name} is not declared"))
                    .with_location(format!("Resources.{name}")),
            );
            continue;
        };
        if !resource.retains_on_delete() {
            findings.push(
                Finding::fail(format!("{name} must set DeletionPolicy: Retain"))
                    .with_location(location(resource)),
            );
        }
        if !resource.retains_on_replace() {
            findings.push(
                Finding::fail(format!("{name} must set UpdateReplacePolicy: Retain"))
                    .with_location(location(resource)),
            );
        }
    }

    for resource in resources {
        if !config.update_safe_types.iter().any(|t| resource.is_type(t)) {
            findings.push(
                Finding::fail(format!(
                    "Resource type '{}' is outside the update-safe set",
                    resource.resource_type
                ))
                .with_location(location(resource)),
            );
        }
        let Some(property) = config.name_properties.get(&resource.resource_type) else {
            continue;
        };
        if let Some(Node::String(literal)) = resource.property(property) {
            findings.push(
                Finding::fail(format!(
                    "{property} is the literal '{literal}'; derive it from a parameter so updates do not collide"
                ))
                .with_location(format!("{}.Properties.{property}", location(resource))),
            );
        }
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "All {} critical resources are retained and dynamically named",
            config.critical_resources.len()
        )));
    }
    Ok(findings)
}
