//! Parameter default completeness.

use dashguard_core::{Node, Parameter, TemplateError};

use crate::context::RuleContext;
use crate::finding::Finding;

fn location(name: &str) -> String {
    format!("Parameters.{name}")
}

pub(crate) fn parameter_defaults(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let parameters = ctx.parameters()?;
    let required = &ctx.config.required_parameter;

    let missing: Vec<Finding> = parameters
        .iter()
        .filter(|p| &p.name != required && !p.has_default())
        .map(|p| {
            Finding::fail(format!("Parameter {} has no default value", p.name))
                .with_location(location(&p.name))
        })
        .collect();

    if missing.is_empty() {
        let with_defaults = parameters.iter().filter(|p| &p.name != required).count();
        return Ok(vec![Finding::pass(format!(
            "All {with_defaults} optional parameters have defaults"
        ))]);
    }
    Ok(missing)
}

pub(crate) fn required_parameter(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let parameters = ctx.parameters()?;
    let find = |name: &str| parameters.iter().find(|p| p.name == name);
    let mut findings = Vec::new();

    let required = &ctx.config.required_parameter;
    match find(required) {
        None => {
            return Err(
                Finding::precondition(&TemplateError::section_not_found(location(required)))
                    .with_location(location(required)),
            );
        }
        Some(p) if p.has_default() => findings.push(
            Finding::fail(format!(
                "Required parameter {required} must not have a default"
            ))
            .with_location(location(required)),
        ),
        Some(_) => findings.push(Finding::pass(format!(
            "Required parameter {required} has no default"
        ))),
    }

    for (name, expected) in &ctx.config.expected_defaults {
        findings.push(expected_default(find(name), name, expected));
    }

    for name in &ctx.config.threshold_parameters {
        let finding = match find(name) {
            None => Finding::fail(format!("Threshold parameter {name} is not declared")),
            Some(Parameter {
                default: Some(Node::Number(value)),
                ..
            }) => Finding::pass(format!("Threshold {name} defaults to {value}")),
            Some(_) => Finding::fail(format!("Threshold parameter {name} needs a numeric default")),
        };
        findings.push(finding.with_location(location(name)));
    }
    Ok(findings)
}

fn expected_default(parameter: Option<&Parameter>, name: &str, expected: &str) -> Finding {
    let finding = match parameter.map(Parameter::default_text) {
        None => Finding::fail(format!("Parameter {name} is not declared")),
        Some(Some(actual)) if actual == expected => {
            Finding::pass(format!("Parameter {name} defaults to '{expected}'"))
        }
        Some(Some(actual)) => Finding::fail(format!(
            "Parameter {name} defaults to '{actual}', expected '{expected}'"
        )),
        Some(None) => Finding::fail(format!(
            "Parameter {name} has no default, expected '{expected}'"
        )),
    };
    finding.with_location(location(name))
}
