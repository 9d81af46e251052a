//! Widget region and model-dimension checks.

use crate::context::RuleContext;
use crate::finding::Finding;

pub(crate) fn region_consistency(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let dashboard = ctx.dashboard()?;
    let expected = &ctx.config.monitoring_region;
    let mut findings = Vec::new();
    let mut checked = 0usize;

    for widget in &dashboard.widgets {
        if let Some(region) = &widget.region {
            checked += 1;
            if region != expected {
                findings.push(
                    Finding::fail(format!("Widget region '{region}' differs from '{expected}'"))
                        .with_location(widget.location()),
                );
            }
        }
        for spec in widget.metric_specs() {
            let Some(region) = &spec.region else { continue };
            checked += 1;
            if region != expected {
                findings.push(
                    Finding::fail(format!(
                        "Metric {}/{} overrides region to '{region}', expected '{expected}'",
                        spec.namespace, spec.name
                    ))
                    .with_location(widget.location()),
                );
            }
        }
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "All {checked} region settings use {expected}"
        )));
    }
    Ok(findings)
}

pub(crate) fn model_dimension(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, Finding> {
    let dashboard = ctx.dashboard()?;
    let config = ctx.config;
    let mut findings = Vec::new();
    let mut checked = 0usize;

    for widget in dashboard.metric_widgets() {
        for spec in widget
            .metric_specs()
            .filter(|s| s.namespace == config.monitored_namespace)
        {
            checked += 1;
            match spec.dimension(&config.model_dimension) {
                Some(value) if value == config.model_id => {}
                Some(value) => findings.push(
                    Finding::fail(format!(
                        "Metric {} has {}={value}, expected {}",
                        spec.name, config.model_dimension, config.model_id
                    ))
                    .with_location(widget.location()),
                ),
                None => findings.push(
                    Finding::fail(format!(
                        "Metric {} is missing the {} dimension",
                        spec.name, config.model_dimension
                    ))
                    .with_location(widget.location()),
                ),
            }
        }
    }

    if findings.is_empty() {
        findings.push(Finding::pass(format!(
            "All {checked} {} metrics carry {}={}",
            config.monitored_namespace, config.model_dimension, config.model_id
        )));
    }
    Ok(findings)
}
