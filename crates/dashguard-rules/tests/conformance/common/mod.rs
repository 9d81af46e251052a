//! Shared fixtures and template mutation helpers.

#![allow(dead_code)]

use dashguard_core::{CheckConfig, Template};
use dashguard_rules::{Finding, Report};

pub const REFERENCE: &str = include_str!("../../../../../templates/nova-pro-dashboard-template.yaml");

pub const OPTIONAL_PARAMETERS: [&str; 12] = [
    "ModelId",
    "DashboardName",
    "ErrorRateThreshold",
    "P99LatencyThreshold",
    "DailyCostThreshold",
    "ThrottleRateThreshold",
    "AlarmEmail",
    "UserIdField",
    "ApplicationIdField",
    "EnvironmentTag",
    "OwnerTag",
    "CostCenterTag",
];

// =============================================================================
// CHECK HELPERS
// =============================================================================

pub fn check(source: &str) -> Report {
    let template = Template::parse(source);
    dashguard_rules::check(&template, &CheckConfig::default())
}

pub fn errors_for<'r>(report: &'r Report, rule: &str) -> Vec<&'r Finding> {
    report
        .for_rule(rule)
        .into_iter()
        .filter(|f| f.is_error())
        .collect()
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Drops a top-level section: its key line and every indented line below it.
pub fn without_section(source: &str, section: &str) -> String {
    let marker = format!("{section}:");
    let mut skipping = false;
    let mut out = String::new();
    for line in source.lines() {
        let top_level = !line.is_empty() && !line.starts_with(' ') && !line.starts_with('#');
        if top_level {
            skipping = line.starts_with(&marker);
        }
        if !skipping {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Removes the first line containing `needle` that follows the line `anchor`.
pub fn remove_line_after(source: &str, anchor: &str, needle: &str) -> String {
    let mut seen_anchor = false;
    let mut removed = false;
    let mut out = String::new();
    for line in source.lines() {
        if !removed && seen_anchor && line.contains(needle) {
            removed = true;
            continue;
        }
        if line == anchor {
            seen_anchor = true;
        }
        out.push_str(line);
        out.push('\n');
    }
    assert!(removed, "no line containing {needle:?} after {anchor:?}");
    out
}

pub fn parameter_anchor(name: &str) -> String {
    format!("  {name}:")
}
