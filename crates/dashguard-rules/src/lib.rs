//! Dashguard conformance rules
//!
//! Every rule is a pure function over a [`RuleContext`] built once from a parsed
//! [`Template`]. A rule whose target section or resource cannot be read reports a
//! precondition failure; the other rules still run. Findings are collected into a
//! [`Report`] whose order and verdict do not depend on rule execution order.

pub mod context;
pub mod finding;
pub mod report;
pub mod rule;

mod rules;

pub use context::RuleContext;
pub use finding::{Finding, FindingKind, Outcome};
pub use report::{Report, Status};
pub use rule::{Family, Rule, RuleSet};

use dashguard_core::{CheckConfig, Template};

/// Runs the standard rule set against `template`.
pub fn check(template: &Template, config: &CheckConfig) -> Report {
    let ctx = RuleContext::new(template, config);
    RuleSet::standard().run(&ctx)
}
