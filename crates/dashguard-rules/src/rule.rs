//! Rule registry.

use std::fmt;

use serde::Serialize;

use crate::context::RuleContext;
use crate::finding::Finding;
use crate::report::Report;
use crate::rules;

/// A check returns its findings, or a single precondition finding when its target
/// is unavailable.
pub type CheckFn = fn(&RuleContext<'_>) -> Result<Vec<Finding>, Finding>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    Structure,
    TopicPolicy,
    Hygiene,
    Production,
    Parameters,
    Dashboard,
    UpdateSafety,
    LeastPrivilege,
    AlarmWiring,
    LogQueries,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Structure => "structure",
            Family::TopicPolicy => "topic-policy",
            Family::Hygiene => "hygiene",
            Family::Production => "production",
            Family::Parameters => "parameters",
            Family::Dashboard => "dashboard",
            Family::UpdateSafety => "update-safety",
            Family::LeastPrivilege => "least-privilege",
            Family::AlarmWiring => "alarm-wiring",
            Family::LogQueries => "log-queries",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub family: Family,
    pub description: &'static str,
    check: CheckFn,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("family", &self.family)
            .finish()
    }
}

impl Rule {
    pub const fn new(
        id: &'static str,
        family: Family,
        description: &'static str,
        check: CheckFn,
    ) -> Self {
        Self {
            id,
            family,
            description,
            check,
        }
    }

    /// Runs the check and stamps every finding with this rule's id.
    pub fn run(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let findings = match (self.check)(ctx) {
            Ok(findings) => findings,
            Err(precondition) => vec![precondition],
        };
        findings
            .into_iter()
            .map(|mut f| {
                f.rule = self.id;
                f
            })
            .collect()
    }
}

/// An ordered collection of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Every rule, static linter families first.
    pub fn standard() -> Self {
        Self::new(rules::all())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn run(&self, ctx: &RuleContext<'_>) -> Report {
        let mut report = Report::new();
        for rule in &self.rules {
            let findings = rule.run(ctx);
            tracing::debug!(
                rule = rule.id,
                family = %rule.family,
                findings = findings.len(),
                "rule evaluated"
            );
            report.extend(findings);
        }
        report.sort();
        report
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}
