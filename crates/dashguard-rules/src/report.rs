//! Static report builder.

use std::cmp::Reverse;
use std::fmt::Write as _;

use serde::Serialize;

use crate::finding::{Finding, Outcome};

/// Overall verdict of a static run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    PassedWithWarnings,
    Failed,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Failed => 1,
            Status::Passed | Status::PassedWithWarnings => 0,
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Status::Passed => "✅ VALIDATION PASSED - Template is production ready",
            Status::PassedWithWarnings => {
                "⚠️  VALIDATION PASSED WITH WARNINGS - Review before deployment"
            }
            Status::Failed => "❌ VALIDATION FAILED - Fix errors before deployment",
        }
    }
}

/// Findings from one run, bucketed by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub findings: Vec<Finding>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: Status,
    exit_code: i32,
    errors: Vec<&'a Finding>,
    warnings: Vec<&'a Finding>,
    passed: Vec<&'a Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// Orders by severity, then rule id; insertion order breaks remaining ties.
    pub fn sort(&mut self) {
        self.findings
            .sort_by_key(|f| (Reverse(f.outcome), f.rule));
    }

    fn bucket(&self, outcome: Outcome) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.outcome == outcome).collect()
    }

    pub fn errors(&self) -> Vec<&Finding> {
        self.bucket(Outcome::Fail)
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.bucket(Outcome::Warn)
    }

    pub fn passed(&self) -> Vec<&Finding> {
        self.bucket(Outcome::Pass)
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_warning()).count()
    }

    pub fn status(&self) -> Status {
        if self.has_errors() {
            Status::Failed
        } else if self.warning_count() > 0 {
            Status::PassedWithWarnings
        } else {
            Status::Passed
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.status().exit_code()
    }

    /// Findings produced by one rule, in report order.
    pub fn for_rule(&self, rule: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule == rule).collect()
    }

    /// Human-readable report.
    pub fn render(&self, title: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "🔍 {title}");
        let _ = writeln!(out, "{}", "═".repeat(50));
        let _ = writeln!(out, "\n📊 Validation Results:");
        let _ = writeln!(out, "{}", "─".repeat(30));

        let sections = [
            ("❌ ERRORS", self.errors()),
            ("⚠️  WARNINGS", self.warnings()),
            ("✅ PASSED CHECKS", self.passed()),
        ];
        for (heading, findings) in sections {
            if findings.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{heading} ({}):", findings.len());
            for finding in findings {
                let _ = writeln!(out, "   {}", format_finding(finding));
            }
        }

        let _ = writeln!(out, "\n{}", "═".repeat(50));
        let _ = writeln!(
            out,
            "Summary: {} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        );
        let _ = writeln!(out, "{}", self.status().verdict());
        out
    }

    pub fn print_summary(&self, title: &str) {
        print!("{}", self.render(title));
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport {
            status: self.status(),
            exit_code: self.exit_code(),
            errors: self.errors(),
            warnings: self.warnings(),
            passed: self.passed(),
        })
    }
}

fn format_finding(finding: &Finding) -> String {
    let icon = match finding.outcome {
        Outcome::Fail => "✗",
        Outcome::Warn => "⚠",
        Outcome::Pass => "✓",
    };
    let marker = if finding.is_precondition() {
        " (precondition)"
    } else {
        ""
    };
    let location = finding
        .location
        .as_ref()
        .map(|l| format!(" [{l}]"))
        .unwrap_or_default();
    format!(
        "{icon} [{}]{marker}{location}: {}",
        finding.rule, finding.message
    )
}
