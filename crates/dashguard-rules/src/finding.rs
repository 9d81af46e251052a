//! Rule outcomes.

use std::fmt;

use dashguard_core::TemplateError;
use serde::Serialize;

/// Three-valued rule outcome. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Warn => write!(f, "WARN"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// Why a finding was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// A found value violates a rule.
    Assertion,
    /// The rule's target could not be found or read at all.
    Precondition,
    /// An optional but recommended item is missing.
    Advisory,
    /// Informational; never affects the verdict.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Id of the rule that produced the finding. Stamped by the rule set.
    pub rule: &'static str,
    pub outcome: Outcome,
    pub kind: FindingKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Finding {
    fn new(outcome: Outcome, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            rule: "",
            outcome,
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(Outcome::Pass, FindingKind::Info, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(Outcome::Fail, FindingKind::Assertion, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Outcome::Warn, FindingKind::Advisory, message)
    }

    /// A failed precondition: the rule's target section or resource is unavailable.
    pub fn precondition(error: &TemplateError) -> Self {
        Self::new(
            Outcome::Fail,
            FindingKind::Precondition,
            format!("precondition failed: {error}"),
        )
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.outcome == Outcome::Fail
    }

    pub fn is_warning(&self) -> bool {
        self.outcome == Outcome::Warn
    }

    pub fn is_precondition(&self) -> bool {
        self.kind == FindingKind::Precondition
    }
}
