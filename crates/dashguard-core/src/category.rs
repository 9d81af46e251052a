//! Widget categories for the widget verifier.
//!
//! Classification is by keyword match against the widget title. Categories form a
//! total order and the first category (in that order) with a matching keyword wins:
//!
//! 1. Usage Overview: `invocation`, `tpm`, `requests`
//! 2. Cost Tracking: `cost`, `cache`
//! 3. Performance Metrics: `latency`, `performance`
//! 4. Error Monitoring: `error`, `success`, `failed`
//! 5. Invocation Patterns: `token`, `concurrent`
//! 6. Guardrails: `guardrail`, `intervention`
//!
//! The derived `Ord` follows declaration order, which is the precedence order.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WidgetCategory {
    UsageOverview,
    CostTracking,
    PerformanceMetrics,
    ErrorMonitoring,
    InvocationPatterns,
    Guardrails,
}

impl WidgetCategory {
    /// All categories in precedence order.
    pub const ALL: [WidgetCategory; 6] = [
        Self::UsageOverview,
        Self::CostTracking,
        Self::PerformanceMetrics,
        Self::ErrorMonitoring,
        Self::InvocationPatterns,
        Self::Guardrails,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::UsageOverview => &["invocation", "tpm", "requests"],
            Self::CostTracking => &["cost", "cache"],
            Self::PerformanceMetrics => &["latency", "performance"],
            Self::ErrorMonitoring => &["error", "success", "failed"],
            Self::InvocationPatterns => &["token", "concurrent"],
            Self::Guardrails => &["guardrail", "intervention"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UsageOverview => "Usage Overview",
            Self::CostTracking => "Cost Tracking",
            Self::PerformanceMetrics => "Performance Metrics",
            Self::ErrorMonitoring => "Error Monitoring",
            Self::InvocationPatterns => "Invocation Patterns",
            Self::Guardrails => "Guardrails",
        }
    }

    /// First category in precedence order whose keyword occurs in `title`.
    pub fn classify(title: &str) -> Option<Self> {
        let lower = title.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.keywords().iter().any(|k| lower.contains(k)))
    }
}

impl fmt::Display for WidgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category widget counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub counts: BTreeMap<WidgetCategory, usize>,
    pub uncategorized: usize,
}

impl CategoryTally {
    pub fn from_titles<'a>(titles: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tally = Self::default();
        for title in titles {
            match WidgetCategory::classify(title) {
                Some(category) => *tally.counts.entry(category).or_default() += 1,
                None => tally.uncategorized += 1,
            }
        }
        tally
    }

    pub fn count(&self, category: WidgetCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum::<usize>() + self.uncategorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_precedence_order() {
        let mut sorted = WidgetCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, WidgetCategory::ALL);
    }

    #[test]
    fn test_first_match_wins() {
        // "invocation" (usage) precedes "cost".
        assert_eq!(
            WidgetCategory::classify("Invocation Cost"),
            Some(WidgetCategory::UsageOverview)
        );
        // "cost" precedes "token".
        assert_eq!(
            WidgetCategory::classify("Token Cost (USD)"),
            Some(WidgetCategory::CostTracking)
        );
        assert_eq!(
            WidgetCategory::classify("Token Counts"),
            Some(WidgetCategory::InvocationPatterns)
        );
        assert_eq!(
            WidgetCategory::classify("Guardrail Interventions"),
            Some(WidgetCategory::Guardrails)
        );
        assert_eq!(WidgetCategory::classify("Misc"), None);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(
            WidgetCategory::classify("P99 LATENCY"),
            Some(WidgetCategory::PerformanceMetrics)
        );
    }

    #[test]
    fn test_tally() {
        let tally =
            CategoryTally::from_titles(["Model Invocations", "Error Rate (%)", "Other", "TPM"]);
        assert_eq!(tally.count(WidgetCategory::UsageOverview), 2);
        assert_eq!(tally.count(WidgetCategory::ErrorMonitoring), 1);
        assert_eq!(tally.count(WidgetCategory::Guardrails), 0);
        assert_eq!(tally.uncategorized, 1);
        assert_eq!(tally.total(), 4);
    }
}
