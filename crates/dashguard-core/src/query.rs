//! Log Insights queries embedded in log widgets.

use regex::Regex;

use crate::config::IdentityField;
use crate::dashboard::Dashboard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub widget_index: usize,
    pub title: String,
    pub text: String,
    pub location: String,
}

/// How a query obtains an identity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityUse {
    /// The query never touches the attribute.
    Absent,
    /// Every `(?<capture>` sits in a `parse` clause built from `${Parameter}`.
    Parameterised,
    /// The attribute is captured or referenced without the parameter placeholder.
    Hardcoded,
    /// The placeholder appears but nothing is captured under the expected name.
    Uncaptured,
}

impl LogQuery {
    /// All log widgets carrying a query, in dashboard order.
    pub fn from_dashboard(dashboard: &Dashboard) -> Vec<Self> {
        dashboard
            .log_widgets()
            .filter_map(|w| {
                w.query.as_ref().map(|text| Self {
                    widget_index: w.index,
                    title: w.title_or_empty().to_string(),
                    text: text.clone(),
                    location: w.location(),
                })
            })
            .collect()
    }

    pub fn contains_ci(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn title_contains_ci(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn identity_use(&self, field: &IdentityField) -> IdentityUse {
        let marker = format!("(?<{}>", field.capture);
        let placeholder = placeholder(&field.parameter);
        let lower = self.text.to_ascii_lowercase();

        let captures: Vec<usize> = self.text.match_indices(&marker).map(|(i, _)| i).collect();
        if !captures.is_empty() {
            let consistent = captures.iter().all(|&at| {
                let clause_start = lower[..at].rfind("parse").unwrap_or(0);
                self.text[clause_start..at].contains(&placeholder)
            });
            return if consistent {
                IdentityUse::Parameterised
            } else {
                IdentityUse::Hardcoded
            };
        }
        if self.text.contains(&placeholder) {
            return IdentityUse::Uncaptured;
        }
        if mentions_word(&self.text, &field.capture) {
            IdentityUse::Hardcoded
        } else {
            IdentityUse::Absent
        }
    }

    /// True when the query mentions the field through its placeholder or its capture.
    pub fn references_identity(&self, field: &IdentityField) -> bool {
        self.text.contains(&placeholder(&field.parameter)) || mentions_word(&self.text, &field.capture)
    }
}

fn placeholder(parameter: &str) -> String {
    format!("${{{parameter}}}")
}

fn mentions_word(text: &str, word: &str) -> bool {
    match Regex::new(&format!(r"\b{}\b", regex::escape(word))) {
        Ok(re) => re.is_match(text),
        Err(_) => text.contains(word),
    }
}
