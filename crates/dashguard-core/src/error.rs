//! Error types for template loading and extraction.

use crate::config::ConfigError;

/// Errors raised while reading a template or pulling structure out of it.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("section not found: {section}")]
    SectionNotFound { section: String },

    #[error("template could not be parsed as YAML: {0}")]
    Unparsed(String),

    #[error("invalid dashboard body: {0}")]
    InvalidDashboard(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TemplateError {
    pub fn section_not_found(section: impl Into<String>) -> Self {
        Self::SectionNotFound {
            section: section.into(),
        }
    }

    /// True when the error means the target of a check is absent rather than malformed.
    pub fn is_missing_section(&self) -> bool {
        matches!(self, Self::SectionNotFound { .. })
    }
}
