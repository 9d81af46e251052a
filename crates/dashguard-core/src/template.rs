//! Template document model.
//!
//! A [`Template`] always keeps the raw text. When the text is valid YAML it also
//! carries the typed [`Node`] tree; otherwise it runs in text-only mode, where
//! text checks still work and tree lookups report [`TemplateError::Unparsed`].

use std::fs;
use std::path::Path;

use crate::error::TemplateError;
use crate::node::{EMPTY_MAPPING, Node};

/// The five top-level sections every template declares.
pub const REQUIRED_SECTIONS: [&str; 5] = [
    "AWSTemplateFormatVersion",
    "Description",
    "Parameters",
    "Resources",
    "Outputs",
];

#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    root: Option<Node>,
    parse_error: Option<String>,
}

/// A declared template parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: Option<String>,
    /// `None` when the `Default` key is absent, `Some(Node::Null)` for `Default: ~`.
    pub default: Option<Node>,
    pub description: Option<String>,
    pub allowed_values: Vec<String>,
}

impl Parameter {
    /// True when a `Default` key is present with a non-null value.
    /// An empty string is a real default.
    pub fn has_default(&self) -> bool {
        self.default.as_ref().is_some_and(|d| !d.is_null())
    }

    pub fn default_text(&self) -> Option<String> {
        self.default
            .as_ref()
            .filter(|d| !d.is_null())
            .map(Node::render)
    }
}

/// A declared resource with its update/delete attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    /// Empty when the resource has no `Type`.
    pub resource_type: String,
    pub deletion_policy: Option<String>,
    pub update_replace_policy: Option<String>,
    pub condition: Option<String>,
    pub properties: Node,
}

impl Resource {
    pub fn property(&self, key: &str) -> Option<&Node> {
        self.properties.get(key)
    }

    pub fn is_type(&self, resource_type: &str) -> bool {
        self.resource_type == resource_type
    }

    pub fn retains_on_delete(&self) -> bool {
        self.deletion_policy.as_deref() == Some("Retain")
    }

    pub fn retains_on_replace(&self) -> bool {
        self.update_replace_policy.as_deref() == Some("Retain")
    }
}

impl Template {
    /// Builds a template from text. Never fails; a YAML error switches to text-only mode.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        match serde_yaml::from_str::<serde_yaml::Value>(&source) {
            Ok(value) => Self {
                root: Some(Node::from(value)),
                parse_error: None,
                source,
            },
            Err(e) => {
                tracing::warn!(error = %e, "template is not valid YAML, running text-only checks");
                Self {
                    root: None,
                    parse_error: Some(e.to_string()),
                    source,
                }
            }
        }
    }

    /// Reads and parses a template file. Only an unreadable file is an error here.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn size_bytes(&self) -> usize {
        self.source.len()
    }

    pub fn is_text_only(&self) -> bool {
        self.root.is_none()
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    pub fn root(&self) -> Result<&Node, TemplateError> {
        match &self.root {
            Some(root) => Ok(root),
            None => Err(TemplateError::Unparsed(
                self.parse_error.clone().unwrap_or_default(),
            )),
        }
    }

    /// Returns a top-level section, or `SectionNotFound`.
    ///
    /// In text-only mode there is no tree to hand out, so a section whose marker line
    /// exists is reported as `Unparsed` and a missing one as `SectionNotFound`.
    pub fn section(&self, name: &str) -> Result<&Node, TemplateError> {
        match &self.root {
            Some(root) => root
                .get(name)
                .ok_or_else(|| TemplateError::section_not_found(name)),
            None if self.has_section_marker(name) => Err(TemplateError::Unparsed(
                self.parse_error.clone().unwrap_or_default(),
            )),
            None => Err(TemplateError::section_not_found(name)),
        }
    }

    /// Like [`Template::section`] but yields an empty mapping for anything missing.
    pub fn section_or_empty(&self, name: &str) -> &Node {
        self.section(name).unwrap_or(&EMPTY_MAPPING)
    }

    /// Checks that a section exists, in either mode.
    pub fn require_section(&self, name: &str) -> Result<(), TemplateError> {
        let present = match &self.root {
            Some(root) => root.get(name).is_some(),
            None => self.has_section_marker(name),
        };
        if present {
            Ok(())
        } else {
            Err(TemplateError::section_not_found(name))
        }
    }

    fn has_section_marker(&self, name: &str) -> bool {
        self.source.lines().any(|line| {
            line.strip_prefix(name)
                .is_some_and(|rest| rest.trim_start().starts_with(':'))
        })
    }

    pub fn parameters(&self) -> Result<Vec<Parameter>, TemplateError> {
        let section = self.section("Parameters")?;
        Ok(section
            .as_mapping()
            .unwrap_or_default()
            .iter()
            .map(|(name, body)| Parameter {
                name: name.clone(),
                param_type: body.get("Type").map(Node::render),
                default: body.get("Default").cloned(),
                description: body.get("Description").map(Node::render),
                allowed_values: body
                    .get("AllowedValues")
                    .map(|v| v.items().into_iter().map(Node::render).collect())
                    .unwrap_or_default(),
            })
            .collect())
    }

    pub fn resources(&self) -> Result<Vec<Resource>, TemplateError> {
        let section = self.section("Resources")?;
        Ok(section
            .as_mapping()
            .unwrap_or_default()
            .iter()
            .map(|(name, body)| Resource {
                name: name.clone(),
                resource_type: body.get("Type").map(Node::render).unwrap_or_default(),
                deletion_policy: body.get("DeletionPolicy").map(Node::render),
                update_replace_policy: body.get("UpdateReplacePolicy").map(Node::render),
                condition: body.get("Condition").map(Node::render),
                properties: body.get("Properties").cloned().unwrap_or(Node::Null),
            })
            .collect())
    }

    pub fn resource(&self, name: &str) -> Result<Resource, TemplateError> {
        self.resources()?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| TemplateError::section_not_found(format!("Resources.{name}")))
    }

    /// Names of the top-level `Outputs` entries, in declaration order.
    pub fn output_names(&self) -> Result<Vec<String>, TemplateError> {
        let section = self.section("Outputs")?;
        Ok(section
            .as_mapping()
            .unwrap_or_default()
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }
}
