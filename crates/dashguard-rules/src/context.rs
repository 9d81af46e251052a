//! Extracted data shared by every rule.

use dashguard_core::iam::policy_statements;
use dashguard_core::{
    CheckConfig, Dashboard, LogQuery, Parameter, PolicyStatement, Resource, Template,
    TemplateError,
};

use crate::finding::Finding;

/// Everything a rule may look at, extracted once per run.
///
/// Extraction failures are kept as values so each rule can report its own
/// precondition failure while independent rules still run.
pub struct RuleContext<'a> {
    pub template: &'a Template,
    pub config: &'a CheckConfig,
    parameters: Result<Vec<Parameter>, TemplateError>,
    resources: Result<Vec<Resource>, TemplateError>,
    dashboard: Result<Dashboard, TemplateError>,
    statements: Result<Vec<PolicyStatement>, TemplateError>,
}

impl<'a> RuleContext<'a> {
    pub fn new(template: &'a Template, config: &'a CheckConfig) -> Self {
        Self {
            parameters: template.parameters(),
            resources: template.resources(),
            dashboard: Dashboard::extract(template, &config.substitution_table()),
            statements: policy_statements(template),
            template,
            config,
        }
    }

    pub fn parameters(&self) -> Result<&[Parameter], Finding> {
        self.parameters.as_deref().map_err(Finding::precondition)
    }

    pub fn resources(&self) -> Result<&[Resource], Finding> {
        self.resources.as_deref().map_err(Finding::precondition)
    }

    pub fn dashboard(&self) -> Result<&Dashboard, Finding> {
        self.dashboard.as_ref().map_err(Finding::precondition)
    }

    pub fn statements(&self) -> Result<&[PolicyStatement], Finding> {
        self.statements.as_deref().map_err(Finding::precondition)
    }

    pub fn queries(&self) -> Result<Vec<LogQuery>, Finding> {
        self.dashboard().map(LogQuery::from_dashboard)
    }

    pub fn resource(&self, name: &str) -> Result<Option<&Resource>, Finding> {
        Ok(self.resources()?.iter().find(|r| r.name == name))
    }

    pub fn resources_of_type<'s>(
        &'s self,
        resource_type: &'s str,
    ) -> Result<impl Iterator<Item = &'s Resource> + 's, Finding> {
        Ok(self
            .resources()?
            .iter()
            .filter(move |r| r.is_type(resource_type)))
    }

    /// True when any resource has this type; falls back to a text search in
    /// text-only mode.
    pub fn declares_type(&self, resource_type: &str) -> bool {
        match &self.resources {
            Ok(resources) => resources.iter().any(|r| r.is_type(resource_type)),
            Err(_) => self.template.source().contains(resource_type),
        }
    }

    /// True when a resource with this logical name exists; text search in text-only mode.
    pub fn declares_resource(&self, name: &str) -> bool {
        match &self.resources {
            Ok(resources) => resources.iter().any(|r| r.name == name),
            Err(_) => self.template.source().contains(name),
        }
    }

    pub fn source_contains(&self, needle: &str) -> bool {
        self.template.source().contains(needle)
    }
}
