//! Rule implementations, one module per family.

mod alarms;
mod dashboard;
mod hygiene;
mod least_privilege;
mod parameters;
mod queries;
mod structure;
mod topic_policy;
mod update_safety;

use crate::rule::{Family, Rule};

/// Registration order is the evaluation order; the report does not depend on it.
pub(crate) fn all() -> Vec<Rule> {
    vec![
        Rule::new(
            "required-sections",
            Family::Structure,
            "All five top-level sections are present",
            structure::required_sections,
        ),
        Rule::new(
            "topic-policy-actions",
            Family::TopicPolicy,
            "Topic policy actions are on the allow-list; no wildcard or denied actions",
            topic_policy::topic_policy_actions,
        ),
        Rule::new(
            "resource-completeness",
            Family::Structure,
            "A dashboard and at least one alarm are declared",
            structure::resource_completeness,
        ),
        Rule::new(
            "dashboard-schema",
            Family::Structure,
            "The dashboard body matches the dashboard JSON schema",
            structure::dashboard_schema,
        ),
        Rule::new(
            "security-hygiene",
            Family::Hygiene,
            "Encryption, retention and transport/account conditions are configured",
            hygiene::security_hygiene,
        ),
        Rule::new(
            "tagging",
            Family::Production,
            "The four standard tag keys are used",
            hygiene::tagging,
        ),
        Rule::new(
            "alarm-coverage",
            Family::Production,
            "Alarms cover every expected alarm type",
            hygiene::alarm_coverage,
        ),
        Rule::new(
            "parameterization",
            Family::Production,
            "The template is parameterised by monitoring region",
            hygiene::parameterization,
        ),
        Rule::new(
            "essential-outputs",
            Family::Production,
            "Dashboard URL and name are exported",
            hygiene::essential_outputs,
        ),
        Rule::new(
            "template-size",
            Family::Production,
            "The template is below the validation size limit",
            structure::template_size,
        ),
        Rule::new(
            "parameter-defaults",
            Family::Parameters,
            "Every parameter except the required one has a non-null default",
            parameters::parameter_defaults,
        ),
        Rule::new(
            "required-parameter",
            Family::Parameters,
            "The required parameter has no default and fixed defaults hold",
            parameters::required_parameter,
        ),
        Rule::new(
            "region-consistency",
            Family::Dashboard,
            "Every widget and metric region equals the monitoring region",
            dashboard::region_consistency,
        ),
        Rule::new(
            "model-dimension",
            Family::Dashboard,
            "Monitored-namespace metrics carry the model dimension",
            dashboard::model_dimension,
        ),
        Rule::new(
            "update-safety",
            Family::UpdateSafety,
            "Critical resources are retained and never hard-code physical names",
            update_safety::update_safety,
        ),
        Rule::new(
            "least-privilege",
            Family::LeastPrivilege,
            "Policy statements are read-only and scoped",
            least_privilege::least_privilege,
        ),
        Rule::new(
            "alarm-wiring",
            Family::AlarmWiring,
            "Every alarm notifies the topic through a conditional action list",
            alarms::alarm_wiring,
        ),
        Rule::new(
            "identity-fields",
            Family::LogQueries,
            "Log queries extract identities through the field-name parameters",
            queries::identity_fields,
        ),
        Rule::new(
            "analytics-completeness",
            Family::LogQueries,
            "User and application query groups cover invocations, tokens and prices",
            queries::analytics_completeness,
        ),
        Rule::new(
            "unknown-usage",
            Family::LogQueries,
            "Unattributed usage queries fall back and compute a percentage",
            queries::unknown_usage,
        ),
    ]
}
