//! Conformance profile for the static checker.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, PricingConfig, strings};

/// Every constant the rule set compares a template against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// The single region every widget must target.
    pub monitoring_region: String,
    /// Expected value of the model dimension.
    pub model_id: String,
    /// Metric namespace of the monitored service.
    pub monitored_namespace: String,
    /// Dimension key identifying the model.
    pub model_dimension: String,
    /// The one parameter allowed (and required) to have no default.
    pub required_parameter: String,
    /// Parameters whose default must equal a fixed value.
    pub expected_defaults: BTreeMap<String, String>,
    /// Alarm thresholds; each needs a numeric default.
    pub threshold_parameters: Vec<String>,
    pub critical_resources: Vec<String>,
    pub expected_alarms: Vec<String>,
    /// Values of the `AlarmType` tag expected across alarms.
    pub alarm_types: Vec<String>,
    pub tag_keys: Vec<String>,
    pub allowed_topic_actions: Vec<String>,
    pub denied_topic_actions: Vec<String>,
    pub size_limit_bytes: usize,
    /// `${Name}` replacements applied to the dashboard body before JSON parsing.
    pub placeholders: BTreeMap<String, String>,
    pub pseudo_parameters: BTreeMap<String, String>,
    pub identity_fields: Vec<IdentityField>,
    pub pricing: PricingConfig,
    pub query_groups: Vec<QueryGroup>,
    pub viewer_policy: String,
    pub topic_resource: String,
    pub subscription_resource: String,
    pub update_safe_types: Vec<String>,
    /// Resource type → property holding the physical name.
    pub name_properties: BTreeMap<String, String>,
    /// Log group prefix the logs statements must be scoped to.
    pub invocation_log_group: String,
    /// Condition keys accepted as compensating a wildcard resource.
    pub wildcard_condition_keys: Vec<String>,
}

/// A configurable identity attribute used in log queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityField {
    /// Template parameter holding the field name (`UserIdField`).
    pub parameter: String,
    /// Named regex capture the query extracts into (`userId`).
    pub capture: String,
    pub label: String,
}

/// Log widgets whose titles carry one of `keywords` form one analytics group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl QueryGroup {
    pub fn matches_title(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        let monitoring_region = "us-east-1".to_string();
        let model_id = "amazon.nova-pro-v1:0".to_string();
        Self {
            monitored_namespace: "AWS/Bedrock".to_string(),
            model_dimension: "ModelId".to_string(),
            required_parameter: "MonitoringRegion".to_string(),
            expected_defaults: BTreeMap::from([
                ("ModelId".to_string(), model_id.clone()),
                ("DashboardName".to_string(), "NovaProMonitoring".to_string()),
                ("AlarmEmail".to_string(), String::new()),
            ]),
            threshold_parameters: strings(&[
                "ErrorRateThreshold",
                "P99LatencyThreshold",
                "DailyCostThreshold",
                "ThrottleRateThreshold",
            ]),
            critical_resources: strings(&[
                "NovaProDashboard",
                "AlarmTopic",
                "HighErrorRateAlarm",
                "HighP99LatencyAlarm",
                "DailyCostLimitAlarm",
                "HighThrottlingRateAlarm",
                "DashboardViewerPolicy",
                "DashboardViewerRole",
            ]),
            expected_alarms: strings(&[
                "HighErrorRateAlarm",
                "HighP99LatencyAlarm",
                "DailyCostLimitAlarm",
                "HighThrottlingRateAlarm",
            ]),
            alarm_types: strings(&["ErrorRate", "Latency", "Cost", "Throttling"]),
            tag_keys: strings(&["Environment", "Owner", "CostCenter", "Purpose"]),
            allowed_topic_actions: strings(&[
                "AddPermission",
                "DeleteTopic",
                "GetDataProtectionPolicy",
                "GetTopicAttributes",
                "ListSubscriptionsByTopic",
                "ListTagsForResource",
                "Publish",
                "PutDataProtectionPolicy",
                "RemovePermission",
                "SetTopicAttributes",
                "Subscribe",
            ]),
            denied_topic_actions: strings(&["sns:Unsubscribe", "sns:Receive"]),
            size_limit_bytes: 51_200,
            placeholders: BTreeMap::from([
                ("MonitoringRegion".to_string(), monitoring_region.clone()),
                ("ModelId".to_string(), model_id.clone()),
                ("ErrorRateThreshold".to_string(), "5".to_string()),
            ]),
            pseudo_parameters: BTreeMap::from([
                ("AWS::Region".to_string(), monitoring_region.clone()),
                ("AWS::AccountId".to_string(), "123456789012".to_string()),
                ("AWS::Partition".to_string(), "aws".to_string()),
                ("AWS::StackName".to_string(), "placeholder-stack".to_string()),
            ]),
            identity_fields: vec![
                IdentityField {
                    parameter: "UserIdField".to_string(),
                    capture: "userId".to_string(),
                    label: "user".to_string(),
                },
                IdentityField {
                    parameter: "ApplicationIdField".to_string(),
                    capture: "applicationId".to_string(),
                    label: "application".to_string(),
                },
            ],
            pricing: PricingConfig::default(),
            query_groups: vec![
                QueryGroup {
                    name: "user".to_string(),
                    keywords: strings(&["user"]),
                },
                QueryGroup {
                    name: "application".to_string(),
                    keywords: strings(&["application", "app "]),
                },
            ],
            viewer_policy: "DashboardViewerPolicy".to_string(),
            topic_resource: "AlarmTopic".to_string(),
            subscription_resource: "AlarmSubscription".to_string(),
            update_safe_types: strings(&[
                "AWS::CloudWatch::Dashboard",
                "AWS::CloudWatch::Alarm",
                "AWS::SNS::Topic",
                "AWS::SNS::Subscription",
                "AWS::SNS::TopicPolicy",
                "AWS::IAM::Role",
                "AWS::IAM::ManagedPolicy",
            ]),
            name_properties: BTreeMap::from([
                ("AWS::CloudWatch::Dashboard".to_string(), "DashboardName".to_string()),
                ("AWS::CloudWatch::Alarm".to_string(), "AlarmName".to_string()),
                ("AWS::SNS::Topic".to_string(), "TopicName".to_string()),
                ("AWS::IAM::Role".to_string(), "RoleName".to_string()),
                ("AWS::IAM::ManagedPolicy".to_string(), "ManagedPolicyName".to_string()),
            ]),
            invocation_log_group: "/aws/bedrock/modelinvocations".to_string(),
            wildcard_condition_keys: strings(&["cloudwatch:namespace", "aws:RequestedRegion"]),
            monitoring_region,
            model_id,
        }
    }
}

impl CheckConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = super::load_yaml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = super::from_yaml(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.monitoring_region.is_empty() {
            return Err(ConfigError::Config(
                "monitoring_region must not be empty".to_string(),
            ));
        }
        if self.identity_fields.iter().any(|f| f.capture.is_empty()) {
            return Err(ConfigError::Config(
                "identity field captures must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Placeholders and pseudo parameters merged into one lookup table.
    pub fn substitution_table(&self) -> BTreeMap<String, String> {
        let mut table = self.pseudo_parameters.clone();
        table.extend(
            self.placeholders
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        table
    }
}
