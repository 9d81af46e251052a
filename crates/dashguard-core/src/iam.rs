//! IAM policy statements declared by the template.

use crate::error::TemplateError;
use crate::node::Node;
use crate::template::{Resource, Template};

pub const MANAGED_POLICY_TYPE: &str = "AWS::IAM::ManagedPolicy";
pub const ROLE_TYPE: &str = "AWS::IAM::Role";

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyStatement {
    /// Logical name of the resource declaring the statement.
    pub policy: String,
    pub index: usize,
    pub sid: Option<String>,
    pub effect: String,
    pub actions: Vec<String>,
    /// Literal resource text, or the rendered intrinsic (`!Sub` template string, `${Ref}`).
    pub resources: Vec<String>,
    pub has_condition: bool,
    /// Condition keys across all operators, e.g. `cloudwatch:namespace`.
    pub condition_keys: Vec<String>,
}

impl PolicyStatement {
    pub fn location(&self) -> String {
        match &self.sid {
            Some(sid) => format!("{}.Statement[{}] ({sid})", self.policy, self.index),
            None => format!("{}.Statement[{}]", self.policy, self.index),
        }
    }

    pub fn is_allow(&self) -> bool {
        self.effect.eq_ignore_ascii_case("allow")
    }

    /// Service prefixes of the actions (`cloudwatch`, `logs`, ...), deduplicated.
    pub fn services(&self) -> Vec<&str> {
        let mut services: Vec<&str> = self
            .actions
            .iter()
            .map(|a| a.split_once(':').map_or(a.as_str(), |(service, _)| service))
            .collect();
        services.sort_unstable();
        services.dedup();
        services
    }

    pub fn uses_service(&self, service: &str) -> bool {
        self.services().iter().any(|s| s.eq_ignore_ascii_case(service))
    }

    pub fn has_wildcard_resource(&self) -> bool {
        self.resources.iter().any(|r| r.trim() == "*")
    }

    /// Scoped means at least one resource and none of them a bare `*`.
    pub fn resource_scoped(&self) -> bool {
        !self.resources.is_empty() && !self.has_wildcard_resource()
    }

    pub fn has_condition_key(&self, key: &str) -> bool {
        self.condition_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// Collects statements from managed policies and inline role policies, in template order.
pub fn policy_statements(template: &Template) -> Result<Vec<PolicyStatement>, TemplateError> {
    let mut statements = Vec::new();
    for resource in template.resources()? {
        if resource.is_type(MANAGED_POLICY_TYPE) {
            if let Some(document) = resource.property("PolicyDocument") {
                collect(&resource, document, &mut statements);
            }
        } else if resource.is_type(ROLE_TYPE) {
            let policies = resource.property("Policies").map(Node::items).unwrap_or_default();
            for policy in policies {
                if let Some(document) = policy.get("PolicyDocument") {
                    collect(&resource, document, &mut statements);
                }
            }
        }
    }
    Ok(statements)
}

fn collect(resource: &Resource, document: &Node, out: &mut Vec<PolicyStatement>) {
    let statements = document.get("Statement").map(Node::items).unwrap_or_default();
    for (index, statement) in statements.into_iter().enumerate() {
        let text_list = |key: &str| -> Vec<String> {
            statement
                .get(key)
                .map(|n| n.items().into_iter().map(Node::render).collect())
                .unwrap_or_default()
        };
        let condition = statement.get("Condition");
        let condition_keys = condition
            .and_then(Node::as_mapping)
            .unwrap_or_default()
            .iter()
            .flat_map(|(_, operator)| {
                operator
                    .as_mapping()
                    .unwrap_or_default()
                    .iter()
                    .map(|(key, _)| key.clone())
            })
            .collect();

        out.push(PolicyStatement {
            policy: resource.name.clone(),
            index,
            sid: statement.get("Sid").map(Node::render),
            effect: statement.get("Effect").map(Node::render).unwrap_or_default(),
            actions: text_list("Action"),
            resources: text_list("Resource"),
            has_condition: condition.is_some_and(|c| !c.is_null()),
            condition_keys,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"
Resources:
  Viewer:
    Type: AWS::IAM::ManagedPolicy
    Properties:
      PolicyDocument:
        Statement:
          - Sid: Read
            Effect: Allow
            Action:
              - cloudwatch:GetDashboard
              - cloudwatch:ListDashboards
            Resource: !Sub 'arn:aws:cloudwatch::${AWS::AccountId}:dashboard/${DashboardName}'
          - Effect: Allow
            Action: cloudwatch:GetMetricData
            Resource: '*'
            Condition:
              StringEquals:
                cloudwatch:namespace: AWS/Bedrock
  Role:
    Type: AWS::IAM::Role
    Properties:
      Policies:
        - PolicyName: inline
          PolicyDocument:
            Statement:
              Effect: Allow
              Action: logs:StartQuery
              Resource: '*'
"#;

    #[test]
    fn test_collects_managed_and_inline_statements() {
        let statements = policy_statements(&Template::parse(TEMPLATE)).unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].location(), "Viewer.Statement[0] (Read)");
        assert_eq!(statements[2].policy, "Role");
    }

    #[test]
    fn test_scope_and_conditions() {
        let statements = policy_statements(&Template::parse(TEMPLATE)).unwrap();
        assert!(statements[0].resource_scoped());
        assert!(statements[0].resources[0].contains(":dashboard/"));
        assert_eq!(statements[0].services(), vec!["cloudwatch"]);

        assert!(!statements[1].resource_scoped());
        assert!(statements[1].has_condition);
        assert!(statements[1].has_condition_key("cloudwatch:namespace"));

        assert!(statements[2].has_wildcard_resource());
        assert!(!statements[2].has_condition);
    }
}
