//! Identity and permission properties
//!
//! Policy documents, execution roles, and standalone policies in the
//! engine's JSON shape.

use serde::Serialize;

use crate::template::{CfnResourceProperties, CfnValue};

/// Policy language version the engine expects.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Baseline execution policy granting the runtime log delivery.
pub const BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Grant the actions
    Allow,
    /// Refuse the actions
    Deny,
}

/// Service principal allowed to assume a role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServicePrincipal {
    /// Service domain name, e.g. `lambda.amazonaws.com`
    pub service: String,
}

/// One statement of a policy document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Statement id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Allow or deny
    pub effect: Effect,
    /// Principal, for trust statements only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<ServicePrincipal>,
    /// Covered actions
    pub action: Vec<String>,
    /// Covered resources; trust statements carry none
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<CfnValue>,
}

impl PolicyStatement {
    /// Allow `actions` on `resources`, tagged with a statement id.
    #[must_use]
    pub fn allow(sid: &str, actions: &[&str], resources: Vec<CfnValue>) -> Self {
        Self {
            sid: Some(sid.to_string()),
            effect: Effect::Allow,
            principal: None,
            action: actions.iter().map(ToString::to_string).collect(),
            resource: resources,
        }
    }

    /// Trust statement letting a service assume the role.
    #[must_use]
    pub fn assume_role(service: &str) -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            principal: Some(ServicePrincipal {
                service: service.to_string(),
            }),
            action: vec!["sts:AssumeRole".to_string()],
            resource: Vec::new(),
        }
    }
}

/// A versioned list of statements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version
    pub version: String,
    /// Statements in declaration order
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// Document over `statements` with the engine's policy version.
    #[must_use]
    pub fn new(statements: Vec<PolicyStatement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: statements,
        }
    }
}

/// Inline policy entry on a role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RolePolicy {
    /// Policy name, unique within the role
    pub policy_name: String,
    /// The grants
    pub policy_document: PolicyDocument,
}

/// Properties of a role resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    /// Who may assume the role
    pub assume_role_policy_document: PolicyDocument,
    /// Attached managed policies
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<String>,
    /// Inline policies
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<RolePolicy>,
}

impl RoleProperties {
    /// Role assumable by the compute runtime, with the baseline execution
    /// policy attached.
    #[must_use]
    pub fn lambda_execution() -> Self {
        Self {
            assume_role_policy_document: PolicyDocument::new(vec![PolicyStatement::assume_role(
                "lambda.amazonaws.com",
            )]),
            managed_policy_arns: vec![BASIC_EXECUTION_POLICY_ARN.to_string()],
            policies: Vec::new(),
        }
    }
}

impl CfnResourceProperties for RoleProperties {
    const RESOURCE_TYPE: &'static str = "AWS::IAM::Role";
}

/// Properties of a standalone policy attached to existing roles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyProperties {
    /// Policy name
    pub policy_name: String,
    /// The grants
    pub policy_document: PolicyDocument,
    /// Roles the policy attaches to
    pub roles: Vec<CfnValue>,
}

impl CfnResourceProperties for PolicyProperties {
    const RESOURCE_TYPE: &'static str = "AWS::IAM::Policy";
}
