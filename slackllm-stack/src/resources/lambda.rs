//! Compute function properties
//!
//! The function resource, its public invocation URL, and the permission
//! grant that opens the URL to unauthenticated callers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::template::{CfnResourceProperties, CfnValue};

/// Instruction set the function runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Architecture {
    /// 64-bit ARM
    #[serde(rename = "arm64")]
    Arm64,
    /// 64-bit x86
    #[serde(rename = "x86_64")]
    X86_64,
}

/// Location of the packaged code in the artifact store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Code {
    /// Artifact store bucket
    pub s3_bucket: String,
    /// Object key of the package
    pub s3_key: String,
}

/// Environment variables exposed to the handler at run time.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    /// Variables keyed by name, sorted for deterministic output
    pub variables: BTreeMap<String, CfnValue>,
}

/// Properties of the function resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionProperties {
    /// Physical function name
    pub function_name: String,
    /// Runtime identifier, e.g. `python3.12`
    pub runtime: String,
    /// Entry point inside the package, `module.function`
    pub handler: String,
    /// Package location
    pub code: Code,
    /// Instruction sets; the platform accepts exactly one entry
    pub architectures: Vec<Architecture>,
    /// Memory allocation in MB
    pub memory_size: u32,
    /// Invocation timeout in seconds
    pub timeout: u64,
    /// Ceiling on simultaneous executions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_concurrent_executions: Option<u32>,
    /// Run-time environment
    pub environment: Environment,
    /// ARN of the execution role
    pub role: CfnValue,
}

impl CfnResourceProperties for FunctionProperties {
    const RESOURCE_TYPE: &'static str = "AWS::Lambda::Function";
}

/// Authentication mode on a function URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UrlAuthType {
    /// Public endpoint, callers are verified by the handler itself
    #[serde(rename = "NONE")]
    None,
    /// Signature-authenticated callers only
    #[serde(rename = "AWS_IAM")]
    AwsIam,
}

/// Properties of the function URL resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionUrlProperties {
    /// ARN of the function the URL fronts
    pub target_function_arn: CfnValue,
    /// Authentication mode
    pub auth_type: UrlAuthType,
}

impl CfnResourceProperties for FunctionUrlProperties {
    const RESOURCE_TYPE: &'static str = "AWS::Lambda::Url";
}

/// Invocation permission granted on a function.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionProperties {
    /// Permitted action
    pub action: String,
    /// Function the permission is attached to
    pub function_name: CfnValue,
    /// Principal the permission is granted to
    pub principal: String,
    /// Auth mode the calling URL must use, for URL permissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_url_auth_type: Option<UrlAuthType>,
}

impl PermissionProperties {
    /// Grant letting any caller invoke the function through its
    /// unauthenticated URL.
    #[must_use]
    pub fn public_function_url(function_arn: CfnValue) -> Self {
        Self {
            action: "lambda:InvokeFunctionUrl".to_string(),
            function_name: function_arn,
            principal: "*".to_string(),
            function_url_auth_type: Some(UrlAuthType::None),
        }
    }
}

impl CfnResourceProperties for PermissionProperties {
    const RESOURCE_TYPE: &'static str = "AWS::Lambda::Permission";
}
