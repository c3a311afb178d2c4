//! The Slackllm deployment stack
//!
//! One configuration structure covers both revisions of the template:
//! the initial design (grants attached to the function's managed service
//! role, provisioned billing, retained table, plain source packaging)
//! and the revised one (explicit role, on-demand billing, table deleted
//! with the stack, bundled dependencies, tightened memory ceiling).
//! `StackConfig::synthesize` validates the inputs, plans the code asset,
//! and assembles the provisioning artifact in dependency order.

mod error;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::assets::{plan_code_asset, AssetManifest, PackagingMode};
use crate::parameters::{secret_ref, MemoryLimits, StackParameters};
use crate::resources::dynamodb::{
    BillingMode, ProvisionedThroughput, TableAttribute, TableProperties,
};
use crate::resources::iam::{
    PolicyDocument, PolicyProperties, PolicyStatement, RolePolicy, RoleProperties,
};
use crate::resources::lambda::{
    Architecture, Code, Environment, FunctionProperties, FunctionUrlProperties,
    PermissionProperties, UrlAuthType,
};
use crate::template::{CfnValue, Output, Resource, Template};

pub use error::{SynthesisError, SynthesisResult};

/// Logical id of the compute function.
pub const FUNCTION_LOGICAL_ID: &str = "Slackllm";
/// Logical id of the user-preferences table.
pub const TABLE_LOGICAL_ID: &str = "SlackllmTable";
/// Logical id of the explicit execution role.
pub const ROLE_LOGICAL_ID: &str = "SlackllmRole";
/// Logical id of the managed service role.
pub const SERVICE_ROLE_LOGICAL_ID: &str = "SlackllmServiceRole";
/// Logical id of the grant policy attached to the managed service role.
pub const SERVICE_ROLE_POLICY_LOGICAL_ID: &str = "SlackllmServiceRoleDefaultPolicy";
/// Logical id of the public invocation endpoint.
pub const FUNCTION_URL_LOGICAL_ID: &str = "SlackllmFunctionUrl";
/// Logical id of the public-invoke permission.
pub const URL_PERMISSION_LOGICAL_ID: &str = "SlackllmUrlPublicAccess";
/// Name of the output carrying the endpoint URL.
pub const URL_OUTPUT_NAME: &str = "SlackllmUrl";

/// Environment variable holding the bot token reference.
pub const ENV_SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
/// Environment variable holding the request-signing secret reference.
pub const ENV_SLACK_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";
/// Environment variable holding the model identifier.
pub const ENV_BEDROCK_MODEL_ID: &str = "BEDROCK_MODEL_ID";
/// Environment variable holding the table name.
pub const ENV_DYNAMODB_TABLE_NAME: &str = "DYNAMODB_TABLE_NAME";

/// Inference profiles the bot lets users switch between. The first entry
/// is the default the function starts with; the invocation grant is
/// scoped to exactly this set.
pub const MODEL_CATALOG: &[&str] = &[
    "arn:aws:bedrock:us-east-1:705478596818:inference-profile/us.anthropic.claude-3-5-sonnet-20241022-v2:0",
    "arn:aws:bedrock:us-east-1:705478596818:inference-profile/us.anthropic.claude-3-5-haiku-20241022-v1:0",
    "arn:aws:bedrock:us-east-1:705478596818:inference-profile/us.amazon.nova-lite-v1:0",
    "arn:aws:bedrock:us-east-1:705478596818:inference-profile/us.amazon.nova-pro-v1:0",
];

/// Read and write actions the table grant covers.
pub const TABLE_READ_WRITE_ACTIONS: &[&str] = &[
    "dynamodb:BatchGetItem",
    "dynamodb:BatchWriteItem",
    "dynamodb:ConditionCheckItem",
    "dynamodb:DeleteItem",
    "dynamodb:DescribeTable",
    "dynamodb:GetItem",
    "dynamodb:GetRecords",
    "dynamodb:GetShardIterator",
    "dynamodb:PutItem",
    "dynamodb:Query",
    "dynamodb:Scan",
    "dynamodb:UpdateItem",
];

const MAX_FUNCTION_NAME_LEN: usize = 64;
const MAX_STACK_NAME_LEN: usize = 128;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 900;

/// Schema revision of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateRevision {
    /// Superseded first design
    Initial,
    /// Canonical revised design
    #[default]
    Revised,
}

/// How the function obtains its execution identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityModel {
    /// Grants live in a standalone policy attached to the function's
    /// managed service role
    FunctionManaged,
    /// Explicit role declared first with the grants inline, then
    /// associated with the function
    ExplicitRole,
}

/// What happens to the table when the stack is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Keep the table and its data
    Retain,
    /// Delete the table with the stack
    Destroy,
}

impl RemovalPolicy {
    const fn deletion_policy(self) -> crate::template::DeletionPolicy {
        match self {
            Self::Retain => crate::template::DeletionPolicy::Retain,
            Self::Destroy => crate::template::DeletionPolicy::Delete,
        }
    }
}

/// Configuration of the deployment stack.
///
/// `Default` follows the revised design; [`StackConfig::initial`]
/// restores the superseded one. Every knob is an overridable field.
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Stack name registered with the provisioning engine
    pub stack_name: String,
    /// Physical name of the compute function
    pub function_name: String,
    /// Physical name of the user-preferences table
    pub table_name: String,
    /// Runtime identifier the function executes under
    pub runtime: String,
    /// Handler entry point inside the packaged code
    pub handler: String,
    /// Instruction set of the function
    pub architecture: Architecture,
    /// Longest a single invocation may run
    pub timeout: Duration,
    /// Ceiling on simultaneous executions
    pub reserved_concurrency: u32,
    /// Memory range the revision accepts
    pub memory_limits: MemoryLimits,
    /// How the function obtains its identity
    pub identity: IdentityModel,
    /// How the source tree becomes a package
    pub packaging: PackagingMode,
    /// Table billing mode
    pub billing_mode: BillingMode,
    /// Table lifecycle on stack teardown
    pub table_removal: RemovalPolicy,
    /// Model identifier the function starts with
    pub default_model_id: String,
    /// Model identifiers the invocation grant is scoped to
    pub model_catalog: Vec<String>,
    /// Directory holding the function source tree
    pub code_dir: PathBuf,
    /// Artifact store bucket the code package uploads into
    pub asset_bucket: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::revised()
    }
}

impl StackConfig {
    /// The canonical revised design.
    #[must_use]
    pub fn revised() -> Self {
        Self {
            stack_name: "SlackllmStack".to_string(),
            function_name: "Slackllm".to_string(),
            table_name: "Slackllm".to_string(),
            runtime: "python3.12".to_string(),
            handler: "slackllm.lambda_handler".to_string(),
            architecture: Architecture::Arm64,
            timeout: Duration::from_secs(300),
            reserved_concurrency: 10,
            memory_limits: MemoryLimits { min: 128, max: 2048 },
            identity: IdentityModel::ExplicitRole,
            packaging: PackagingMode::BundledDependencies,
            billing_mode: BillingMode::PayPerRequest,
            table_removal: RemovalPolicy::Destroy,
            default_model_id: MODEL_CATALOG[0].to_string(),
            model_catalog: MODEL_CATALOG.iter().map(|model| (*model).to_string()).collect(),
            code_dir: PathBuf::from("lambda"),
            asset_bucket: "slackllm-assets".to_string(),
        }
    }

    /// The superseded first design.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            memory_limits: MemoryLimits { min: 128, max: 10240 },
            identity: IdentityModel::FunctionManaged,
            packaging: PackagingMode::SourceTree,
            billing_mode: BillingMode::Provisioned,
            table_removal: RemovalPolicy::Retain,
            ..Self::revised()
        }
    }

    /// Preset for `revision`.
    #[must_use]
    pub fn for_revision(revision: TemplateRevision) -> Self {
        match revision {
            TemplateRevision::Initial => Self::initial(),
            TemplateRevision::Revised => Self::revised(),
        }
    }

    /// Synthesizes the provisioning artifact from this configuration and
    /// the supplied deploy-time parameters.
    ///
    /// Resources are assembled in dependency order: table, identity,
    /// function, invocation endpoint, output. Synthesizing the same
    /// configuration twice yields byte-identical artifacts.
    ///
    /// # Errors
    ///
    /// Fails before any resource is declared if a parameter is out of
    /// bounds, the configuration violates a platform rule, or the code
    /// asset cannot be planned.
    pub fn synthesize(&self, parameters: &StackParameters) -> SynthesisResult<SynthesizedStack> {
        parameters.validate(&self.memory_limits)?;
        self.validate()?;

        let asset = plan_code_asset(&self.code_dir, self.packaging)?;
        debug!("planned code asset {} for stack {}", asset.s3_key, self.stack_name);

        let mut template = Template::new(
            "Slack chat-bot stack: compute function, user-preferences table, public endpoint",
        );

        // Table
        let mut table = TableProperties::with_partition_key(
            self.table_name.as_str(),
            TableAttribute::UserId.to_string(),
        );
        match self.billing_mode {
            BillingMode::Provisioned => {
                table.provisioned_throughput = Some(ProvisionedThroughput::default());
            }
            BillingMode::PayPerRequest => {
                table.billing_mode = Some(BillingMode::PayPerRequest);
            }
        }
        template.add_resource(
            TABLE_LOGICAL_ID,
            Resource::new(&table)?.with_deletion_policy(self.table_removal.deletion_policy()),
        );

        // Identity
        let role_logical_id = match self.identity {
            IdentityModel::FunctionManaged => SERVICE_ROLE_LOGICAL_ID,
            IdentityModel::ExplicitRole => ROLE_LOGICAL_ID,
        };
        match self.identity {
            IdentityModel::FunctionManaged => {
                template.add_resource(
                    SERVICE_ROLE_LOGICAL_ID,
                    Resource::new(&RoleProperties::lambda_execution())?,
                );
                let policy = PolicyProperties {
                    policy_name: SERVICE_ROLE_POLICY_LOGICAL_ID.to_string(),
                    policy_document: PolicyDocument::new(self.grant_statements()),
                    roles: vec![CfnValue::reference(SERVICE_ROLE_LOGICAL_ID)],
                };
                template.add_resource(SERVICE_ROLE_POLICY_LOGICAL_ID, Resource::new(&policy)?);
            }
            IdentityModel::ExplicitRole => {
                let mut role = RoleProperties::lambda_execution();
                role.policies = vec![RolePolicy {
                    policy_name: "SlackllmRolePolicy".to_string(),
                    policy_document: PolicyDocument::new(self.grant_statements()),
                }];
                template.add_resource(ROLE_LOGICAL_ID, Resource::new(&role)?);
            }
        }

        // Function
        let function = FunctionProperties {
            function_name: self.function_name.clone(),
            runtime: self.runtime.clone(),
            handler: self.handler.clone(),
            code: Code {
                s3_bucket: self.asset_bucket.clone(),
                s3_key: asset.s3_key.clone(),
            },
            architectures: vec![self.architecture],
            memory_size: parameters.memory_size,
            timeout: self.timeout.as_secs(),
            reserved_concurrent_executions: Some(self.reserved_concurrency),
            environment: self.function_environment(parameters),
            role: CfnValue::get_att(role_logical_id, "Arn"),
        };
        template.add_resource(
            FUNCTION_LOGICAL_ID,
            Resource::new(&function)?.depends_on(role_logical_id),
        );

        // Public endpoint
        let url = FunctionUrlProperties {
            target_function_arn: CfnValue::get_att(FUNCTION_LOGICAL_ID, "Arn"),
            auth_type: UrlAuthType::None,
        };
        template.add_resource(FUNCTION_URL_LOGICAL_ID, Resource::new(&url)?);
        template.add_resource(
            URL_PERMISSION_LOGICAL_ID,
            Resource::new(&PermissionProperties::public_function_url(CfnValue::get_att(
                FUNCTION_LOGICAL_ID,
                "Arn",
            )))?,
        );

        template.add_output(
            URL_OUTPUT_NAME,
            Output {
                description: Some("Public invocation endpoint of the bot".to_string()),
                value: CfnValue::get_att(FUNCTION_URL_LOGICAL_ID, "FunctionUrl"),
            },
        );

        info!(
            "synthesized stack {} with {} resources",
            self.stack_name,
            template.resources.len()
        );

        Ok(SynthesizedStack {
            stack_name: self.stack_name.clone(),
            template,
            assets: AssetManifest {
                bucket: self.asset_bucket.clone(),
                assets: vec![asset],
            },
        })
    }

    /// The three custom grants every revision carries: self-invocation,
    /// model invocation, and table access.
    fn grant_statements(&self) -> Vec<PolicyStatement> {
        vec![
            PolicyStatement::allow(
                "AllowLambdaSelfInvoke",
                &["lambda:InvokeFunction"],
                vec![self.self_invoke_arn()],
            ),
            PolicyStatement::allow(
                "AllowBedrockInvoke",
                &["bedrock:InvokeModel"],
                self.model_catalog
                    .iter()
                    .map(|model| CfnValue::from(model.as_str()))
                    .collect(),
            ),
            PolicyStatement::allow(
                "AllowTableReadWrite",
                TABLE_READ_WRITE_ACTIONS,
                vec![CfnValue::get_att(TABLE_LOGICAL_ID, "Arn")],
            ),
        ]
    }

    /// ARN pattern covering the function and its qualified variants.
    ///
    /// The explicit role carries its grants inline, so referencing the
    /// function by attribute would make role and function mutually
    /// dependent; building the ARN from pseudo parameters and the fixed
    /// function name breaks the cycle. The standalone policy of the
    /// managed model has no such constraint and keeps the attribute
    /// reference.
    fn self_invoke_arn(&self) -> CfnValue {
        match self.identity {
            IdentityModel::FunctionManaged => CfnValue::Join(
                String::new(),
                vec![CfnValue::get_att(FUNCTION_LOGICAL_ID, "Arn"), CfnValue::from("*")],
            ),
            IdentityModel::ExplicitRole => CfnValue::Sub(format!(
                "arn:${{AWS::Partition}}:lambda:${{AWS::Region}}:${{AWS::AccountId}}:function:{}*",
                self.function_name
            )),
        }
    }

    /// Environment contract between the template and the handler:
    /// exactly the bot credentials, the model identifier, and the table
    /// name.
    fn function_environment(&self, parameters: &StackParameters) -> Environment {
        let mut variables = BTreeMap::new();
        variables.insert(
            ENV_SLACK_BOT_TOKEN.to_string(),
            CfnValue::from(secret_ref(&parameters.secrets_name, ENV_SLACK_BOT_TOKEN)),
        );
        variables.insert(
            ENV_SLACK_SIGNING_SECRET.to_string(),
            CfnValue::from(secret_ref(&parameters.secrets_name, ENV_SLACK_SIGNING_SECRET)),
        );
        variables.insert(
            ENV_BEDROCK_MODEL_ID.to_string(),
            CfnValue::from(self.default_model_id.as_str()),
        );
        variables.insert(
            ENV_DYNAMODB_TABLE_NAME.to_string(),
            CfnValue::reference(TABLE_LOGICAL_ID),
        );
        Environment { variables }
    }

    /// Platform rules the engine would reject the stack for.
    fn validate(&self) -> SynthesisResult<()> {
        validate_stack_name(&self.stack_name)?;
        if self.function_name.is_empty() || self.function_name.len() > MAX_FUNCTION_NAME_LEN {
            return Err(SynthesisError::InvalidFunctionName {
                name: self.function_name.clone(),
            });
        }
        let timeout = self.timeout.as_secs();
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout) {
            return Err(SynthesisError::InvalidTimeout { seconds: timeout });
        }
        Ok(())
    }
}

/// Stack names start with a letter and contain only alphanumerics and
/// hyphens.
fn validate_stack_name(name: &str) -> SynthesisResult<()> {
    let valid = name.len() <= MAX_STACK_NAME_LEN
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SynthesisError::InvalidStackName {
            name: name.to_string(),
        })
    }
}

/// The synthesized provisioning artifact plus its asset plan.
#[derive(Debug, Clone)]
pub struct SynthesizedStack {
    /// Stack name to register with the provisioning engine
    pub stack_name: String,
    /// The resource template
    pub template: Template,
    /// Code artifacts the packager publishes before apply
    pub assets: AssetManifest,
}

impl SynthesizedStack {
    /// Pretty-printed template body.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be serialized.
    pub fn template_json(&self) -> SynthesisResult<String> {
        Ok(self.template.to_json_pretty()?)
    }

    /// Pretty-printed asset manifest for the external packager.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized.
    pub fn assets_json(&self) -> SynthesisResult<String> {
        Ok(self.assets.to_json_pretty()?)
    }
}
