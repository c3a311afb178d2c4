//! Provisioning artifact document model
//!
//! A synthesized template is a format version, a map of resource
//! declarations, and a map of outputs. Both maps are `BTreeMap`s so a
//! given configuration always serializes to the same bytes.

mod value;

use std::collections::BTreeMap;

use serde::Serialize;

pub use value::CfnValue;

/// Template format version understood by the provisioning engine.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Typed `Properties` block of one resource family.
pub trait CfnResourceProperties: Serialize {
    /// Resource type identifier, e.g. `AWS::DynamoDB::Table`.
    const RESOURCE_TYPE: &'static str;
}

/// What the engine does with a resource that leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    /// Orphan the resource, keeping its data
    Retain,
    /// Remove the resource
    Delete,
}

/// A single resource declaration.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Resource type identifier
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// Logical ids this resource must be created after
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Lifecycle policy on stack deletion
    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
    /// Lifecycle policy when an update replaces the resource
    #[serde(rename = "UpdateReplacePolicy", skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
    /// Type-specific properties
    #[serde(rename = "Properties")]
    pub properties: serde_json::Value,
}

impl Resource {
    /// Declares a resource from its typed properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the properties cannot be serialized.
    pub fn new<P: CfnResourceProperties>(properties: &P) -> serde_json::Result<Self> {
        Ok(Self {
            resource_type: P::RESOURCE_TYPE.to_string(),
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
            properties: serde_json::to_value(properties)?,
        })
    }

    /// Adds an explicit creation-order dependency.
    #[must_use]
    pub fn depends_on(mut self, logical_id: &str) -> Self {
        self.depends_on.push(logical_id.to_string());
        self
    }

    /// Sets the lifecycle policy for both deletion and replacement.
    #[must_use]
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }
}

/// A value surfaced by the engine after the stack is applied.
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    /// Human-readable description
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Deploy-time expression the engine resolves
    #[serde(rename = "Value")]
    pub value: CfnValue,
}

/// The complete provisioning artifact.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    /// Format version of the document
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    /// Human-readable description
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resource declarations keyed by logical id
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, Resource>,
    /// Outputs keyed by name
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    /// Empty template with the engine's format version.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: Some(description.into()),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Adds a resource declaration under `logical_id`.
    pub fn add_resource(&mut self, logical_id: impl Into<String>, resource: Resource) {
        self.resources.insert(logical_id.into(), resource);
    }

    /// Adds an output under `name`.
    pub fn add_output(&mut self, name: impl Into<String>, output: Output) {
        self.outputs.insert(name.into(), output);
    }

    /// Compact JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be serialized.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON body, the form written to disk so diffs stay
    /// reviewable.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be serialized.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
