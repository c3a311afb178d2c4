//! Key-value table properties
//!
//! Covers the slice of `AWS::DynamoDB::Table` the stack uses: a single
//! partition key plus billing and throughput settings.

use serde::Serialize;
use strum::Display;

use crate::template::CfnResourceProperties;

/// Attributes of the user-preferences table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TableAttribute {
    /// Messaging-platform user identifier, the partition key
    UserId,
}

/// Scalar type of a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeType {
    /// String
    #[serde(rename = "S")]
    String,
    /// Number
    #[serde(rename = "N")]
    Number,
    /// Binary
    #[serde(rename = "B")]
    Binary,
}

/// Role an attribute plays in the key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// Partition key
    Hash,
    /// Sort key
    Range,
}

/// How table capacity is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingMode {
    /// Fixed read/write capacity units
    Provisioned,
    /// On-demand capacity
    PayPerRequest,
}

/// Declared attribute definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// Attribute name
    pub attribute_name: String,
    /// Scalar type
    pub attribute_type: AttributeType,
}

/// One element of the key schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// Attribute name
    pub attribute_name: String,
    /// Partition or sort role
    pub key_type: KeyType,
}

/// Fixed capacity for provisioned billing.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// Read capacity units
    pub read_capacity_units: u64,
    /// Write capacity units
    pub write_capacity_units: u64,
}

impl Default for ProvisionedThroughput {
    fn default() -> Self {
        Self {
            read_capacity_units: 5,
            write_capacity_units: 5,
        }
    }
}

/// Properties of the table resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableProperties {
    /// Physical table name
    pub table_name: String,
    /// Declared attributes, key attributes only
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Key schema
    pub key_schema: Vec<KeySchemaElement>,
    /// Billing mode; the engine defaults to provisioned when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,
    /// Fixed capacity, required under provisioned billing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

impl TableProperties {
    /// Table keyed by a single string partition attribute.
    #[must_use]
    pub fn with_partition_key(table_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            table_name: table_name.into(),
            attribute_definitions: vec![AttributeDefinition {
                attribute_name: attribute.clone(),
                attribute_type: AttributeType::String,
            }],
            key_schema: vec![KeySchemaElement {
                attribute_name: attribute,
                key_type: KeyType::Hash,
            }],
            billing_mode: None,
            provisioned_throughput: None,
        }
    }
}

impl CfnResourceProperties for TableProperties {
    const RESOURCE_TYPE: &'static str = "AWS::DynamoDB::Table";
}
