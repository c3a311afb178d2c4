//! Property values understood by the provisioning engine
//!
//! A property is either a literal or a deploy-time expression (`Ref`,
//! `Fn::GetAtt`, `Fn::Sub`, `Fn::Join`) the engine resolves while
//! applying the stack. Each variant serializes into the engine's JSON
//! shape.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A resource property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfnValue {
    /// Literal string
    String(String),
    /// Literal integer
    Number(i64),
    /// Reference to another resource's physical name
    Ref(String),
    /// Attribute of another resource, e.g. its ARN
    GetAtt(String, String),
    /// Substitution template over `${...}` pseudo parameters
    Sub(String),
    /// Concatenation of parts with a delimiter
    Join(String, Vec<CfnValue>),
}

impl CfnValue {
    /// Reference to a resource by logical id.
    #[must_use]
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    /// Attribute of a resource by logical id.
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt(logical_id.into(), attribute.into())
    }
}

impl From<&str> for CfnValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CfnValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for CfnValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl Serialize for CfnValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            Self::Number(value) => serializer.serialize_i64(*value),
            Self::Ref(logical_id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", logical_id)?;
                map.end()
            }
            Self::GetAtt(logical_id, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[logical_id.as_str(), attribute.as_str()])?;
                map.end()
            }
            Self::Sub(template) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Sub", template)?;
                map.end()
            }
            Self::Join(delimiter, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, parts))?;
                map.end()
            }
        }
    }
}
