//! Tool-related types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured tool arguments: argument name to value.
pub type Arguments = Map<String, Value>;

/// Declarative description of the arguments a tool accepts.
///
/// Serializes to the JSON-Schema subset that LLM function-calling APIs expect.
/// The engine never validates arguments against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A single named property in a [`ParameterSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ParameterSchema {
    /// An object schema with no properties.
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional property.
    pub fn property(
        mut self,
        name: impl Into<String>,
        property_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            PropertySchema {
                property_type: property_type.into(),
                description: description.into(),
            },
        );
        self
    }

    /// Add a property and mark it required.
    pub fn required_property(
        self,
        name: impl Into<String>,
        property_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut schema = self.property(name.clone(), property_type, description);
        if !schema.required.contains(&name) {
            schema.required.push(name);
        }
        schema
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::object()
    }
}

/// A tool definition exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
