//! Capability metadata advertised through discovery and used by validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Describes one capability a service exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    pub endpoint: String,
    pub method: String,
    pub input_schema: InputSchema,
}

/// Object schema for capability input fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
}

impl InputSchema {
    /// Empty object schema.
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Add a required string property.
    pub fn with_required_string(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            PropertySchema {
                property_type: "string".to_string(),
                description: description.into(),
            },
        );
        self.required.push(name);
        self
    }

    /// Whether `field` is declared as a string.
    pub fn is_string(&self, field: &str) -> bool {
        self.properties
            .get(field)
            .is_some_and(|p| p.property_type == "string")
    }
}
