//! `response_format` request shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output format requested from the model, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form JSON object output.
    JsonObject,
    /// Output constrained to a named schema.
    JsonSchema { json_schema: JsonSchemaFormat },
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        ResponseFormat::JsonObject
    }

    pub fn json_schema(name: impl Into<String>, strict: bool, schema: SchemaDescriptor) -> Self {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.into(),
                strict,
                schema,
            },
        }
    }

    /// The schema the output must satisfy, if any.
    pub fn schema(&self) -> Option<&SchemaDescriptor> {
        match self {
            ResponseFormat::JsonObject => None,
            ResponseFormat::JsonSchema { json_schema } => Some(&json_schema.schema),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: SchemaDescriptor,
}

/// Recursive schema descriptor: an object, or an array wrapping another descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaDescriptor {
    Object(ObjectSchema),
    Array { items: Box<SchemaDescriptor> },
}

impl SchemaDescriptor {
    pub fn array_of(items: SchemaDescriptor) -> Self {
        SchemaDescriptor::Array {
            items: Box::new(items),
        }
    }

    /// Number of array wrappers around the innermost object.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let SchemaDescriptor::Array { items } = current {
            depth += 1;
            current = items;
        }
        depth
    }

    /// The innermost object descriptor.
    pub fn innermost_object(&self) -> &ObjectSchema {
        let mut current = self;
        loop {
            match current {
                SchemaDescriptor::Object(obj) => return obj,
                SchemaDescriptor::Array { items } => current = items,
            }
        }
    }

    /// Plain JSON Schema document for this descriptor.
    pub fn to_json_schema(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<ObjectSchema> for SchemaDescriptor {
    fn from(obj: ObjectSchema) -> Self {
        SchemaDescriptor::Object(obj)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: TypeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl PropertySchema {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type: TypeSpec::Single(property_type),
            description: None,
            enum_values: None,
        }
    }

    pub fn union(types: Vec<PropertyType>) -> Self {
        Self {
            property_type: TypeSpec::Union(types),
            description: None,
            enum_values: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }
}

/// A single property type or a union of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Single(PropertyType),
    Union(Vec<PropertyType>),
}

impl TypeSpec {
    pub fn allows(&self, t: PropertyType) -> bool {
        match self {
            TypeSpec::Single(s) => *s == t,
            TypeSpec::Union(ts) => ts.contains(&t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
}
