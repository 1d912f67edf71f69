//! Schema generation utilities.

use crate::structured::format::{ObjectSchema, PropertySchema, PropertyType, SchemaDescriptor};
use serde_json::json;

/// Builder for object descriptors used in `json_schema` response formats.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    properties: Vec<(String, PropertySchema)>,
    required: Vec<String>,
    additional_properties: Option<bool>,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Add a property and mark it required.
    pub fn add_required(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties
            .push((name, PropertySchema::new(property_type)));
        self
    }

    pub fn set_required(mut self, required: &[String]) -> Self {
        self.required = required.to_vec();
        self
    }

    pub fn set_additional_properties(mut self, additional: bool) -> Self {
        self.additional_properties = Some(additional);
        self
    }

    pub fn build_object(self) -> ObjectSchema {
        ObjectSchema {
            properties: self.properties.into_iter().collect(),
            required: if self.required.is_empty() {
                None
            } else {
                Some(self.required)
            },
            additional_properties: self.additional_properties,
        }
    }

    pub fn build(self) -> SchemaDescriptor {
        SchemaDescriptor::Object(self.build_object())
    }
}

pub fn json_schema_from_type<T: schemars::JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}
