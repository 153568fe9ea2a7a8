//! Response schema in the OpenAPI subset accepted by `responseSchema`, and the
//! local conformance check applied to every parsed response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_ordering: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    fn scalar(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: None,
            property_ordering: None,
            required: None,
            items: None,
        }
    }

    pub fn string() -> Self {
        Self::scalar(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::scalar(SchemaType::Integer)
    }

    pub fn number() -> Self {
        Self::scalar(SchemaType::Number)
    }

    pub fn boolean() -> Self {
        Self::scalar(SchemaType::Boolean)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::scalar(SchemaType::Array)
        }
    }

    /// Object whose listed properties are all required. Property order is
    /// kept in `propertyOrdering` so the model emits keys in that order.
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Schema)>) -> Self {
        let mut properties = BTreeMap::new();
        let mut ordering = Vec::new();
        for (name, schema) in fields {
            ordering.push(name.to_string());
            properties.insert(name.to_string(), schema);
        }

        Self {
            properties: Some(properties),
            required: Some(ordering.clone()),
            property_ordering: Some(ordering),
            ..Self::scalar(SchemaType::Object)
        }
    }

    /// Array of strings, the most common leaf in the domain schemas.
    pub fn strings() -> Self {
        Self::array(Self::string())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Verify that `value` has the shape this schema describes.
    ///
    /// Required keys must be present and every node must have the declared
    /// type. Keys the schema does not declare are tolerated. On mismatch the
    /// error names the offending JSON path.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        self.check_at("$", value)
    }

    fn check_at(&self, path: &str, value: &Value) -> Result<(), String> {
        let type_ok = match self.schema_type {
            SchemaType::String => value.is_string(),
            SchemaType::Integer => value.is_i64(),
            SchemaType::Number => value.is_number(),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Array => value.is_array(),
            SchemaType::Object => value.is_object(),
        };
        if !type_ok {
            return Err(format!(
                "{} should be {:?}, got {}",
                path,
                self.schema_type,
                json_kind(value)
            ));
        }

        match value {
            Value::Object(map) => {
                for key in self.required.iter().flatten() {
                    if !map.contains_key(key) {
                        return Err(format!("{} is missing required property '{}'", path, key));
                    }
                }
                for (key, schema) in self.properties.iter().flatten() {
                    if let Some(child) = map.get(key) {
                        schema.check_at(&format!("{}.{}", path, key), child)?;
                    }
                }
            }
            Value::Array(items) => {
                if let Some(item_schema) = &self.items {
                    for (index, item) in items.iter().enumerate() {
                        item_schema.check_at(&format!("{}[{}]", path, index), item)?;
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
