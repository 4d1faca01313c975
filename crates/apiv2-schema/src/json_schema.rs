//! JSON Schema representation as Rust ADT
//!
//! This module provides a serde model of the JSON Schema (Draft-07) keywords
//! understood by the validator. A schema is either a boolean schema or an
//! object carrying any combination of keywords; keywords this model does not
//! know are ignored on deserialization, as the JSON Schema specification
//! requires.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Common metadata fields for all schema types
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "markdownDescription",
        skip_serializing_if = "Option::is_none"
    )]
    pub markdown_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<serde_json::Value>>,
}

impl SchemaMetadata {
    /// The text shown to users: the markdown description when present,
    /// otherwise the plain description.
    pub fn display_description(&self) -> Option<&str> {
        self.markdown_description
            .as_deref()
            .or(self.description.as_deref())
    }
}

/// JSON Schema root type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonSchema {
    /// Boolean schema (true = allow all, false = deny all)
    Boolean(bool),

    /// Schema object with any combination of keywords
    Object(Box<SchemaObject>),
}

impl Default for JsonSchema {
    fn default() -> Self {
        JsonSchema::Boolean(true)
    }
}

impl From<SchemaObject> for JsonSchema {
    fn from(object: SchemaObject) -> Self {
        JsonSchema::Object(Box::new(object))
    }
}

/// JSON value types named by the `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl InstanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::Null => "null",
            InstanceType::Boolean => "boolean",
            InstanceType::Object => "object",
            InstanceType::Array => "array",
            InstanceType::Number => "number",
            InstanceType::String => "string",
            InstanceType::Integer => "integer",
        }
    }
}

impl core::fmt::Display for InstanceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"type": "string"` or `"type": ["string", "null"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
    Single(T),
    Vec(Vec<T>),
}

impl<T: Clone> SingleOrVec<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            SingleOrVec::Single(t) => vec![t.clone()],
            SingleOrVec::Vec(v) => v.clone(),
        }
    }
}

/// Array `items` keyword: one schema for every element, or one schema per
/// position (tuple validation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<JsonSchema>),
    Single(Box<JsonSchema>),
}

/// Schema object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaObject {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<SingleOrVec<InstanceType>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// `Some(Value::Null)` for `"const": null`
    #[serde(
        rename = "const",
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<serde_json::Value>,

    // Composition
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<JsonSchema>>,

    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<JsonSchema>>,

    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchema>>,

    // Object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<JsonSchema>>,

    // Array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(rename = "additionalItems", skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Box<JsonSchema>>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,

    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,

    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    // String
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    // Number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,

    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,

    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    // Definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, JsonSchema>>,

    #[serde(rename = "$defs", skip_serializing_if = "Option::is_none")]
    pub defs: Option<IndexMap<String, JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(flatten)]
    pub metadata: SchemaMetadata,
}

/// Distinguishes a present `null` from an absent field.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boolean_schema_true() {
        let schema: JsonSchema = serde_json::from_str("true").unwrap();
        assert_eq!(schema, JsonSchema::Boolean(true));
    }

    #[test]
    fn test_parse_boolean_schema_false() {
        let schema: JsonSchema = serde_json::from_str("false").unwrap();
        assert_eq!(schema, JsonSchema::Boolean(false));
    }

    #[test]
    fn test_parse_string_with_enum() {
        let json = r#"{"type": "string", "enum": ["asc", "desc"], "description": "Sorting order"}"#;
        let schema: JsonSchema = serde_json::from_str(json).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        assert_eq!(
            object.instance_type,
            Some(SingleOrVec::Single(InstanceType::String))
        );
        assert_eq!(object.enum_values.as_ref().map(Vec::len), Some(2));
        assert_eq!(object.metadata.description.as_deref(), Some("Sorting order"));
    }

    #[test]
    fn test_parse_const_null_is_present() {
        let schema: JsonSchema = serde_json::from_str(r#"{"const": null}"#).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        assert_eq!(object.const_value, Some(serde_json::Value::Null));
    }

    #[test]
    fn test_parse_missing_const_is_absent() {
        let schema: JsonSchema = serde_json::from_str(r#"{"type": "null"}"#).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        assert_eq!(object.const_value, None);
    }

    #[test]
    fn test_parse_tuple_items() {
        let json = r#"{
            "type": "array",
            "items": [{"type": "string"}, {"type": "number"}],
            "minItems": 2,
            "maxItems": 2
        }"#;
        let schema: JsonSchema = serde_json::from_str(json).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        match object.items {
            Some(Items::Tuple(items)) => assert_eq!(items.len(), 2),
            other => panic!("Expected tuple items, got {other:?}"),
        }
        assert_eq!(object.min_items, Some(2));
        assert_eq!(object.max_items, Some(2));
    }

    #[test]
    fn test_parse_single_items() {
        let json = r#"{"type": "array", "items": {"type": "string"}}"#;
        let schema: JsonSchema = serde_json::from_str(json).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        assert!(matches!(object.items, Some(Items::Single(_))));
    }

    #[test]
    fn test_parse_additional_properties_bool_and_schema() {
        let closed: JsonSchema =
            serde_json::from_str(r#"{"type": "object", "additionalProperties": false}"#).unwrap();
        let JsonSchema::Object(closed) = closed else {
            panic!("Expected Object");
        };
        assert_eq!(
            closed.additional_properties.as_deref(),
            Some(&JsonSchema::Boolean(false))
        );

        let typed: JsonSchema = serde_json::from_str(
            r#"{"type": "object", "additionalProperties": {"type": "string"}}"#,
        )
        .unwrap();
        let JsonSchema::Object(typed) = typed else {
            panic!("Expected Object");
        };
        assert!(matches!(
            typed.additional_properties.as_deref(),
            Some(JsonSchema::Object(_))
        ));
    }

    #[test]
    fn test_parse_markdown_description_and_examples() {
        let json = r#"{
            "type": "string",
            "pattern": "^event:props:",
            "markdownDescription": "Custom property",
            "examples": ["event:props:url", "event:props:path"]
        }"#;
        let schema: JsonSchema = serde_json::from_str(json).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        assert_eq!(object.metadata.display_description(), Some("Custom property"));
        assert_eq!(object.metadata.examples.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_unknown_keywords_are_ignored() {
        let json = r#"{"type": "string", "x-internal": true}"#;
        let schema: JsonSchema = serde_json::from_str(json).unwrap();
        assert!(matches!(schema, JsonSchema::Object(_)));
    }

    #[test]
    fn test_parse_type_list() {
        let schema: JsonSchema = serde_json::from_str(r#"{"type": ["string", "null"]}"#).unwrap();
        let JsonSchema::Object(object) = schema else {
            panic!("Expected Object");
        };
        assert_eq!(
            object.instance_type.map(|t| t.to_vec()),
            Some(vec![InstanceType::String, InstanceType::Null])
        );
    }

    #[test]
    fn test_roundtrip_reference_with_metadata() {
        let original = JsonSchema::from(SchemaObject {
            reference: Some("#/definitions/date_range".to_string()),
            metadata: SchemaMetadata {
                description: Some("Date range to query".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });

        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(
            json,
            r##"{"$ref":"#/definitions/date_range","description":"Date range to query"}"##
        );
        let deserialized: JsonSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }
}
