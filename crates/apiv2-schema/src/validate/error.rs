//! Validation error types
//!
//! `ValidationError` values are accumulated during validation; none of them
//! stops the walk over the document.

use serde_json::Value;
use thiserror::Error;

use crate::SchemaNodeId;
use crate::path::JsonPath;

// =============================================================================
// BestVariantMatch (for union error reporting)
// =============================================================================

/// Information about the closest branch of a failed `oneOf`/`anyOf`.
///
/// # Selection Criteria
///
/// 1. **Depth**: errors deeper in the structure mean the branch got further
/// 2. **Shape**: a branch that failed only because of the value's type or
///    literal is a weaker match than one that failed on a constraint
/// 3. **Error count**: fewer errors indicate a closer match
/// 4. **Order**: the earlier branch wins remaining ties
#[derive(Debug, Clone, PartialEq)]
pub struct BestVariantMatch {
    /// Position of the branch in the `oneOf`/`anyOf` list
    pub variant_index: usize,
    /// Primary error from this branch (may itself be a `NoVariantMatched`)
    pub error: Box<ValidationError>,
    /// All errors collected from this branch attempt
    pub all_errors: Vec<ValidationError>,
    /// Path length of the deepest error
    pub depth: usize,
    pub error_count: usize,
}

// =============================================================================
// ValidationError (accumulated violations)
// =============================================================================

/// Mismatches between a document and a schema.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Incorrect type: expected {expected}, got {actual} at path {path}")]
    TypeMismatch {
        expected: String,
        actual: String,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Missing required property '{property}' at path {path}")]
    MissingRequiredProperty {
        property: String,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    /// `path` points at the disallowed member itself.
    #[error("Property '{property}' is not allowed at path {path}")]
    AdditionalPropertyNotAllowed {
        property: String,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Value {value} is not one of {} at path {path}", format_values(allowed))]
    ValueNotInEnum {
        value: Value,
        allowed: Vec<Value>,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Value must be {expected} at path {path}")]
    ConstMismatch {
        expected: Value,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("String \"{value}\" does not match pattern '{pattern}' at path {path}")]
    PatternMismatch {
        value: String,
        pattern: String,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("String length {length} is out of bounds ({}) at path {path}", format_bounds(*min, *max))]
    StringLengthOutOfBounds {
        length: usize,
        min: Option<u32>,
        max: Option<u32>,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Array length {length} is out of bounds ({}) at path {path}", format_bounds(*min, *max))]
    ArrayLengthOutOfBounds {
        length: usize,
        min: Option<u32>,
        max: Option<u32>,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Array elements must be unique at path {path}")]
    ArrayNotUnique {
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Value {value} is out of range at path {path}")]
    NumberOutOfRange {
        value: f64,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Value {value} is not a multiple of {multiple_of} at path {path}")]
    NotMultipleOf {
        value: f64,
        multiple_of: f64,
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    /// No branch of a `oneOf`/`anyOf` matched.
    ///
    /// `accepted` lists the literal values of `const`/`enum` branches and is
    /// only filled when no branch came structurally closer than a plain
    /// literal mismatch.
    #[error("{}", format_no_variant_matched(path, best_match.as_deref(), accepted))]
    NoVariantMatched {
        path: JsonPath,
        best_match: Option<Box<BestVariantMatch>>,
        accepted: Vec<Value>,
        schema_node_id: SchemaNodeId,
    },

    #[error("Value matches more than one schema in oneOf (branches {variants:?}) at path {path}")]
    AmbiguousVariants {
        path: JsonPath,
        variants: Vec<usize>,
        schema_node_id: SchemaNodeId,
    },

    #[error("Value must not match the schema in 'not' at path {path}")]
    NotSchemaMatched {
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("No value is allowed at path {path}")]
    FalseSchema {
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },

    #[error("Schema nesting limit reached at path {path}")]
    RecursionLimit {
        path: JsonPath,
        schema_node_id: SchemaNodeId,
    },
}

impl ValidationError {
    /// Document path of the offending value.
    pub fn path(&self) -> &JsonPath {
        match self {
            ValidationError::TypeMismatch { path, .. }
            | ValidationError::MissingRequiredProperty { path, .. }
            | ValidationError::AdditionalPropertyNotAllowed { path, .. }
            | ValidationError::ValueNotInEnum { path, .. }
            | ValidationError::ConstMismatch { path, .. }
            | ValidationError::PatternMismatch { path, .. }
            | ValidationError::StringLengthOutOfBounds { path, .. }
            | ValidationError::ArrayLengthOutOfBounds { path, .. }
            | ValidationError::ArrayNotUnique { path, .. }
            | ValidationError::NumberOutOfRange { path, .. }
            | ValidationError::NotMultipleOf { path, .. }
            | ValidationError::NoVariantMatched { path, .. }
            | ValidationError::AmbiguousVariants { path, .. }
            | ValidationError::NotSchemaMatched { path, .. }
            | ValidationError::FalseSchema { path, .. }
            | ValidationError::RecursionLimit { path, .. } => path,
        }
    }

    /// Schema node that reported the violation.
    pub fn schema_node_id(&self) -> SchemaNodeId {
        match self {
            ValidationError::TypeMismatch { schema_node_id, .. }
            | ValidationError::MissingRequiredProperty { schema_node_id, .. }
            | ValidationError::AdditionalPropertyNotAllowed { schema_node_id, .. }
            | ValidationError::ValueNotInEnum { schema_node_id, .. }
            | ValidationError::ConstMismatch { schema_node_id, .. }
            | ValidationError::PatternMismatch { schema_node_id, .. }
            | ValidationError::StringLengthOutOfBounds { schema_node_id, .. }
            | ValidationError::ArrayLengthOutOfBounds { schema_node_id, .. }
            | ValidationError::ArrayNotUnique { schema_node_id, .. }
            | ValidationError::NumberOutOfRange { schema_node_id, .. }
            | ValidationError::NotMultipleOf { schema_node_id, .. }
            | ValidationError::NoVariantMatched { schema_node_id, .. }
            | ValidationError::AmbiguousVariants { schema_node_id, .. }
            | ValidationError::NotSchemaMatched { schema_node_id, .. }
            | ValidationError::FalseSchema { schema_node_id, .. }
            | ValidationError::RecursionLimit { schema_node_id, .. } => *schema_node_id,
        }
    }

    /// Whether the error only says the value has the wrong type or is the
    /// wrong literal, as opposed to violating a constraint of a matching shape.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            ValidationError::TypeMismatch { .. }
                | ValidationError::ValueNotInEnum { .. }
                | ValidationError::ConstMismatch { .. }
                | ValidationError::FalseSchema { .. }
        )
    }

    /// The message without the trailing path, for inline annotations.
    pub fn message(&self) -> String {
        let full = self.to_string();
        let suffix = format!(" at path {}", self.path());
        match full.strip_suffix(&suffix) {
            Some(message) => message.to_string(),
            None => full.replacen(&suffix, "", 1),
        }
    }
}

fn format_values(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

fn format_bounds(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min == max => format!("expected exactly {min}"),
        (Some(min), Some(max)) => format!("expected {min}..={max}"),
        (Some(min), None) => format!("expected at least {min}"),
        (None, Some(max)) => format!("expected at most {max}"),
        (None, None) => "unbounded".to_string(),
    }
}

fn format_no_variant_matched(
    path: &JsonPath,
    best_match: Option<&BestVariantMatch>,
    accepted: &[Value],
) -> String {
    if !accepted.is_empty() {
        let items: Vec<String> = accepted.iter().map(|v| v.to_string()).collect();
        return format!(
            "Value is not accepted. Valid values: {} at path {path}",
            items.join(", ")
        );
    }
    match best_match {
        Some(best) => format!(
            "No schema matched (closest: branch {}: {}) at path {path}",
            best.variant_index,
            best.error.message()
        ),
        None => format!("No schema matched at path {path}"),
    }
}
