//! Primitive type validators
//!
//! Validators for: type, const, enum, string and number constraints.

use serde_json::Value;

use crate::json_schema::InstanceType;
use crate::{NumberSchema, SchemaNodeId, StringSchema};

use super::context::ValidationContext;
use super::error::ValidationError;

// =============================================================================
// TypeValidator
// =============================================================================

/// Checks the `type` keyword. Returns whether the value matched.
pub struct TypeValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub types: &'s [InstanceType],
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> TypeValidator<'a, 's> {
    pub fn validate(&self, value: &Value) -> bool {
        if self.types.iter().any(|t| is_instance_of(value, *t)) {
            return true;
        }
        let expected: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
        self.ctx.record_error(ValidationError::TypeMismatch {
            expected: expected.join(" or "),
            actual: value_type_name(value).to_string(),
            path: self.ctx.path(),
            schema_node_id: self.schema_node_id,
        });
        false
    }
}

pub fn is_instance_of(value: &Value, instance_type: InstanceType) -> bool {
    match instance_type {
        InstanceType::Null => value.is_null(),
        InstanceType::Boolean => value.is_boolean(),
        InstanceType::Object => value.is_object(),
        InstanceType::Array => value.is_array(),
        InstanceType::Number => value.is_number(),
        InstanceType::String => value.is_string(),
        InstanceType::Integer => is_integer(value),
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// JSON type name of a value, as used in error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) if is_integer(value) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Structural equality with mathematical number comparison (`1 == 1.0`).
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

// =============================================================================
// LiteralValidator / EnumValidator
// =============================================================================

/// Checks the `const` keyword.
pub struct LiteralValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub expected: &'s Value,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> LiteralValidator<'a, 's> {
    pub fn validate(&self, value: &Value) {
        if !json_equal(value, self.expected) {
            self.ctx.record_error(ValidationError::ConstMismatch {
                expected: self.expected.clone(),
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
        }
    }
}

/// Checks the `enum` keyword.
pub struct EnumValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub allowed: &'s [Value],
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> EnumValidator<'a, 's> {
    pub fn validate(&self, value: &Value) {
        if !self.allowed.iter().any(|allowed| json_equal(value, allowed)) {
            self.ctx.record_error(ValidationError::ValueNotInEnum {
                value: value.clone(),
                allowed: self.allowed.to_vec(),
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
        }
    }
}

// =============================================================================
// TextValidator
// =============================================================================

/// Checks `minLength`, `maxLength` and `pattern` on strings.
pub struct TextValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'s StringSchema,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> TextValidator<'a, 's> {
    pub fn validate(&self, text: &str) {
        // Lengths count Unicode scalar values, not bytes
        let length = text.chars().count();
        let too_short = self.schema.min_length.is_some_and(|min| length < min as usize);
        let too_long = self.schema.max_length.is_some_and(|max| length > max as usize);
        if too_short || too_long {
            self.ctx.record_error(ValidationError::StringLengthOutOfBounds {
                length,
                min: self.schema.min_length,
                max: self.schema.max_length,
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
        }

        if let Some(pattern) = &self.schema.pattern
            && !pattern.is_match(text)
        {
            self.ctx.record_error(ValidationError::PatternMismatch {
                value: text.to_string(),
                pattern: pattern.source.clone(),
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
        }
    }
}

// =============================================================================
// NumberValidator
// =============================================================================

/// Checks numeric range and `multipleOf`.
pub struct NumberValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'s NumberSchema,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> NumberValidator<'a, 's> {
    pub fn validate(&self, value: f64) {
        let schema = self.schema;
        let out_of_range = schema.minimum.is_some_and(|min| value < min)
            || schema.maximum.is_some_and(|max| value > max)
            || schema.exclusive_minimum.is_some_and(|min| value <= min)
            || schema.exclusive_maximum.is_some_and(|max| value >= max);
        if out_of_range {
            self.ctx.record_error(ValidationError::NumberOutOfRange {
                value,
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
        }

        if let Some(multiple_of) = schema.multiple_of
            && multiple_of > 0.0
        {
            let quotient = value / multiple_of;
            if (quotient - quotient.round()).abs() > f64::EPSILON * quotient.abs().max(1.0) {
                self.ctx.record_error(ValidationError::NotMultipleOf {
                    value,
                    multiple_of,
                    path: self.ctx.path(),
                    schema_node_id: self.schema_node_id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_equal_numbers() {
        assert!(json_equal(&json!(1), &json!(1.0)));
        assert!(!json_equal(&json!(1), &json!(2)));
        assert!(json_equal(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!json_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_integer_instance() {
        assert!(is_instance_of(&json!(3), InstanceType::Integer));
        assert!(is_instance_of(&json!(3.0), InstanceType::Integer));
        assert!(!is_instance_of(&json!(3.5), InstanceType::Integer));
        assert!(is_instance_of(&json!(3.5), InstanceType::Number));
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!("x")), "string");
        assert_eq!(value_type_name(&json!(1)), "integer");
        assert_eq!(value_type_name(&json!(1.5)), "number");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
    }
}
