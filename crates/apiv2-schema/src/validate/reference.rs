//! Reference validator
//!
//! References are resolved at compile time; this validator only delegates.

use serde_json::Value;

use crate::TypeReference;

use super::SchemaValidator;
use super::context::ValidationContext;

/// Validates values against the schema a `$ref` points at.
pub struct ReferenceValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub type_ref: &'s TypeReference,
}

impl<'a, 's> ReferenceValidator<'a, 's> {
    pub fn validate(&self, value: &Value) {
        SchemaValidator {
            ctx: self.ctx,
            schema_node_id: self.type_ref.target,
        }
        .validate(value);
    }
}
