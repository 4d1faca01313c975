//! Array validator
//!
//! Handles `items` in both forms (one schema for every element, or
//! positional tuple schemas with `additionalItems`), length bounds and
//! `uniqueItems`.

use serde_json::Value;

use crate::{ArrayItems, ArraySchema, SchemaNodeId};

use super::SchemaValidator;
use super::context::ValidationContext;
use super::error::ValidationError;
use super::primitive::json_equal;

// =============================================================================
// ArrayValidator
// =============================================================================

/// Validates array values against ArraySchema constraints.
pub struct ArrayValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'s ArraySchema,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> ArrayValidator<'a, 's> {
    pub fn validate(&self, items: &[Value]) {
        let len = items.len();

        let too_short = self.schema.min_items.is_some_and(|min| len < min as usize);
        let too_long = self.schema.max_items.is_some_and(|max| len > max as usize);
        if too_short || too_long {
            self.ctx.record_error(ValidationError::ArrayLengthOutOfBounds {
                length: len,
                min: self.schema.min_items,
                max: self.schema.max_items,
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
        }

        match &self.schema.items {
            ArrayItems::Any => {}
            ArrayItems::Single(item_schema) => {
                for (i, item) in items.iter().enumerate() {
                    self.validate_item(i, item, *item_schema);
                }
            }
            ArrayItems::Tuple { prefix, additional } => {
                for (i, item) in items.iter().enumerate() {
                    if let Some(item_schema) = prefix.get(i).copied().or(*additional) {
                        self.validate_item(i, item, item_schema);
                    }
                }
            }
        }

        if self.schema.unique {
            self.validate_unique(items);
        }
    }

    fn validate_item(&self, index: usize, item: &Value, item_schema: SchemaNodeId) {
        self.ctx.push_path_index(index);
        SchemaValidator {
            ctx: self.ctx,
            schema_node_id: item_schema,
        }
        .validate(item);
        self.ctx.pop_path();
    }

    fn validate_unique(&self, items: &[Value]) {
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if json_equal(&items[i], &items[j]) {
                    self.ctx.record_error(ValidationError::ArrayNotUnique {
                        path: self.ctx.path(),
                        schema_node_id: self.schema_node_id,
                    });
                    return;
                }
            }
        }
    }
}
