//! Document schema validation
//!
//! # Architecture
//!
//! - `SchemaValidator`: dispatches on `SchemaNodeContent` and applies every
//!   keyword group of a node
//! - Type validators: one per keyword group (type, const, enum, string,
//!   number, array, object, unions)
//! - `ValidationContext`: shared state (errors, path, nesting depth)
//!
//! Keywords that constrain one JSON type only apply to values of that type,
//! so `{"pattern": "^a"}` accepts `42`.
//!
//! # Error Handling
//!
//! Validation never fails: violations are accumulated as `ValidationError`
//! values and returned in `ValidationOutput`.

mod compound;
mod context;
mod error;
mod primitive;
mod record;
mod reference;
mod union;

pub use context::{MAX_DEPTH, ValidationContext, ValidationOutput, ValidationState};
pub use error::{BestVariantMatch, ValidationError};
pub use primitive::{json_equal, value_type_name};

use serde_json::Value;

use crate::{KeywordSchema, SchemaDocument, SchemaNodeContent, SchemaNodeId};

use compound::ArrayValidator;
use primitive::{EnumValidator, LiteralValidator, NumberValidator, TextValidator, TypeValidator};
use record::RecordValidator;
use reference::ReferenceValidator;
use union::{UnionMode, UnionValidator, try_branch};

// =============================================================================
// Public API
// =============================================================================

/// Validate a document against a schema.
///
/// # Example
///
/// ```
/// use apiv2_schema::{SchemaDocument, validate};
/// use serde_json::json;
///
/// let schema = SchemaDocument::from_json(&json!({"type": "string"})).unwrap();
/// let output = validate(&json!(42), &schema);
/// assert!(!output.is_valid);
/// for error in &output.errors {
///     println!("Error: {}", error);
/// }
/// ```
pub fn validate(value: &Value, schema: &SchemaDocument) -> ValidationOutput {
    validate_node(value, schema, schema.root)
}

/// Validate a value against a specific schema node.
pub fn validate_node(
    value: &Value,
    schema: &SchemaDocument,
    schema_id: SchemaNodeId,
) -> ValidationOutput {
    let ctx = ValidationContext::new(schema);
    SchemaValidator {
        ctx: &ctx,
        schema_node_id: schema_id,
    }
    .validate(value);
    ctx.finish()
}

// =============================================================================
// SchemaValidator (main dispatcher)
// =============================================================================

/// Main validator that dispatches to type-specific validators.
pub struct SchemaValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> SchemaValidator<'a, 's> {
    pub fn validate(&self, value: &Value) {
        if !self.ctx.enter() {
            self.ctx.record_error(ValidationError::RecursionLimit {
                path: self.ctx.path(),
                schema_node_id: self.schema_node_id,
            });
            return;
        }

        let schema: &'s SchemaDocument = self.ctx.schema;
        match &schema.node(self.schema_node_id).content {
            SchemaNodeContent::Any => {}
            SchemaNodeContent::Never => {
                self.ctx.record_error(ValidationError::FalseSchema {
                    path: self.ctx.path(),
                    schema_node_id: self.schema_node_id,
                });
            }
            SchemaNodeContent::Reference(type_ref) => {
                ReferenceValidator {
                    ctx: self.ctx,
                    type_ref,
                }
                .validate(value);
            }
            SchemaNodeContent::Keywords(keywords) => self.validate_keywords(keywords, value),
        }

        self.ctx.leave();
    }

    fn validate_keywords(&self, keywords: &'s KeywordSchema, value: &Value) {
        let schema_node_id = self.schema_node_id;
        let ctx = self.ctx;

        let type_matched = match &keywords.types {
            Some(types) => TypeValidator {
                ctx,
                types,
                schema_node_id,
            }
            .validate(value),
            None => true,
        };

        // A wrong type already says everything the literals would
        if type_matched {
            if let Some(expected) = &keywords.const_value {
                LiteralValidator {
                    ctx,
                    expected,
                    schema_node_id,
                }
                .validate(value);
            }
            if let Some(allowed) = &keywords.enum_values {
                EnumValidator {
                    ctx,
                    allowed,
                    schema_node_id,
                }
                .validate(value);
            }
        }

        match value {
            Value::String(text) => {
                if let Some(schema) = &keywords.string {
                    TextValidator {
                        ctx,
                        schema,
                        schema_node_id,
                    }
                    .validate(text);
                }
            }
            Value::Number(number) => {
                if let (Some(schema), Some(number)) = (&keywords.number, number.as_f64()) {
                    NumberValidator {
                        ctx,
                        schema,
                        schema_node_id,
                    }
                    .validate(number);
                }
            }
            Value::Array(items) => {
                if let Some(schema) = &keywords.array {
                    ArrayValidator {
                        ctx,
                        schema,
                        schema_node_id,
                    }
                    .validate(items);
                }
            }
            Value::Object(members) => {
                if let Some(schema) = &keywords.object {
                    RecordValidator {
                        ctx,
                        schema,
                        schema_node_id,
                    }
                    .validate(members);
                }
            }
            Value::Null | Value::Bool(_) => {}
        }

        for &branch in keywords.all_of.iter().flatten() {
            SchemaValidator {
                ctx,
                schema_node_id: branch,
            }
            .validate(value);
        }

        if let Some(branches) = &keywords.any_of {
            UnionValidator {
                ctx,
                branches,
                mode: UnionMode::AnyOf,
                schema_node_id,
            }
            .validate(value);
        }

        if let Some(branches) = &keywords.one_of {
            UnionValidator {
                ctx,
                branches,
                mode: UnionMode::OneOf,
                schema_node_id,
            }
            .validate(value);
        }

        if let Some(not) = keywords.not
            && try_branch(ctx, not, value).is_empty()
        {
            ctx.record_error(ValidationError::NotSchemaMatched {
                path: ctx.path(),
                schema_node_id,
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
