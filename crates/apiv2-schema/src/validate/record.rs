//! Object validator

use serde_json::{Map, Value};

use crate::{AdditionalProperties, ObjectSchema, SchemaNodeId};

use super::SchemaValidator;
use super::context::ValidationContext;
use super::error::ValidationError;

/// Validates object members against `properties`, `required` and
/// `additionalProperties`.
pub struct RecordValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub schema: &'s ObjectSchema,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> RecordValidator<'a, 's> {
    pub fn validate(&self, members: &Map<String, Value>) {
        for property in &self.schema.required {
            if !members.contains_key(property) {
                self.ctx.record_error(ValidationError::MissingRequiredProperty {
                    property: property.clone(),
                    path: self.ctx.path(),
                    schema_node_id: self.schema_node_id,
                });
            }
        }

        for (key, member) in members {
            let member_schema = match self.schema.properties.get(key) {
                Some(&id) => id,
                None => match self.schema.additional {
                    AdditionalProperties::Allow => continue,
                    AdditionalProperties::Deny => {
                        self.ctx.push_path_key(key);
                        self.ctx
                            .record_error(ValidationError::AdditionalPropertyNotAllowed {
                                property: key.clone(),
                                path: self.ctx.path(),
                                schema_node_id: self.schema_node_id,
                            });
                        self.ctx.pop_path();
                        continue;
                    }
                    AdditionalProperties::Schema(id) => id,
                },
            };

            self.ctx.push_path_key(key);
            SchemaValidator {
                ctx: self.ctx,
                schema_node_id: member_schema,
            }
            .validate(member);
            self.ctx.pop_path();
        }
    }
}
