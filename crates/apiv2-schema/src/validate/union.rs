//! Union validators
//!
//! `oneOf` needs exactly one matching branch, `anyOf` at least one. Each
//! branch is tried on a forked state so a failed branch leaves no errors
//! behind; when nothing matches the closest branch is reported.

use serde_json::Value;
use tracing::trace;

use crate::SchemaNodeId;

use super::SchemaValidator;
use super::context::ValidationContext;
use super::error::{BestVariantMatch, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionMode {
    OneOf,
    AnyOf,
}

/// Validates a value against the branches of a `oneOf` or `anyOf`.
pub struct UnionValidator<'a, 's> {
    pub ctx: &'a ValidationContext<'s>,
    pub branches: &'s [SchemaNodeId],
    pub mode: UnionMode,
    pub schema_node_id: SchemaNodeId,
}

impl<'a, 's> UnionValidator<'a, 's> {
    pub fn validate(&self, value: &Value) {
        let mut matched = Vec::new();
        let mut failed = Vec::new();

        for (index, &branch) in self.branches.iter().enumerate() {
            let errors = try_branch(self.ctx, branch, value);
            trace!(
                path = %self.ctx.path(),
                branch = index,
                errors = errors.len(),
                "union branch attempt"
            );
            if errors.is_empty() {
                matched.push(index);
                if self.mode == UnionMode::AnyOf {
                    return;
                }
            } else {
                failed.push((index, errors));
            }
        }

        match matched.len() {
            1 => {}
            0 => self.record_no_match(failed),
            _ => self.ctx.record_error(ValidationError::AmbiguousVariants {
                path: self.ctx.path(),
                variants: matched,
                schema_node_id: self.schema_node_id,
            }),
        }
    }

    fn record_no_match(&self, failed: Vec<(usize, Vec<ValidationError>)>) {
        let path = self.ctx.path();
        let best_match = select_best_variant_match(failed);

        // Only list literals when no branch got past the value's shape
        let shallow = best_match.as_ref().is_some_and(|best| {
            best.all_errors
                .iter()
                .all(|e| e.is_shape_mismatch() && e.path().len() == path.len())
        });
        let accepted = if shallow {
            self.accepted_literals()
        } else {
            Vec::new()
        };

        self.ctx.record_error(ValidationError::NoVariantMatched {
            path,
            best_match: best_match.map(Box::new),
            accepted,
            schema_node_id: self.schema_node_id,
        });
    }

    fn accepted_literals(&self) -> Vec<Value> {
        self.branches
            .iter()
            .filter_map(|&branch| self.ctx.schema.literal_values(branch))
            .flatten()
            .collect()
    }
}

/// Validate `value` against `schema_node_id` on a forked state and return
/// the errors the attempt produced.
pub fn try_branch(
    ctx: &ValidationContext<'_>,
    schema_node_id: SchemaNodeId,
    value: &Value,
) -> Vec<ValidationError> {
    let trial_ctx = ValidationContext::with_state(ctx.schema, ctx.fork_state());
    SchemaValidator {
        ctx: &trial_ctx,
        schema_node_id,
    }
    .validate(value);
    trial_ctx.into_state().errors
}

/// Pick the branch that came closest to matching.
///
/// See [`BestVariantMatch`] for the ordering.
pub fn select_best_variant_match(
    attempts: Vec<(usize, Vec<ValidationError>)>,
) -> Option<BestVariantMatch> {
    attempts
        .into_iter()
        .filter_map(|(variant_index, errors)| {
            let depth = errors.iter().map(|e| e.path().len()).max()?;
            let primary = errors.iter().find(|e| e.path().len() == depth)?.clone();
            Some(BestVariantMatch {
                variant_index,
                error: Box::new(primary),
                error_count: errors.len(),
                all_errors: errors,
                depth,
            })
        })
        .min_by(|a, b| {
            b.depth
                .cmp(&a.depth)
                .then(is_shape_only(a).cmp(&is_shape_only(b)))
                .then(a.error_count.cmp(&b.error_count))
                .then(a.variant_index.cmp(&b.variant_index))
        })
}

fn is_shape_only(candidate: &BestVariantMatch) -> bool {
    candidate.all_errors.iter().all(ValidationError::is_shape_mismatch)
}
