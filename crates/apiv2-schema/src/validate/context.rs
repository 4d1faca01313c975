//! Validation context and output types
//!
//! `ValidationContext` manages state during validation:
//! - Schema reference
//! - Current path for error reporting
//! - Accumulated errors
//! - Nesting depth guard for self-referential schemas

use std::cell::RefCell;

use crate::SchemaDocument;
use crate::path::{JsonPath, PathSegment};

use super::error::ValidationError;

/// Upper bound on nested schema applications for a single value.
pub const MAX_DEPTH: usize = 128;

// =============================================================================
// ValidationOutput (final result for public API)
// =============================================================================

/// Final validation output returned to callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutput {
    /// No violations
    pub is_valid: bool,
    /// Violations in the order they were found
    pub errors: Vec<ValidationError>,
}

// =============================================================================
// ValidationState (internal mutable state)
// =============================================================================

/// Internal mutable state during validation.
#[derive(Debug, Default)]
pub struct ValidationState {
    /// Current path in the document (for error reporting)
    pub path: JsonPath,
    /// Nested schema applications on the current branch
    pub depth: usize,
    /// Accumulated validation errors
    pub errors: Vec<ValidationError>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error (validation continues).
    pub fn record_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn push_path_key(&mut self, key: &str) {
        self.path.0.push(PathSegment::Key(key.to_string()));
    }

    pub fn push_path_index(&mut self, index: usize) {
        self.path.0.push(PathSegment::Index(index));
    }

    pub fn pop_path(&mut self) {
        self.path.0.pop();
    }

    /// Clone for fork (trial validation).
    pub fn fork(&self) -> Self {
        Self {
            path: self.path.clone(),
            depth: self.depth,
            errors: Vec::new(),
        }
    }

    /// Consume and produce final output.
    pub fn finish(self) -> ValidationOutput {
        ValidationOutput {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
        }
    }
}

// =============================================================================
// ValidationContext (shared immutable + RefCell for state)
// =============================================================================

/// Validation context combining schema reference and mutable state.
///
/// Uses interior mutability so validators can record errors through a shared
/// reference while recursing.
pub struct ValidationContext<'s> {
    pub schema: &'s SchemaDocument,
    pub state: RefCell<ValidationState>,
}

impl<'s> ValidationContext<'s> {
    pub fn new(schema: &'s SchemaDocument) -> Self {
        Self::with_state(schema, ValidationState::new())
    }

    /// Create a context with existing state (for trial branches).
    pub fn with_state(schema: &'s SchemaDocument, state: ValidationState) -> Self {
        Self {
            schema,
            state: RefCell::new(state),
        }
    }

    pub fn record_error(&self, error: ValidationError) {
        self.state.borrow_mut().record_error(error);
    }

    /// Get a clone of the current path.
    pub fn path(&self) -> JsonPath {
        self.state.borrow().path.clone()
    }

    pub fn push_path_key(&self, key: &str) {
        self.state.borrow_mut().push_path_key(key);
    }

    pub fn push_path_index(&self, index: usize) {
        self.state.borrow_mut().push_path_index(index);
    }

    pub fn pop_path(&self) {
        self.state.borrow_mut().pop_path();
    }

    /// Enter a nested schema application. Returns `false` once
    /// [`MAX_DEPTH`] is reached; the caller must not call [`Self::leave`]
    /// in that case.
    pub fn enter(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.depth >= MAX_DEPTH {
            return false;
        }
        state.depth += 1;
        true
    }

    pub fn leave(&self) {
        let mut state = self.state.borrow_mut();
        state.depth = state.depth.saturating_sub(1);
    }

    /// Fork for trial validation (returns forked state).
    pub fn fork_state(&self) -> ValidationState {
        self.state.borrow().fork()
    }

    pub fn into_state(self) -> ValidationState {
        self.state.into_inner()
    }

    /// Consume context and produce final output.
    pub fn finish(self) -> ValidationOutput {
        self.into_state().finish()
    }
}
