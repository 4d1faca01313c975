//! Stats API v2 query schema and validation
//!
//! This library provides a JSON Schema (Draft-07) model, a compiler into a
//! node arena and a validator that accumulates every violation with its
//! location. The query schema of the Stats API v2 is embedded, together with
//! a typed model of query documents.
//!
//! # Example
//!
//! ```
//! use apiv2_schema::validate_query;
//! use serde_json::json;
//!
//! let output = validate_query(&json!({
//!     "site_id": "dummy.site",
//!     "metrics": ["visitors"],
//!     "date_range": "31d"
//! }))
//! .unwrap();
//! assert!(!output.is_valid);
//! ```

// The embedded query schema is a large `json!` literal
#![recursion_limit = "256"]

mod document;
mod error;
pub mod json_schema;
pub mod model;
pub mod path;
pub mod query;
pub mod validate;

pub use document::{
    AdditionalProperties, ArrayItems, ArraySchema, KeywordSchema, NumberSchema, ObjectSchema,
    Pattern, SchemaDocument, SchemaNode, SchemaNodeContent, SchemaNodeId, StringSchema,
    TypeReference,
};
pub use error::SchemaError;
pub use json_schema::{JsonSchema, SchemaMetadata};
pub use model::{
    DateRange, Dimension, Direction, Filter, FilterOperation, Include, Metric, OrderBy, OrderKey,
    QueryDocument, QueryError, SimpleDimension, parse_query,
};
pub use path::{JsonPath, PathSegment};
pub use query::{
    QUERY_SCHEMA_FILE_MATCH, QUERY_SCHEMA_URI, compiled_query_schema, query_schema,
    query_schema_json, validate_query,
};
pub use validate::{ValidationError, ValidationOutput, validate, validate_node};
