//! Example query documents shown in the editor

use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::error::{EditorError, Result};

/// Read-only mapping from request identifier to example document.
///
/// Iteration follows insertion order, and so does the member order of each
/// example when it is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleTable {
    examples: IndexMap<String, Value>,
}

impl ExampleTable {
    /// The examples of the Stats API v2 documentation.
    pub fn builtin() -> Self {
        let examples = [
            (
                "aggregate-metrics",
                json!({
                    "site_id": "dummy.site",
                    "metrics": [
                        "visitors",
                        "visits",
                        "pageviews",
                        "views_per_visit",
                        "bounce_rate",
                        "visit_duration"
                    ],
                    "date_range": "7d"
                }),
            ),
            (
                "custom-date-range",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["visitors", "pageviews"],
                    "date_range": ["2024-01-01", "2024-07-01"]
                }),
            ),
            (
                "dimensions",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["visitors", "percentage"],
                    "date_range": "30d",
                    "dimensions": ["visit:country", "visit:city"],
                    "order_by": [["visitors", "desc"]]
                }),
            ),
            (
                "filters",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["visitors", "bounce_rate"],
                    "date_range": "month",
                    "filters": [
                        ["is", "visit:utm_source", ["Twitter", "Facebook"]],
                        ["contains", "event:page", ["/blog"]],
                        ["is_not", "visit:country", ["DE"]]
                    ]
                }),
            ),
            (
                "custom-properties",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["visitors", "events"],
                    "date_range": "12mo",
                    "dimensions": ["event:props:author"],
                    "filters": [["is_not", "event:props:author", ["(none)"]]],
                    "order_by": [["events", "desc"], ["event:props:author", "asc"]]
                }),
            ),
            (
                "goal-conversions",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["visitors", "events", "conversion_rate"],
                    "date_range": "6mo",
                    "dimensions": ["event:goal"],
                    "filters": [["is", "event:goal", ["Signup", "Purchase"]]]
                }),
            ),
            (
                "group-conversion-rate",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["visitors", "group_conversion_rate"],
                    "date_range": "year",
                    "dimensions": ["visit:source", "event:goal"]
                }),
            ),
            (
                "imported-data",
                json!({
                    "site_id": "dummy.site",
                    "metrics": ["pageviews"],
                    "date_range": "all",
                    "dimensions": ["event:page"],
                    "order_by": [["pageviews", "desc"]],
                    "include": {"imports": true}
                }),
            ),
        ];

        ExampleTable {
            examples: examples
                .into_iter()
                .map(|(request, example)| (request.to_string(), example))
                .collect(),
        }
    }

    /// Build a table from an object of request identifier to example.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(members) => Ok(ExampleTable {
                examples: members.into_iter().collect(),
            }),
            other => Err(EditorError::InvalidExampleTable(format!(
                "expected an object of examples, got {}",
                apiv2_schema::validate::value_type_name(&other)
            ))),
        }
    }

    pub fn get(&self, request: &str) -> Option<&Value> {
        self.examples.get(request)
    }

    /// Like [`Self::get`], but reports the available identifiers.
    pub fn require(&self, request: &str) -> Result<&Value> {
        self.get(request).ok_or_else(|| EditorError::UnknownExample {
            request: request.to_string(),
            available: self.keys().map(str::to_string).collect(),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.examples.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.examples
            .iter()
            .map(|(request, example)| (request.as_str(), example))
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
