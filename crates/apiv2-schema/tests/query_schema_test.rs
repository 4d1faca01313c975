//! Tests for the embedded query schema

use apiv2_schema::{JsonPath, ValidationError, ValidationOutput, validate_query};
use serde_json::{Value, json};

fn check(document: Value) -> ValidationOutput {
    validate_query(&document).expect("query schema should compile")
}

/// Minimal valid document with `field` replaced by `value`.
fn with_field(field: &str, value: Value) -> Value {
    let mut document = json!({
        "site_id": "dummy.site",
        "metrics": ["visitors"],
        "date_range": "30d"
    });
    document[field] = value;
    document
}

fn assert_valid(document: Value) {
    let output = check(document.clone());
    assert!(
        output.is_valid,
        "expected {document} to be valid, got {:#?}",
        output.errors
    );
}

fn assert_invalid_at(document: Value, path: &str) {
    let output = check(document.clone());
    assert!(!output.is_valid, "expected {document} to be invalid");
    assert!(
        output.errors.iter().any(|e| e.path().to_string() == path),
        "expected an error at {path}, got {:#?}",
        output.errors
    );
}

#[test]
fn test_minimal_document_is_valid() {
    assert_valid(json!({
        "site_id": "dummy.site",
        "metrics": ["visitors"],
        "date_range": "30d"
    }));
}

#[test]
fn test_required_properties() {
    for missing in ["site_id", "metrics", "date_range"] {
        let mut document = with_field("site_id", json!("dummy.site"));
        document.as_object_mut().unwrap().remove(missing);

        let output = check(document);
        assert_eq!(
            output.errors,
            vec![ValidationError::MissingRequiredProperty {
                property: missing.to_string(),
                path: JsonPath::root(),
                schema_node_id: apiv2_schema::SchemaNodeId(0),
            }],
            "removing {missing}"
        );
    }
}

#[test]
fn test_top_level_is_closed() {
    let output = check(with_field("limit", json!(10)));
    assert_eq!(output.errors.len(), 1);
    assert!(matches!(
        &output.errors[0],
        ValidationError::AdditionalPropertyNotAllowed { property, path, .. }
            if property == "limit" && path.to_string() == "limit"
    ));
}

#[test]
fn test_include_is_open() {
    assert_valid(with_field(
        "include",
        json!({"time_labels": true, "imports": false, "total_rows": true}),
    ));
    assert_invalid_at(
        with_field("include", json!({"imports": "yes"})),
        "include.imports",
    );
}

#[test]
fn test_date_range_presets() {
    for preset in ["all", "day", "7d", "30d", "month", "6mo", "12mo", "year"] {
        assert_valid(with_field("date_range", json!(preset)));
    }
    assert_invalid_at(with_field("date_range", json!("31d")), "date_range");
}

#[test]
fn test_invalid_preset_lists_accepted_values() {
    let output = check(with_field("date_range", json!("31d")));
    assert_eq!(output.errors.len(), 1);
    match &output.errors[0] {
        ValidationError::NoVariantMatched { accepted, .. } => {
            assert_eq!(accepted.len(), 8);
            assert!(accepted.contains(&json!("30d")));
        }
        other => panic!("Expected NoVariantMatched, got {other:?}"),
    }
}

#[test]
fn test_custom_date_range() {
    assert_valid(with_field("date_range", json!(["2024-01-01", "2024-01-31"])));

    // Exactly two dates
    assert_invalid_at(with_field("date_range", json!(["2024-01-01"])), "date_range");
    assert_invalid_at(
        with_field(
            "date_range",
            json!(["2024-01-01", "2024-01-31", "2024-02-28"]),
        ),
        "date_range",
    );

    // Both dates in YYYY-MM-DD
    assert_invalid_at(
        with_field("date_range", json!(["2024/01/01", "2024-01-31"])),
        "date_range",
    );
    assert_invalid_at(
        with_field("date_range", json!(["2024-01-01", "24-1-31"])),
        "date_range",
    );
}

#[test]
fn test_custom_date_range_digits_are_ascii() {
    // Arabic-Indic digits are not `\d`
    assert_invalid_at(
        with_field(
            "date_range",
            json!(["\u{662}\u{660}\u{662}\u{664}-\u{660}\u{661}-\u{660}\u{661}", "2024-01-31"]),
        ),
        "date_range",
    );
    assert_invalid_at(
        with_field(
            "date_range",
            json!(["2024-01-01", "\u{ff12}\u{ff10}\u{ff12}\u{ff14}-01-31"]),
        ),
        "date_range",
    );
}

#[test]
fn test_custom_date_range_reports_closest_branch() {
    let output = check(with_field("date_range", json!(["2024-01-01"])));
    match &output.errors[0] {
        ValidationError::NoVariantMatched {
            best_match: Some(best),
            accepted,
            ..
        } => {
            assert_eq!(best.variant_index, 8);
            assert!(matches!(
                *best.error,
                ValidationError::ArrayLengthOutOfBounds { length: 1, .. }
            ));
            assert!(accepted.is_empty());
        }
        other => panic!("Expected NoVariantMatched with a best match, got {other:?}"),
    }
}

#[test]
fn test_metrics() {
    assert_valid(with_field(
        "metrics",
        json!([
            "visitors",
            "visits",
            "pageviews",
            "views_per_visit",
            "bounce_rate",
            "visit_duration",
            "events",
            "percentage",
            "conversion_rate",
            "group_conversion_rate"
        ]),
    ));
    assert_invalid_at(with_field("metrics", json!(["visitors", "clicks"])), "metrics[1]");
    assert_invalid_at(with_field("metrics", json!("visitors")), "metrics");
}

#[test]
fn test_dimensions() {
    assert_valid(with_field(
        "dimensions",
        json!(["visit:country", "event:props:url", "event:goal"]),
    ));
    assert_invalid_at(
        with_field("dimensions", json!(["event:propz:url"])),
        "dimensions[0]",
    );
}

#[test]
fn test_time_dimensions_are_not_dimensions() {
    // `time_dimensions` is defined but never referenced
    assert_invalid_at(with_field("dimensions", json!(["time:day"])), "dimensions[0]");
}

#[test]
fn test_filter_operations() {
    assert_valid(with_field(
        "filters",
        json!([
            ["is_not", "visit:country", ["DE"]],
            ["is", "visit:country", ["EE", "FR"]],
            ["contains", "event:page", ["/blog"]],
            ["does_not_contain", "event:props:url", ["example"]],
            ["is", "event:goal", ["Signup"]]
        ]),
    ));
}

#[test]
fn test_goal_filter_requires_is() {
    assert_invalid_at(
        with_field("filters", json!([["is_not", "event:goal", ["Signup"]]])),
        "filters[0]",
    );
    assert_invalid_at(
        with_field("filters", json!([["contains", "event:goal", ["Sign"]]])),
        "filters[0]",
    );
}

#[test]
fn test_filter_arity() {
    assert_invalid_at(
        with_field("filters", json!([["is", "visit:country"]])),
        "filters[0]",
    );
    assert_invalid_at(
        with_field("filters", json!([["is", "visit:country", ["DE"], "extra"]])),
        "filters[0]",
    );
}

#[test]
fn test_filter_clauses_are_strings() {
    assert_invalid_at(
        with_field("filters", json!([["is", "visit:country", [1]]])),
        "filters[0]",
    );
}

#[test]
fn test_filter_custom_property() {
    assert_valid(with_field(
        "filters",
        json!([["is", "event:props:url", ["/pricing"]]]),
    ));
    assert_invalid_at(
        with_field("filters", json!([["is", "event:propz:url", ["/pricing"]]])),
        "filters[0]",
    );
}

#[test]
fn test_order_by() {
    assert_valid(with_field("order_by", json!([["visitors", "desc"]])));
    assert_valid(with_field(
        "order_by",
        json!([["visit:country", "asc"], ["event:props:author", "desc"]]),
    ));
    assert_invalid_at(
        with_field("order_by", json!([["visitors", "sideways"]])),
        "order_by[0][1]",
    );
    assert_invalid_at(
        with_field("order_by", json!([["event:goal", "asc"]])),
        "order_by[0][0]",
    );
}

#[test]
fn test_order_by_entry_length_is_not_fixed() {
    // The grammar gives positional items without a length bound
    assert_valid(with_field("order_by", json!([["visitors"]])));
    assert_valid(with_field("order_by", json!([["visitors", "desc", "extra"]])));
}

#[test]
fn test_every_violation_is_reported() {
    let output = check(json!({
        "metrics": ["clicks"],
        "date_range": "31d",
        "limit": 10
    }));
    let paths: Vec<String> = output.errors.iter().map(|e| e.path().to_string()).collect();
    assert_eq!(paths, ["(root)", "metrics[0]", "date_range", "limit"]);
}

#[test]
fn test_error_messages() {
    let output = check(with_field("date_range", json!("31d")));
    let message = output.errors[0].to_string();
    assert!(message.starts_with("Value is not accepted. Valid values:"), "{message}");
    assert!(message.ends_with("at path date_range"), "{message}");
}
