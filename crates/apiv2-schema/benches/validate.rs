//! Benchmarks for query schema compilation and validation.
//!
//! Run with: cargo bench -p apiv2-schema

use std::hint::black_box;

use apiv2_schema::{SchemaDocument, query_schema, query_schema_json, validate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

// =============================================================================
// Test Data
// =============================================================================

/// Small input: required fields only
fn small_input() -> Value {
    json!({
        "site_id": "dummy.site",
        "metrics": ["visitors"],
        "date_range": "30d"
    })
}

/// Medium input: every top-level field
fn medium_input() -> Value {
    json!({
        "site_id": "dummy.site",
        "metrics": ["visitors", "pageviews", "bounce_rate"],
        "date_range": ["2024-01-01", "2024-01-31"],
        "dimensions": ["visit:country", "event:props:author"],
        "filters": [
            ["is", "event:goal", ["Signup"]],
            ["contains", "event:page", ["/blog"]]
        ],
        "order_by": [["visitors", "desc"]],
        "include": {"imports": true}
    })
}

/// Large input: many filters, half of them invalid
fn large_input() -> Value {
    let filters: Vec<Value> = (0..100)
        .map(|i| {
            let operation = if i % 2 == 0 { "is" } else { "is_not" };
            json!([operation, "event:goal", [format!("Goal {i}")]])
        })
        .collect();
    json!({
        "site_id": "dummy.site",
        "metrics": ["visitors", "conversion_rate"],
        "date_range": "12mo",
        "filters": filters
    })
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_query_schema", |b| {
        b.iter(|| SchemaDocument::from_json(black_box(query_schema_json())))
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let schema = query_schema().expect("query schema should compile");

    for (name, input) in [
        ("small", small_input()),
        ("medium", medium_input()),
        ("large", large_input()),
    ] {
        group.bench_with_input(BenchmarkId::new("query", name), &input, |b, input| {
            b.iter(|| validate(black_box(input), black_box(&schema)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_validate);
criterion_main!(benches);
