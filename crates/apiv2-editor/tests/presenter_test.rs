//! Tests for mounting examples and reacting to content changes

use std::cell::Cell;

use apiv2_editor::{
    DiagnosticSeverity, DiagnosticsOptions, EditorError, EditorSurface, ExamplePresenter,
    ExampleTable, PresenterConfig, SchemaAssociation,
};
use serde_json::json;

/// Surface whose content height is set by the test.
struct FakeSurface {
    height: Cell<u32>,
}

impl FakeSurface {
    fn new() -> Self {
        FakeSurface {
            height: Cell::new(0),
        }
    }

    fn resize(&self, height: u32) -> &Self {
        self.height.set(height);
        self
    }
}

impl EditorSurface for FakeSurface {
    fn content_height(&self) -> u32 {
        self.height.get()
    }
}

fn mount(request: &str) -> ExamplePresenter {
    ExamplePresenter::mount(request, &ExampleTable::builtin(), PresenterConfig::default())
        .expect("builtin example should mount")
}

#[test]
fn test_mounted_text_is_pretty_printed_example() {
    let presenter = mount("custom-date-range");
    let expected = r#"{
  "site_id": "dummy.site",
  "metrics": [
    "visitors",
    "pageviews"
  ],
  "date_range": [
    "2024-01-01",
    "2024-07-01"
  ]
}"#;
    assert_eq!(presenter.text(), expected);
}

#[test]
fn test_every_example_mounts_as_pretty_json() {
    let examples = ExampleTable::builtin();
    for (request, example) in examples.iter() {
        let presenter =
            ExamplePresenter::mount(request, &examples, PresenterConfig::default()).unwrap();
        assert_eq!(
            presenter.text(),
            serde_json::to_string_pretty(example).unwrap()
        );
        assert!(presenter.diagnostics().is_empty(), "example {request}");
    }
}

#[test]
fn test_initial_height_is_baseline() {
    let presenter = mount("filters");
    assert_eq!(presenter.height(), 170);
    assert_eq!(presenter.request(), "filters");
}

#[test]
fn test_height_grows_and_never_shrinks() {
    let mut presenter = mount("filters");
    let surface = FakeSurface::new();

    let mut last = 0;
    for content_height in [100, 250, 180] {
        last = presenter.handle_content_change(surface.resize(content_height));
    }
    assert_eq!(last, 250);
    assert_eq!(presenter.height(), 250);
}

#[test]
fn test_smaller_content_keeps_baseline() {
    let mut presenter = mount("filters");
    let surface = FakeSurface::new();
    assert_eq!(presenter.handle_content_change(surface.resize(19)), 170);
}

#[test]
fn test_unknown_example_is_an_error() {
    let result = ExamplePresenter::mount(
        "no-such-example",
        &ExampleTable::builtin(),
        PresenterConfig::default(),
    );
    assert!(matches!(
        result,
        Err(EditorError::UnknownExample { ref request, .. }) if request == "no-such-example"
    ));
}

#[test]
fn test_edits_are_validated() {
    let mut presenter = mount("custom-date-range");
    presenter.set_text(
        r#"{
  "site_id": "dummy.site",
  "metrics": ["visitors"],
  "date_range": ["2024-01-01"]
}"#,
    );

    let diagnostics = presenter.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
    assert_eq!(
        &presenter.text()[diagnostic.start..diagnostic.end],
        "[\"2024-01-01\"]"
    );
    assert!(
        diagnostic.message.contains("expected exactly 2"),
        "{}",
        diagnostic.message
    );
}

#[test]
fn test_syntax_errors_are_reported() {
    let mut presenter = mount("filters");
    presenter.set_text("{\"site_id\": \"dummy.site\",}");
    let diagnostics = presenter.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("trailing comma"));
}

#[test]
fn test_validation_can_be_disabled() {
    let config = PresenterConfig {
        diagnostics: DiagnosticsOptions {
            validate: false,
            ..DiagnosticsOptions::default()
        },
        ..PresenterConfig::default()
    };
    let mut presenter =
        ExamplePresenter::mount("filters", &ExampleTable::builtin(), config).unwrap();
    presenter.set_text("not json");
    assert!(presenter.diagnostics().is_empty());
}

#[test]
fn test_schema_only_applies_to_matching_models() {
    let config = PresenterConfig {
        diagnostics: DiagnosticsOptions {
            validate: true,
            schemas: vec![SchemaAssociation {
                file_match: vec!["file:///*.json".to_string()],
                ..SchemaAssociation::query_schema()
            }],
        },
        ..PresenterConfig::default()
    };
    let mut presenter =
        ExamplePresenter::mount("filters", &ExampleTable::builtin(), config).unwrap();
    presenter.set_text(r#"{"anything": true}"#);
    assert!(presenter.diagnostics().is_empty());
}

#[test]
fn test_instances_do_not_share_schemas() {
    let examples = ExampleTable::builtin();
    let custom = PresenterConfig {
        diagnostics: DiagnosticsOptions {
            validate: true,
            schemas: vec![SchemaAssociation {
                uri: "http://example.com/named.json".to_string(),
                file_match: vec!["*".to_string()],
                schema: json!({"type": "object", "required": ["name"]}),
            }],
        },
        ..PresenterConfig::default()
    };

    let mut query = ExamplePresenter::mount("filters", &examples, PresenterConfig::default())
        .unwrap();
    let mut named = ExamplePresenter::mount("filters", &examples, custom).unwrap();

    // Valid query, but no `name`
    let text = r#"{"site_id": "dummy.site", "metrics": ["visitors"], "date_range": "7d"}"#;
    query.set_text(text);
    named.set_text(text);
    assert!(query.diagnostics().is_empty());
    assert_eq!(named.diagnostics().len(), 1);

    // A `name` only satisfies the custom schema
    let text = r#"{"name": "x"}"#;
    query.set_text(text);
    named.set_text(text);
    assert_eq!(query.diagnostics().len(), 4);
    assert!(named.diagnostics().is_empty());
}

#[test]
fn test_invalid_registered_schema_fails_mount() {
    let config = PresenterConfig {
        diagnostics: DiagnosticsOptions {
            validate: true,
            schemas: vec![SchemaAssociation {
                uri: "http://example.com/broken.json".to_string(),
                file_match: vec!["*".to_string()],
                schema: json!({"$ref": "#/definitions/missing"}),
            }],
        },
        ..PresenterConfig::default()
    };
    let result = ExamplePresenter::mount("filters", &ExampleTable::builtin(), config);
    assert!(matches!(result, Err(EditorError::Schema { .. })));
}

#[test]
fn test_mount_config_shape() {
    let mut presenter = mount("dimensions");
    presenter.handle_content_change(FakeSurface::new().resize(300));

    let value = serde_json::to_value(presenter.mount_config()).unwrap();
    assert_eq!(value["language"], json!("json"));
    assert_eq!(value["theme"], json!("vs-dark"));
    assert_eq!(value["height"], json!(300));
    assert_eq!(value["defaultValue"], json!(presenter.text()));
    assert_eq!(value["options"]["wordWrap"], json!("off"));
    assert_eq!(value["options"]["minimap"], json!({"enabled": false}));
    assert_eq!(value["diagnosticsOptions"]["validate"], json!(true));
    assert_eq!(
        value["diagnosticsOptions"]["schemas"][0]["fileMatch"],
        json!(["*"])
    );
}
