//! Editor widget options and presenter configuration
//!
//! Field names serialize in the camelCase form the editor widget expects,
//! so [`EditorOptions`] and [`DiagnosticsOptions`] can be handed over as is.

use apiv2_schema::{QUERY_SCHEMA_FILE_MATCH, QUERY_SCHEMA_URI, query_schema_json};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EditorError, Result};

// =============================================================================
// EditorOptions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    pub minimap: MinimapOptions,
    pub automatic_layout: bool,
    pub fixed_overflow_widgets: bool,
    pub glyph_margin: bool,
    pub word_wrap: WordWrap,
    pub line_numbers: LineNumbers,
    pub tab_focus_mode: bool,
    pub overview_ruler_lanes: u32,
    pub hide_cursor_in_overview_ruler: bool,
    pub scroll_beyond_last_line: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            minimap: MinimapOptions::default(),
            automatic_layout: true,
            fixed_overflow_widgets: true,
            glyph_margin: false,
            word_wrap: WordWrap::Off,
            line_numbers: LineNumbers::On,
            tab_focus_mode: false,
            overview_ruler_lanes: 0,
            hide_cursor_in_overview_ruler: false,
            scroll_beyond_last_line: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapOptions {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordWrap {
    #[default]
    Off,
    On,
    WordWrapColumn,
    Bounded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineNumbers {
    #[default]
    On,
    Off,
    Relative,
    Interval,
}

// =============================================================================
// DiagnosticsOptions
// =============================================================================

/// Schema registration for the widget's JSON language service.
///
/// Each presenter owns its own registration; nothing is shared between
/// instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsOptions {
    pub validate: bool,
    pub schemas: Vec<SchemaAssociation>,
}

impl Default for DiagnosticsOptions {
    fn default() -> Self {
        DiagnosticsOptions {
            validate: true,
            schemas: vec![SchemaAssociation::query_schema()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAssociation {
    pub uri: String,
    /// Glob patterns over model URIs
    pub file_match: Vec<String>,
    pub schema: Value,
}

impl SchemaAssociation {
    /// The embedded query schema, applied to every model.
    pub fn query_schema() -> Self {
        SchemaAssociation {
            uri: QUERY_SCHEMA_URI.to_string(),
            file_match: QUERY_SCHEMA_FILE_MATCH
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
            schema: query_schema_json().clone(),
        }
    }

    pub fn file_match_patterns(&self) -> Result<Vec<Pattern>> {
        self.file_match
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| EditorError::InvalidFileMatch {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn matches(&self, model_uri: &str) -> Result<bool> {
        Ok(self
            .file_match_patterns()?
            .iter()
            .any(|pattern| pattern.matches(model_uri)))
    }
}

// =============================================================================
// PresenterConfig
// =============================================================================

pub const DEFAULT_THEME: &str = "vs-dark";
pub const DEFAULT_LANGUAGE: &str = "json";
pub const DEFAULT_HEIGHT: u32 = 170;
pub const DEFAULT_LINE_HEIGHT: u32 = 19;
pub const DEFAULT_MODEL_URI: &str = "inmemory://model/1";

/// Everything a presenter needs besides the example itself.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenterConfig {
    pub theme: String,
    pub language: String,
    /// Display height before any content change
    pub height: u32,
    /// Pixel height of one line of text
    pub line_height: u32,
    pub model_uri: String,
    pub options: EditorOptions,
    pub diagnostics: DiagnosticsOptions,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        PresenterConfig {
            theme: DEFAULT_THEME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            height: DEFAULT_HEIGHT,
            line_height: DEFAULT_LINE_HEIGHT,
            model_uri: DEFAULT_MODEL_URI.to_string(),
            options: EditorOptions::default(),
            diagnostics: DiagnosticsOptions::default(),
        }
    }
}

impl PresenterConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_editor_options_serialize_as_widget_options() {
        let value = serde_json::to_value(EditorOptions::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "minimap": {"enabled": false},
                "automaticLayout": true,
                "fixedOverflowWidgets": true,
                "glyphMargin": false,
                "wordWrap": "off",
                "lineNumbers": "on",
                "tabFocusMode": false,
                "overviewRulerLanes": 0,
                "hideCursorInOverviewRuler": false,
                "scrollBeyondLastLine": false
            })
        );
    }

    #[test]
    fn test_diagnostics_options_shape() {
        let value = serde_json::to_value(DiagnosticsOptions::default()).unwrap();
        assert_eq!(value["validate"], json!(true));
        assert_eq!(value["schemas"][0]["uri"], json!(QUERY_SCHEMA_URI));
        assert_eq!(value["schemas"][0]["fileMatch"], json!(["*"]));
        assert_eq!(value["schemas"][0]["schema"], *query_schema_json());
    }

    #[test]
    fn test_file_match_is_a_glob() {
        let association = SchemaAssociation {
            uri: "http://example.com/schema.json".to_string(),
            file_match: vec!["inmemory://model/*".to_string()],
            schema: json!(true),
        };
        assert!(association.matches("inmemory://model/1").unwrap());
        assert!(!association.matches("file:///query.json").unwrap());
        assert!(SchemaAssociation::query_schema().matches("file:///query.json").unwrap());
    }

    #[test]
    fn test_invalid_file_match() {
        let association = SchemaAssociation {
            uri: "http://example.com/schema.json".to_string(),
            file_match: vec!["[".to_string()],
            schema: json!(true),
        };
        assert!(matches!(
            association.matches("inmemory://model/1"),
            Err(EditorError::InvalidFileMatch { .. })
        ));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config = PresenterConfig::from_json_str(r#"{"theme": "vs", "lineHeight": 20}"#).unwrap();
        assert_eq!(config.theme, "vs");
        assert_eq!(config.line_height, 20);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.language, "json");
        assert_eq!(config.options, EditorOptions::default());
        assert!(config.diagnostics.validate);
    }
}
