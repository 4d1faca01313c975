//! Diagnostic collection for editor text.

use apiv2_schema::{SchemaDocument, ValidationError, validate};
use serde_json::Value;

use crate::locate::{Span, SpanMap, locate};

/// Severity level for diagnostics. Syntax errors and schema violations are
/// both errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticMessage {
    /// Start byte offset in the source.
    pub start: usize,
    /// End byte offset in the source.
    pub end: usize,
    /// The diagnostic message.
    pub message: String,
    /// Severity of the diagnostic.
    pub severity: DiagnosticSeverity,
}

/// Collect all diagnostics for a document.
///
/// This includes:
/// - The JSON syntax error, if the text does not parse
/// - Schema validation errors (if a schema applies and parsing succeeded)
pub fn collect_diagnostics(text: &str, schema: Option<&SchemaDocument>) -> Vec<DiagnosticMessage> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(error) => return vec![syntax_error_to_diagnostic(text, &error)],
    };

    let Some(schema) = schema else {
        return Vec::new();
    };

    let output = validate(&value, schema);
    if output.is_valid {
        return Vec::new();
    }

    let spans = locate(text);
    output
        .errors
        .iter()
        .map(|error| validation_error_to_diagnostic(error, &spans, text.len()))
        .collect()
}

/// Convert a JSON syntax error to a diagnostic message.
fn syntax_error_to_diagnostic(text: &str, error: &serde_json::Error) -> DiagnosticMessage {
    let start = byte_offset(text, error.line(), error.column()).min(text.len());
    let (start, end) = if start < text.len() {
        (start, start + char_len_at(text, start))
    } else {
        (text.len().saturating_sub(1), text.len())
    };

    DiagnosticMessage {
        start,
        end,
        message: error.to_string(),
        severity: DiagnosticSeverity::Error,
    }
}

/// Convert a schema validation error to a diagnostic message.
///
/// Disallowed properties point at the key; everything else at the offending
/// value, or the closest enclosing value that could be located.
fn validation_error_to_diagnostic(
    error: &ValidationError,
    spans: &SpanMap,
    text_len: usize,
) -> DiagnosticMessage {
    let span = match error {
        ValidationError::AdditionalPropertyNotAllowed { path, .. } => spans.key_span(path),
        _ => None,
    }
    .or_else(|| spans.nearest_value_span(error.path()))
    .unwrap_or(Span::new(0, text_len.min(1)));

    DiagnosticMessage {
        start: span.start,
        end: span.end,
        message: error.message(),
        severity: DiagnosticSeverity::Error,
    }
}

/// Byte offset of a 1-based line and column as reported by `serde_json`.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    // Column 0 means the error sits right after the previous line's newline
    line_start + column.saturating_sub(1)
}

fn char_len_at(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiv2_schema::query_schema;

    #[test]
    fn test_every_diagnostic_is_an_error() {
        let schema = query_schema().unwrap();
        for text in ["{", r#"{"metrics": "visitors", "extra": 1}"#] {
            let diagnostics = collect_diagnostics(text, Some(&schema));
            assert!(!diagnostics.is_empty());
            assert!(
                diagnostics
                    .iter()
                    .all(|d| d.severity == DiagnosticSeverity::Error)
            );
        }
    }

    #[test]
    fn test_valid_document_has_no_diagnostics() {
        let schema = query_schema().unwrap();
        let text = r#"{"site_id": "dummy.site", "metrics": ["visitors"], "date_range": "7d"}"#;
        assert!(collect_diagnostics(text, Some(&schema)).is_empty());
    }

    #[test]
    fn test_schema_violation_points_at_value() {
        let schema = query_schema().unwrap();
        let text = r#"{"site_id": "dummy.site", "metrics": ["visitors"], "date_range": "31d"}"#;
        let diagnostics = collect_diagnostics(text, Some(&schema));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&text[diagnostics[0].start..diagnostics[0].end], "\"31d\"");
        assert!(diagnostics[0].message.starts_with("Value is not accepted"));
    }

    #[test]
    fn test_additional_property_points_at_key() {
        let schema = query_schema().unwrap();
        let text = r#"{"site_id": "dummy.site", "metrics": ["visitors"], "date_range": "7d", "limit": 10}"#;
        let diagnostics = collect_diagnostics(text, Some(&schema));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&text[diagnostics[0].start..diagnostics[0].end], "\"limit\"");
        assert_eq!(diagnostics[0].message, "Property 'limit' is not allowed");
    }

    #[test]
    fn test_missing_property_points_at_object() {
        let schema = query_schema().unwrap();
        let text = r#"{"metrics": ["visitors"], "date_range": "7d"}"#;
        let diagnostics = collect_diagnostics(text, Some(&schema));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!((diagnostics[0].start, diagnostics[0].end), (0, text.len()));
    }

    #[test]
    fn test_syntax_error() {
        let text = "{\n  \"site_id\": \"dummy.site\",\n  \"metrics\": [,]\n}";
        let diagnostics = collect_diagnostics(text, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&text[diagnostics[0].start..diagnostics[0].end], ",");
        assert!(diagnostics[0].message.contains("line 3"));
    }

    #[test]
    fn test_syntax_error_at_end_of_input() {
        let text = "{\"site_id\": ";
        let diagnostics = collect_diagnostics(text, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].end, text.len());
    }

    #[test]
    fn test_no_schema_only_checks_syntax() {
        assert!(collect_diagnostics(r#"{"anything": 1}"#, None).is_empty());
    }
}
