//! Terminal rendering of diagnostics via annotate-snippets.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use apiv2_editor::{DiagnosticMessage, DiagnosticSeverity};

/// Render diagnostics against their source, one report per diagnostic.
pub fn format_diagnostics(
    source: &str,
    path: &str,
    diagnostics: &[DiagnosticMessage],
    styled: bool,
) -> String {
    let renderer = if styled {
        Renderer::styled()
    } else {
        Renderer::plain()
    };

    diagnostics
        .iter()
        .map(|diagnostic| {
            let groups = [build_group(source, path, diagnostic)];
            renderer.render(&groups).to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_group<'a>(source: &'a str, path: &'a str, diagnostic: &'a DiagnosticMessage) -> Group<'a> {
    let level = match diagnostic.severity {
        DiagnosticSeverity::Error => Level::ERROR,
    };

    // Clamp span to valid range
    let start = diagnostic.start.min(source.len());
    let end = diagnostic.end.min(source.len()).max(start);

    level.primary_title(diagnostic.message.as_str()).element(
        Snippet::source(source)
            .line_start(1)
            .path(path)
            .annotation(
                AnnotationKind::Primary
                    .span(start..end)
                    .label(diagnostic.message.as_str()),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_report_names_file_and_message() {
        let source = "{\n  \"date_range\": \"31d\"\n}";
        let start = source.find("\"31d\"").unwrap();
        let diagnostics = vec![DiagnosticMessage {
            start,
            end: start + 5,
            message: "Value is not accepted".to_string(),
            severity: DiagnosticSeverity::Error,
        }];

        let rendered = format_diagnostics(source, "query.json", &diagnostics, false);
        assert!(rendered.contains("error"), "{rendered}");
        assert!(rendered.contains("Value is not accepted"), "{rendered}");
        assert!(rendered.contains("query.json"), "{rendered}");
    }

    #[test]
    fn test_no_diagnostics_renders_nothing() {
        assert_eq!(format_diagnostics("{}", "query.json", &[], false), "");
    }
}
