//! Example presenter
//!
//! An [`ExamplePresenter`] owns one editor instance's state: the text model,
//! its schema registration and the display height. The height starts at the
//! configured baseline and only ever grows to follow the content.

use apiv2_schema::SchemaDocument;
use glob::Pattern;
use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{DiagnosticMessage, collect_diagnostics};
use crate::error::{EditorError, Result};
use crate::examples::ExampleTable;
use crate::options::{DiagnosticsOptions, EditorOptions, PresenterConfig};

/// The rendered text surface, as far as the presenter is concerned.
pub trait EditorSurface {
    /// Pixel height of the laid-out content.
    fn content_height(&self) -> u32;
}

/// Headless text surface: the text and a fixed line height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextModel {
    pub uri: String,
    pub text: String,
    pub line_height: u32,
}

impl TextModel {
    pub fn new(uri: impl Into<String>, text: impl Into<String>, line_height: u32) -> Self {
        TextModel {
            uri: uri.into(),
            text: text.into(),
            line_height,
        }
    }

    /// Lines as an editor counts them; a trailing newline opens a new line.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

impl EditorSurface for TextModel {
    fn content_height(&self) -> u32 {
        let lines = u32::try_from(self.line_count()).unwrap_or(u32::MAX);
        lines.saturating_mul(self.line_height)
    }
}

/// A registered schema, compiled, with its parsed `fileMatch` patterns.
#[derive(Debug)]
struct Registration {
    patterns: Vec<Pattern>,
    schema: SchemaDocument,
}

impl Registration {
    fn matches(&self, model_uri: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(model_uri))
    }
}

/// What the editor widget is mounted with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountConfig {
    pub language: String,
    pub theme: String,
    pub default_value: String,
    pub height: u32,
    pub options: EditorOptions,
    pub diagnostics_options: DiagnosticsOptions,
}

#[derive(Debug)]
pub struct ExamplePresenter {
    request: String,
    config: PresenterConfig,
    model: TextModel,
    height: u32,
    registrations: Vec<Registration>,
}

impl ExamplePresenter {
    /// Mount the example `request` from `examples`.
    ///
    /// The text is the example pretty-printed with two-space indentation and
    /// its member order kept.
    pub fn mount(request: &str, examples: &ExampleTable, config: PresenterConfig) -> Result<Self> {
        let example = examples.require(request)?;
        let text = serde_json::to_string_pretty(example)?;

        let registrations = config
            .diagnostics
            .schemas
            .iter()
            .map(|association| -> Result<Registration> {
                let schema = SchemaDocument::from_json(&association.schema).map_err(|source| {
                    EditorError::Schema {
                        uri: association.uri.clone(),
                        source,
                    }
                })?;
                Ok(Registration {
                    patterns: association.file_match_patterns()?,
                    schema,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            request,
            schemas = registrations.len(),
            height = config.height,
            "mounted example"
        );

        Ok(ExamplePresenter {
            request: request.to_string(),
            model: TextModel::new(config.model_uri.clone(), text, config.line_height),
            height: config.height,
            config,
            registrations,
        })
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn text(&self) -> &str {
        &self.model.text
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Current display height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// React to a content change of `surface`: grow to its content height if
    /// that is larger. Returns the display height.
    pub fn handle_content_change(&mut self, surface: &dyn EditorSurface) -> u32 {
        self.grow_to(surface.content_height())
    }

    /// Replace the text and notify the change. Returns the display height.
    pub fn set_text(&mut self, text: impl Into<String>) -> u32 {
        self.model.text = text.into();
        let content_height = self.model.content_height();
        self.grow_to(content_height)
    }

    fn grow_to(&mut self, content_height: u32) -> u32 {
        if content_height > self.height {
            debug!(
                request = %self.request,
                from = self.height,
                to = content_height,
                "editor height grew"
            );
            self.height = content_height;
        }
        self.height
    }

    /// Diagnostics for the current text.
    ///
    /// Nothing is reported when validation is off. Without a schema matching
    /// the model URI only syntax errors are reported.
    pub fn diagnostics(&self) -> Vec<DiagnosticMessage> {
        if !self.config.diagnostics.validate {
            return Vec::new();
        }
        let schema = self
            .registrations
            .iter()
            .find(|registration| registration.matches(&self.model.uri))
            .map(|registration| &registration.schema);
        collect_diagnostics(&self.model.text, schema)
    }

    /// The configuration to hand to the editor widget.
    pub fn mount_config(&self) -> MountConfig {
        MountConfig {
            language: self.config.language.clone(),
            theme: self.config.theme.clone(),
            default_value: self.model.text.clone(),
            height: self.height,
            options: self.config.options.clone(),
            diagnostics_options: self.config.diagnostics.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_model_height() {
        assert_eq!(TextModel::new("m", "", 19).content_height(), 19);
        assert_eq!(TextModel::new("m", "{\n}", 19).content_height(), 38);
        assert_eq!(TextModel::new("m", "{\n}\n", 10).content_height(), 30);
    }

    #[test]
    fn test_set_text_never_shrinks() {
        let examples = ExampleTable::builtin();
        let mut presenter =
            ExamplePresenter::mount("filters", &examples, PresenterConfig::default()).unwrap();
        assert_eq!(presenter.height(), 170);

        let long = "\n".repeat(19);
        assert_eq!(presenter.set_text(long), 20 * 19);
        assert_eq!(presenter.set_text("{}"), 20 * 19);
    }
}
