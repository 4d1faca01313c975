//! Headless example editor for Stats API v2 query documents
//!
//! [`ExamplePresenter`] mounts an example from an [`ExampleTable`] into a text
//! model, validates the text against its own schema registration and keeps a
//! display height that grows with the content but never shrinks. A real editor
//! widget is driven through [`EditorSurface`] and [`MountConfig`].

pub mod diagnostics;
pub mod error;
pub mod examples;
pub mod locate;
pub mod options;
pub mod presenter;

pub use diagnostics::{DiagnosticMessage, DiagnosticSeverity, collect_diagnostics};
pub use error::EditorError;
pub use examples::ExampleTable;
pub use locate::{Span, SpanMap, locate};
pub use options::{
    DiagnosticsOptions, EditorOptions, LineNumbers, MinimapOptions, PresenterConfig,
    SchemaAssociation, WordWrap,
};
pub use presenter::{EditorSurface, ExamplePresenter, MountConfig, TextModel};
