use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use apiv2_editor::{ExampleTable, PresenterConfig};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber. `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Read input from file path or stdin.
/// - `None` or `Some("-")` reads from stdin
/// - `Some(path)` reads from file
pub fn read_input(file: Option<&str>) -> Result<String, String> {
    match file {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error reading from stdin: {e}"))?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).map_err(|e| format!("Error reading file: {e}")),
    }
}

/// Helper to get display path for error messages
pub fn display_path(file: Option<&str>) -> &str {
    match file {
        None | Some("-") => "<stdin>",
        Some(path) => path,
    }
}

/// Presenter configuration from a JSON file, or the defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PresenterConfig> {
    let Some(path) = path else {
        return Ok(PresenterConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    PresenterConfig::from_json_str(&text).with_context(|| format!("parsing config {path}"))
}

/// Example table from a JSON file, or the builtin examples.
pub fn load_examples(path: Option<&str>) -> anyhow::Result<ExampleTable> {
    let Some(path) = path else {
        return Ok(ExampleTable::builtin());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading examples {path}"))?;
    let value = serde_json::from_str(&text).with_context(|| format!("parsing examples {path}"))?;
    ExampleTable::from_json(value).with_context(|| format!("loading examples {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(None), "<stdin>");
        assert_eq!(display_path(Some("-")), "<stdin>");
        assert_eq!(display_path(Some("query.json")), "query.json");
    }

    #[test]
    fn test_defaults_without_files() {
        assert_eq!(load_config(None).unwrap(), PresenterConfig::default());
        assert_eq!(load_examples(None).unwrap(), ExampleTable::builtin());
    }
}
