//! Schema command - prints the diagnostics registration.

use std::process::ExitCode;

use apiv2_editor::DiagnosticsOptions;

pub fn run() -> anyhow::Result<ExitCode> {
    println!(
        "{}",
        serde_json::to_string_pretty(&DiagnosticsOptions::default())?
    );
    Ok(ExitCode::SUCCESS)
}
