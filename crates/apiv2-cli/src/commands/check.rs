//! Check command - validates query documents against the query schema.

use std::process::ExitCode;
use std::time::Instant;

use apiv2_editor::collect_diagnostics;
use apiv2_schema::query_schema;
use nu_ansi_term::Color;
use tracing::debug;

use crate::report::format_diagnostics;
use crate::util::{display_path, read_input};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the query document, or `-` for stdin (the default)
    pub file: Option<String>,

    /// Quiet mode: print a single summary line and no annotated diagnostics
    #[arg(short, long)]
    pub quiet: bool,
}

/// What a check prints and how it exits.
#[derive(Debug)]
pub struct CheckOutcome {
    pub success: bool,
    /// Status or summary line for stdout
    pub stdout: String,
    /// Annotated diagnostics or read errors for stderr
    pub stderr: String,
}

impl CheckOutcome {
    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn run(args: Args) -> anyhow::Result<ExitCode> {
    let outcome = check_input(&args, true)?;
    if !outcome.stderr.is_empty() {
        eprintln!("{}", outcome.stderr);
    }
    if !outcome.stdout.is_empty() {
        println!("{}", outcome.stdout);
    }
    Ok(outcome.exit_code())
}

/// Read the input named by `args` and check it. Unreadable input fails the
/// check.
pub fn check_input(args: &Args, styled: bool) -> anyhow::Result<CheckOutcome> {
    let file = args.file.as_deref();
    match read_input(file) {
        Ok(contents) => check_text(&contents, display_path(file), args.quiet, styled),
        Err(e) => Ok(CheckOutcome {
            success: false,
            stdout: String::new(),
            stderr: Color::Red.paint(format!("Error: {e}")).to_string(),
        }),
    }
}

/// Check `contents` against the query schema.
pub fn check_text(
    contents: &str,
    path: &str,
    quiet: bool,
    styled: bool,
) -> anyhow::Result<CheckOutcome> {
    let start = Instant::now();
    let schema = query_schema()?;
    let diagnostics = collect_diagnostics(contents, Some(&schema));
    let duration_s = start.elapsed().as_secs_f64();
    debug!(path, diagnostics = diagnostics.len(), "checked document");

    if diagnostics.is_empty() {
        let stdout = if quiet {
            format!("apiv2 check: 1 file, ok in {:.2}s", duration_s)
        } else {
            format!("{} {} is valid", Color::Green.bold().paint("✓"), path)
        };
        return Ok(CheckOutcome {
            success: true,
            stdout,
            stderr: String::new(),
        });
    }

    let outcome = if quiet {
        CheckOutcome {
            success: false,
            stdout: format!(
                "apiv2 check: 1 file, {} error(s) in {:.2}s",
                diagnostics.len(),
                duration_s
            ),
            stderr: String::new(),
        }
    } else {
        CheckOutcome {
            success: false,
            stdout: format!(
                "{} {} has {} error(s)",
                Color::Red.bold().paint("✗"),
                path,
                diagnostics.len()
            ),
            stderr: format_diagnostics(contents, path, &diagnostics, styled),
        }
    };
    Ok(outcome)
}
