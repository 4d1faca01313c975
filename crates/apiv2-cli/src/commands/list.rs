//! List command - prints the example identifiers.

use std::process::ExitCode;

use crate::util::load_examples;

#[derive(clap::Args)]
pub struct Args {
    /// Example table (JSON object of identifier to example)
    #[arg(short, long)]
    pub examples: Option<String>,
}

pub fn run(args: Args) -> anyhow::Result<ExitCode> {
    let examples = load_examples(args.examples.as_deref())?;
    for request in examples.keys() {
        println!("{request}");
    }
    Ok(ExitCode::SUCCESS)
}
