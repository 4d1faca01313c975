//! Show command - prints an example as the editor would be mounted with it.

use std::process::ExitCode;

use apiv2_editor::ExamplePresenter;

use crate::util::{load_config, load_examples};

#[derive(clap::Args)]
pub struct Args {
    /// Example identifier (see `apiv2 list`)
    pub request: String,

    /// Print the full mount configuration instead of the text
    #[arg(long)]
    pub mount: bool,

    /// Presenter configuration (JSON); missing fields take their defaults
    #[arg(short, long)]
    pub config: Option<String>,

    /// Example table (JSON object of identifier to example)
    #[arg(short, long)]
    pub examples: Option<String>,
}

pub fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let examples = load_examples(args.examples.as_deref())?;
    let presenter = ExamplePresenter::mount(&args.request, &examples, config)?;

    if args.mount {
        println!("{}", serde_json::to_string_pretty(&presenter.mount_config())?);
    } else {
        println!("{}", presenter.text());
    }
    Ok(ExitCode::SUCCESS)
}
