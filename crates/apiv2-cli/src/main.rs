use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod report;
mod util;

#[derive(Parser)]
#[command(name = "apiv2", about = "Stats API v2 query document utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query document against the query schema
    Check(commands::check::Args),
    /// Print an example as the editor would show it
    Show(commands::show::Args),
    /// List example identifiers
    List(commands::list::Args),
    /// Print the schema registration handed to the editor
    Schema,
}

fn main() -> anyhow::Result<ExitCode> {
    util::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Schema => commands::schema::run(),
    }
}
