//! laradocs: scrape one version of the Laravel documentation into Markdown.
//!
//! Lists the versions offered by the docs site, lets the user pick one and
//! writes every page of that version as a Markdown file.

mod commands;
mod output;
mod picker;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
