//! SupportDesk CLI: rule-based triage for customer support tickets.
//!
//! Classifies tickets, routes them to departments, drafts a response, and
//! decides whether a human needs to step in.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
