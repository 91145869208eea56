mod cli;
mod commands;
mod format;
mod stats;
mod trmnl;
mod views;
mod zenml;

use crate::cli::Cli;
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_module_level("reqwest", LevelFilter::Off)
        .with_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init()?;

    commands::refresh(&cli)
}
