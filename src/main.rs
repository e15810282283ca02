mod cli;
mod config;
mod convert;
mod discharge_cmd;
mod export_cmd;
mod info_cmd;
mod logging;
mod map_cmd;
mod series_cmd;
mod session;

use std::path::Path;
use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli.config, cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(config: &Path, command: Command) -> Result<()> {
    match command {
        Command::Info(args) => info_cmd::run(config, args),
        Command::Series(args) => series_cmd::run(config, args),
        Command::Map(args) => map_cmd::run(config, args),
        Command::Discharge(args) => discharge_cmd::run(config, args),
        Command::Export(args) => export_cmd::run(config, args),
    }
}
