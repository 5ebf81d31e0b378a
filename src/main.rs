//! Command-line entry point for the dotbuddy dotfiles engine.

use anyhow::Result;
use clap::Parser;

use dotbuddy::cli::{Cli, Command};
use dotbuddy::commands;
use dotbuddy::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = Logger::new();

    match args.command {
        Command::Apply(opts) => commands::apply::run(&opts, &log),
        Command::Version => {
            let version = option_env!("DOTBUDDY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("dotbuddy {version}");
            Ok(())
        }
    }
}
