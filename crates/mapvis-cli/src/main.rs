//! mapvis CLI - visual regression tests for map styles
//!
//! Renders each fixture style at every configured size, scale factor and
//! backend, and compares the results against stored references.

use std::process::ExitCode;

use clap::Parser;

use mapvis_cli::commands;

mod cli_args;

use cli_args::Cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = if cli.list {
        commands::list::run(&cli.names, cli.catalog.as_deref(), cli.json)
    } else {
        commands::run::run(&cli.names, cli.catalog.as_deref(), cli.run_config())
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
