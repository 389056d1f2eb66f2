//! `gridforge` command-line front end.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let result = match &cli.command {
        Command::Solve {
            file,
            config,
            timeout_ms,
            one_based,
        } => commands::load_config(config.as_deref(), *timeout_ms, *one_based)
            .and_then(|config| commands::solve(file, &config)),
        Command::Parse { file, json } => commands::parse(file, *json),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
