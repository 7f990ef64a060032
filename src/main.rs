mod budget;
mod charts;
mod cli;
mod dataset;
mod error;
mod fmt;
mod loader;
mod models;
mod settings;
mod trends;
mod tui;

use std::path::Path;
use std::sync::Mutex;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;
use models::UserSelection;

/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        None => cli::dashboard::run(data_dir),
        Some(Commands::Init) => cli::init::run(cli.data_dir.clone()),
        Some(Commands::Demo { force }) => cli::demo::run(data_dir, force),
        Some(Commands::Budget {
            year,
            miles,
            meals,
            years,
            json,
        }) => {
            let selection = UserSelection {
                year,
                miles,
                meals,
                planning_years: years,
            };
            cli::budget::run(data_dir, selection, json)
        }
        Some(Commands::Trends { json }) => cli::trends::run(data_dir, json),
        Some(Commands::Table { year }) => cli::table::run(data_dir, year),
        Some(Commands::Status) => cli::status::run(data_dir),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "wage-explore",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
