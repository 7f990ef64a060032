pub mod budget;
pub mod dashboard;
pub mod demo;
pub mod init;
pub mod status;
pub mod table;
pub mod trends;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::dataset::DataContext;
use crate::error::Result;
use crate::settings::{load_settings, resolve_data_dir, Settings};

#[derive(Parser)]
#[command(
    name = "wage-explore",
    about = "Explore how US household income stretches over housing, food and gas."
)]
pub struct Cli {
    /// Directory holding income.csv, house.csv, chicken.csv and gas.csv
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a settings file and create the data directory. With --data-dir
    /// the given directory is saved as the default.
    Init,
    /// Write sample income, house, chicken and gas CSVs to explore without downloads.
    Demo {
        /// Overwrite CSV files that already exist
        #[arg(long)]
        force: bool,
    },
    /// Monthly budget allocation for one year.
    Budget {
        /// Year to look up
        #[arg(long)]
        year: i32,
        /// Miles driven per month
        #[arg(long, default_value = "10")]
        miles: f64,
        /// Chicken meals eaten per month
        #[arg(long, default_value = "50")]
        meals: f64,
        /// Years to accumulate savings over, starting at --year
        #[arg(long, default_value = "1")]
        years: u32,
        /// Print the chart inputs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log-scaled, normalized trend of every series.
    Trends {
        /// Print the trend chart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Joined per-year table with derived monthly figures.
    Table {
        /// Show a single year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show settings, data files and the loaded year range.
    Status,
    /// Print a shell completion script.
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Load settings and the joined table. Any loading problem is fatal for the
/// caller.
pub(crate) fn load_context(data_dir: Option<&str>) -> Result<(Settings, DataContext)> {
    let settings = load_settings();
    let dir = resolve_data_dir(&settings, data_dir);
    let ctx = DataContext::load(&dir, &settings.sources, settings.aggregate)?;
    Ok((settings, ctx))
}
