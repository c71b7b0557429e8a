//! covid-dash-tui: A Rust-based Terminal User Interface for exploring
//! global COVID-19 statistics.
//!
//! A keyboard-driven terminal port of a COVID-19 web dashboard: pick
//! countries, switch metrics and intervals, normalize by population, and
//! zoom the date range.

mod app;
mod cli;
mod data;
mod ui;

use anyhow::Result;
use cli::{AppConfig, Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Show {
            data_path,
            metric,
            interval,
            relative,
            color_palette,
        } => {
            let config =
                AppConfig::from_show_command(data_path, metric, interval, relative, color_palette);

            // Run the TUI application
            app::run(config)?;
        }
    }

    Ok(())
}
