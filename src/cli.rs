//! Command-line interface argument parsing for covid-dash-tui.
//!
//! Mirrors the web dashboard's startup defaults:
//! - `covid-dash-tui show`
//! - `covid-dash-tui show --metric deaths --interval weekly`
//! - `covid-dash-tui show --data-path /tmp/owid-covid-data.csv`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::{Interval, Metric};

/// A Rust-based Terminal User Interface for exploring global COVID-19
/// statistics from the OWID dataset.
#[derive(Parser, Debug)]
#[command(name = "covid-dash-tui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the TUI dashboard
    Show {
        /// Path to the OWID CSV dataset
        /// Defaults to ./data/owid-covid-data.csv, then ~/.cache/covid-dash/
        #[arg(long)]
        data_path: Option<String>,

        /// Metric shown at startup
        #[arg(short, long, value_enum, default_value_t = Metric::Cases)]
        metric: Metric,

        /// Interval shown at startup
        #[arg(short, long, value_enum, default_value_t = Interval::New)]
        interval: Interval,

        /// Start with values normalized relative to population
        #[arg(short, long)]
        relative: bool,

        /// Comma-separated hex color palette for plot lines
        /// Example: "#FF0000,#00FF00,#0000FF"
        #[arg(short, long)]
        color_palette: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub metric: Metric,
    pub interval: Interval,
    pub normalize: bool,
    pub color_palette: Vec<String>,
}

impl AppConfig {
    /// Create AppConfig from CLI Commands
    pub fn from_show_command(
        data_path: Option<String>,
        metric: Metric,
        interval: Interval,
        relative: bool,
        color_palette: Option<String>,
    ) -> Self {
        // Parse color palette
        let colors = color_palette
            .map(|p| p.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|| {
                // Default color palette
                vec![
                    "#FF6B6B".to_string(), // Red
                    "#4ECDC4".to_string(), // Teal
                    "#45B7D1".to_string(), // Blue
                    "#96CEB4".to_string(), // Green
                    "#FFEAA7".to_string(), // Yellow
                    "#DDA0DD".to_string(), // Plum
                    "#98D8C8".to_string(), // Mint
                    "#F7DC6F".to_string(), // Gold
                ]
            });

        // Determine dataset path
        let data_path = data_path.map(PathBuf::from).unwrap_or_else(|| {
            // Check COVID_DATA_PATH environment variable first
            if let Ok(env_path) = std::env::var("COVID_DATA_PATH") {
                PathBuf::from(env_path)
            } else {
                // A local data/ directory (the web dashboard's layout) wins
                // over the cache location
                let local = PathBuf::from("data").join("owid-covid-data.csv");
                if local.exists() {
                    local
                } else {
                    dirs::home_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join(".cache")
                        .join("covid-dash")
                        .join("owid-covid-data.csv")
                }
            }
        });

        AppConfig {
            data_path,
            metric,
            interval,
            normalize: relative,
            color_palette: colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config =
            AppConfig::from_show_command(None, Metric::Cases, Interval::New, false, None);
        assert_eq!(config.metric, Metric::Cases);
        assert_eq!(config.interval, Interval::New);
        assert!(!config.normalize);
        assert!(!config.color_palette.is_empty());
    }

    #[test]
    fn test_custom_colors() {
        let config = AppConfig::from_show_command(
            None,
            Metric::Cases,
            Interval::New,
            false,
            Some("#FF0000,#00FF00".to_string()),
        );
        assert_eq!(config.color_palette.len(), 2);
        assert_eq!(config.color_palette[0], "#FF0000");
    }

    #[test]
    fn test_explicit_data_path_wins() {
        let config = AppConfig::from_show_command(
            Some("/tmp/owid.csv".to_string()),
            Metric::Deaths,
            Interval::Weekly,
            true,
            None,
        );
        assert_eq!(config.data_path, PathBuf::from("/tmp/owid.csv"));
        assert!(config.normalize);
    }
}
