//! Data models for the COVID-19 observation table and chart selections.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reported statistic the dashboard can plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cases,
    Deaths,
    Tests,
    Vaccinations,
}

impl Metric {
    /// All metrics, in the order they appear in the options panel
    pub const ALL: [Metric; 4] = [
        Metric::Cases,
        Metric::Deaths,
        Metric::Tests,
        Metric::Vaccinations,
    ];

    /// The stem used in dataset column names (e.g. `new_cases`)
    pub fn column_stem(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
            Metric::Tests => "tests",
            Metric::Vaccinations => "vaccinations",
        }
    }

    /// Human-readable label for the options panel
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cases => "Confirmed Cases",
            Metric::Deaths => "Confirmed Deaths",
            Metric::Tests => "Tests",
            Metric::Vaccinations => "Vaccinations",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_stem())
    }
}

/// Temporal aggregation mode for the plotted series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Cumulative counts since the start of the dataset
    Total,
    /// New counts per day
    New,
    /// 7-day trailing sum of the daily counts
    Weekly,
}

impl Interval {
    /// All intervals, in the order they cycle in the options panel
    pub const ALL: [Interval; 3] = [Interval::Total, Interval::New, Interval::Weekly];

    /// Human-readable label for the options panel
    pub fn label(&self) -> &'static str {
        match self {
            Interval::Total => "Cumulative",
            Interval::New => "New per day",
            Interval::Weekly => "Weekly",
        }
    }

    /// The next interval in the cycle
    pub fn next(self) -> Self {
        match self {
            Interval::Total => Interval::New,
            Interval::New => Interval::Weekly,
            Interval::Weekly => Interval::Total,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Interval::Total => "total",
            Interval::New => "new",
            Interval::Weekly => "weekly",
        };
        f.write_str(name)
    }
}

/// The user's current plotting choices, captured per interaction.
///
/// `locations` is ordered; the resolved series come back in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub locations: Vec<String>,
    pub metric: Metric,
    pub interval: Interval,
    pub normalize: bool,
}

/// One row of the observation table: a single (location, date) record.
///
/// `values` is aligned with the store's metric-column list; a `None` entry
/// means the source file had no value for that column on that date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// A named per-location time series ready for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub location: String,
    pub points: Vec<SeriesPoint>,
}

/// A single (date, value) pair within a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_column_stems() {
        assert_eq!(Metric::Cases.column_stem(), "cases");
        assert_eq!(Metric::Vaccinations.column_stem(), "vaccinations");
        assert_eq!(Metric::Tests.to_string(), "tests");
    }

    #[test]
    fn test_interval_cycle_covers_all() {
        let mut interval = Interval::Total;
        let mut seen = Vec::new();
        for _ in 0..Interval::ALL.len() {
            seen.push(interval);
            interval = interval.next();
        }
        assert_eq!(interval, Interval::Total);
        for expected in Interval::ALL {
            assert!(seen.contains(&expected));
        }
    }

    #[test]
    fn test_labels_match_dashboard_options() {
        assert_eq!(Metric::Cases.label(), "Confirmed Cases");
        assert_eq!(Interval::Total.label(), "Cumulative");
        assert_eq!(Interval::New.label(), "New per day");
    }
}
