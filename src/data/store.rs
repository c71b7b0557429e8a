//! CSV storage layer for the OWID COVID-19 dataset.
//!
//! The input is the standard `owid-covid-data.csv` export: one row per
//! (location, date), a `location` and a `date` column, and a set of numeric
//! metric columns (cumulative, daily, and population-normalized variants).
//! The table is loaded exactly once at startup and is immutable afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use super::models::Observation;

/// Metric columns every usable dataset must carry.
///
/// These are the columns the dashboard can resolve a selection against;
/// extra columns in the file are kept but never required.
pub const REQUIRED_COLUMNS: [&str; 16] = [
    "total_cases",
    "new_cases",
    "total_cases_per_million",
    "new_cases_per_million",
    "total_deaths",
    "new_deaths",
    "total_deaths_per_million",
    "new_deaths_per_million",
    "total_tests",
    "new_tests",
    "total_tests_per_thousand",
    "new_tests_per_thousand",
    "total_vaccinations",
    "new_vaccinations",
    "total_vaccinations_per_hundred",
    "new_vaccinations_smoothed_per_million",
];

/// Date format used by the dataset
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fatal errors raised while loading the observation table
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(String),
    #[error("row {row}: invalid date `{value}`")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: invalid number `{value}` in column `{column}`")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("duplicate observation for `{location}` on {date}")]
    DuplicateObservation {
        location: String,
        date: NaiveDate,
    },
}

/// Immutable in-memory observation table
#[derive(Debug)]
pub struct DataStore {
    /// Metric column names, in file order (excludes `location` and `date`)
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    /// Locations in first-appearance order, for the checklist
    locations: Vec<String>,
    /// Rows per location, sorted ascending by date
    by_location: HashMap<String, Vec<Observation>>,
    /// Distinct dates across all locations, ascending
    dates: Vec<NaiveDate>,
}

impl DataStore {
    /// Load the observation table from a CSV file. Called once at startup;
    /// any failure here is fatal.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let location_idx =
            position("location").ok_or_else(|| DataError::MissingColumn("location".into()))?;
        let date_idx = position("date").ok_or_else(|| DataError::MissingColumn("date".into()))?;
        for required in REQUIRED_COLUMNS {
            if position(required).is_none() {
                return Err(DataError::MissingColumn(required.into()));
            }
        }

        // Every non-key column is a metric column
        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != location_idx && i != date_idx)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (record_no, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1, so the first record is line 2
            let row = record_no + 2;

            let location = record.get(location_idx).unwrap_or("").to_string();
            let date_field = record.get(date_idx).unwrap_or("");
            let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT).map_err(|_| {
                DataError::InvalidDate {
                    row,
                    value: date_field.to_string(),
                }
            })?;

            let mut values = Vec::with_capacity(columns.len());
            for (i, field) in record.iter().enumerate() {
                if i == location_idx || i == date_idx {
                    continue;
                }
                let field = field.trim();
                if field.is_empty() {
                    values.push(None);
                } else {
                    let value = field.parse::<f64>().map_err(|_| DataError::InvalidNumber {
                        row,
                        column: headers.get(i).unwrap_or("").to_string(),
                        value: field.to_string(),
                    })?;
                    values.push(Some(value));
                }
            }

            rows.push((location, date, values));
        }

        Self::from_rows(columns, rows)
    }

    /// Build a store from already-parsed rows.
    ///
    /// Public so callers (and tests) can construct synthetic tables without
    /// going through a file. Each element of `values` must align with
    /// `columns`. Enforces the one-row-per-(location, date) invariant and
    /// sorts each location's rows by date.
    pub fn from_rows(
        columns: Vec<String>,
        rows: impl IntoIterator<Item = (String, NaiveDate, Vec<Option<f64>>)>,
    ) -> Result<Self, DataError> {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let mut locations: Vec<String> = Vec::new();
        let mut by_location: HashMap<String, Vec<Observation>> = HashMap::new();
        let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();

        for (location, date, values) in rows {
            if !by_location.contains_key(&location) {
                locations.push(location.clone());
            }
            all_dates.insert(date);
            by_location
                .entry(location)
                .or_default()
                .push(Observation { date, values });
        }

        for (location, observations) in by_location.iter_mut() {
            observations.sort_by_key(|o| o.date);
            for pair in observations.windows(2) {
                if pair[0].date == pair[1].date {
                    return Err(DataError::DuplicateObservation {
                        location: location.clone(),
                        date: pair[0].date,
                    });
                }
            }
        }

        Ok(DataStore {
            columns,
            column_index,
            locations,
            by_location,
            dates: all_dates.into_iter().collect(),
        })
    }

    /// Metric column names, in file order
    #[allow(dead_code)] // Used in tests
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a metric column in each row's `values`, if it exists
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// All locations, in first-appearance order
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Rows for a location, ascending by date. Unknown locations yield an
    /// empty slice, not an error.
    pub fn rows_for(&self, location: &str) -> &[Observation] {
        self.by_location
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct dates across the whole table, ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Earliest and latest date in the table, if any rows were loaded
    #[allow(dead_code)] // Used in tests
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.dates.first(), self.dates.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}
