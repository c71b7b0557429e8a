//! Series resolution: maps a user selection to chart-ready time series.
//!
//! This is the pure core of the dashboard. Column-name resolution and
//! extraction have no UI dependencies and operate on any [`DataStore`],
//! so the whole thing is testable against synthetic tables.

use thiserror::Error;

use super::models::{Interval, Metric, Observation, Selection, Series, SeriesPoint};
use super::store::DataStore;

/// Window length for the weekly trailing sum, in rows (days)
const WEEKLY_WINDOW: usize = 7;

/// Non-fatal resolution failures, isolated to a single render cycle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The resolved column does not exist in the table at all. Distinct
    /// from "no rows for this location", which yields an empty series.
    #[error("column `{0}` does not exist in the dataset")]
    UnknownColumn(String),
}

/// Resolve the dataset column a selection reads from.
///
/// Weekly always aggregates the daily column, so its prefix is `new`.
/// Normalized tests use the per-thousand variant, other normalized metrics
/// per-million. Vaccinations carry no normalized variants in the dataset,
/// so the normalize flag is silently ignored for them.
pub fn resolve_column(metric: Metric, interval: Interval, normalize: bool) -> String {
    let prefix = match interval {
        Interval::Total => "total",
        Interval::New | Interval::Weekly => "new",
    };
    let suffix = if normalize && metric != Metric::Vaccinations {
        if metric == Metric::Tests {
            "_per_thousand"
        } else {
            "_per_million"
        }
    } else {
        ""
    };
    format!("{prefix}_{}{suffix}", metric.column_stem())
}

/// Resolve a selection against the observation table.
///
/// Returns one series per requested location, in request order. An empty
/// location set is a valid selection and yields an empty result.
pub fn resolve(store: &DataStore, selection: &Selection) -> Result<Vec<Series>, ResolveError> {
    if selection.locations.is_empty() {
        return Ok(Vec::new());
    }

    let column = resolve_column(selection.metric, selection.interval, selection.normalize);
    let column_idx = store
        .column_index(&column)
        .ok_or(ResolveError::UnknownColumn(column))?;

    let mut result = Vec::with_capacity(selection.locations.len());
    for location in &selection.locations {
        let rows = store.rows_for(location);
        let points = match selection.interval {
            Interval::Weekly => weekly_points(rows, column_idx),
            Interval::Total | Interval::New => raw_points(rows, column_idx),
        };
        result.push(Series {
            location: location.clone(),
            points,
        });
    }
    Ok(result)
}

/// Direct extraction: one point per row that has a value in the column
fn raw_points(rows: &[Observation], column_idx: usize) -> Vec<SeriesPoint> {
    rows.iter()
        .filter_map(|row| {
            row.values
                .get(column_idx)
                .copied()
                .flatten()
                .map(|value| SeriesPoint {
                    date: row.date,
                    value,
                })
        })
        .collect()
}

/// Trailing rolling sum over a window of up to [`WEEKLY_WINDOW`] rows.
///
/// One output point per input row; the first six are partial windows.
/// Missing cells contribute nothing to the sum. The window is anchored
/// per location (callers pass a single location's rows), so it never
/// crosses location boundaries.
fn weekly_points(rows: &[Observation], column_idx: usize) -> Vec<SeriesPoint> {
    let mut points = Vec::with_capacity(rows.len());
    let mut contributions = Vec::with_capacity(rows.len());
    let mut sum = 0.0;

    for (i, row) in rows.iter().enumerate() {
        let value = row
            .values
            .get(column_idx)
            .copied()
            .flatten()
            .unwrap_or(0.0);
        contributions.push(value);
        sum += value;
        if i >= WEEKLY_WINDOW {
            sum -= contributions[i - WEEKLY_WINDOW];
        }
        points.push(SeriesPoint {
            date: row.date,
            value: sum,
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn day(n: u64) -> NaiveDate {
        date("2021-01-01") + chrono::Days::new(n)
    }

    /// Single-column store holding daily values for one or more locations
    fn store_with(column: &str, data: &[(&str, &[f64])]) -> DataStore {
        let mut rows = Vec::new();
        for (location, values) in data {
            for (i, &value) in values.iter().enumerate() {
                rows.push((location.to_string(), day(i as u64), vec![Some(value)]));
            }
        }
        DataStore::from_rows(vec![column.to_string()], rows).unwrap()
    }

    fn selection(locations: &[&str], metric: Metric, interval: Interval, normalize: bool) -> Selection {
        Selection {
            locations: locations.iter().map(|s| s.to_string()).collect(),
            metric,
            interval,
            normalize,
        }
    }

    #[test]
    fn test_resolve_column_all_combinations() {
        // Every (metric, interval, normalize) combination, including the
        // vaccinations-ignores-normalize edge case
        let cases = [
            (Metric::Cases, Interval::Total, false, "total_cases"),
            (Metric::Cases, Interval::Total, true, "total_cases_per_million"),
            (Metric::Cases, Interval::New, false, "new_cases"),
            (Metric::Cases, Interval::New, true, "new_cases_per_million"),
            (Metric::Cases, Interval::Weekly, false, "new_cases"),
            (Metric::Cases, Interval::Weekly, true, "new_cases_per_million"),
            (Metric::Deaths, Interval::Total, false, "total_deaths"),
            (Metric::Deaths, Interval::Total, true, "total_deaths_per_million"),
            (Metric::Deaths, Interval::New, false, "new_deaths"),
            (Metric::Deaths, Interval::New, true, "new_deaths_per_million"),
            (Metric::Deaths, Interval::Weekly, false, "new_deaths"),
            (Metric::Deaths, Interval::Weekly, true, "new_deaths_per_million"),
            (Metric::Tests, Interval::Total, false, "total_tests"),
            (Metric::Tests, Interval::Total, true, "total_tests_per_thousand"),
            (Metric::Tests, Interval::New, false, "new_tests"),
            (Metric::Tests, Interval::New, true, "new_tests_per_thousand"),
            (Metric::Tests, Interval::Weekly, false, "new_tests"),
            (Metric::Tests, Interval::Weekly, true, "new_tests_per_thousand"),
            (Metric::Vaccinations, Interval::Total, false, "total_vaccinations"),
            (Metric::Vaccinations, Interval::Total, true, "total_vaccinations"),
            (Metric::Vaccinations, Interval::New, false, "new_vaccinations"),
            (Metric::Vaccinations, Interval::New, true, "new_vaccinations"),
            (Metric::Vaccinations, Interval::Weekly, false, "new_vaccinations"),
            (Metric::Vaccinations, Interval::Weekly, true, "new_vaccinations"),
        ];

        for (metric, interval, normalize, expected) in cases {
            assert_eq!(
                resolve_column(metric, interval, normalize),
                expected,
                "metric={metric} interval={interval} normalize={normalize}"
            );
        }
    }

    #[test]
    fn test_series_order_matches_location_order() {
        let store = store_with(
            "new_cases",
            &[("A", &[1.0]), ("B", &[2.0]), ("C", &[3.0])],
        );
        let sel = selection(&["C", "A", "B"], Metric::Cases, Interval::New, false);
        let series = resolve(&store, &sel).unwrap();
        let order: Vec<&str> = series.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_points_ascending_no_duplicate_dates() {
        let store = store_with("new_cases", &[("A", &[1.0, 2.0, 3.0, 4.0])]);
        let sel = selection(&["A"], Metric::Cases, Interval::New, false);
        let series = resolve(&store, &sel).unwrap();
        let points = &series[0].points;
        for pair in points.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_empty_selection_is_not_an_error() {
        let store = store_with("new_cases", &[("A", &[1.0])]);
        let sel = selection(&[], Metric::Cases, Interval::New, false);
        assert!(resolve(&store, &sel).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let store = store_with("new_cases", &[("A", &[1.0])]);
        let sel = selection(&["A"], Metric::Deaths, Interval::New, false);
        assert_eq!(
            resolve(&store, &sel).unwrap_err(),
            ResolveError::UnknownColumn("new_deaths".to_string())
        );
    }

    #[test]
    fn test_no_rows_for_location_is_an_empty_series() {
        let store = store_with("new_cases", &[("A", &[1.0])]);
        let sel = selection(&["A", "Atlantis"], Metric::Cases, Interval::New, false);
        let series = resolve(&store, &sel).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[1].location, "Atlantis");
        assert!(series[1].points.is_empty());
    }

    #[test]
    fn test_missing_cells_are_skipped_in_raw_extraction() {
        let store = DataStore::from_rows(
            vec!["new_cases".to_string()],
            vec![
                ("A".to_string(), day(0), vec![Some(1.0)]),
                ("A".to_string(), day(1), vec![None]),
                ("A".to_string(), day(2), vec![Some(3.0)]),
            ],
        )
        .unwrap();
        let sel = selection(&["A"], Metric::Cases, Interval::New, false);
        let series = resolve(&store, &sel).unwrap();
        let values: Vec<f64> = series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_weekly_constant_series_reaches_seven_v() {
        let daily = [4.0; 10];
        let store = store_with("new_cases", &[("A", &daily)]);
        let sel = selection(&["A"], Metric::Cases, Interval::Weekly, false);
        let series = resolve(&store, &sel).unwrap();
        let points = &series[0].points;
        assert_eq!(points.len(), 10);
        // Partial windows ramp up; from the 7th point on the sum is 7v
        assert_eq!(points[0].value, 4.0);
        assert_eq!(points[5].value, 24.0);
        for point in &points[6..] {
            assert_eq!(point.value, 28.0);
        }
    }

    #[test]
    fn test_weekly_end_to_end_scenario() {
        let store = store_with(
            "new_cases",
            &[("X", &[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 5.0])],
        );
        let sel = selection(&["X"], Metric::Cases, Interval::Weekly, false);
        let series = resolve(&store, &sel).unwrap();
        let points = &series[0].points;
        assert_eq!(points.len(), 8);
        assert_eq!(points[6].value, 70.0);
        assert_eq!(points[7].value, 65.0);
    }

    #[test]
    fn test_weekly_windows_do_not_cross_locations() {
        let store = store_with("new_cases", &[("A", &[10.0; 7]), ("B", &[1.0; 7])]);
        let sel = selection(&["B"], Metric::Cases, Interval::Weekly, false);
        let series = resolve(&store, &sel).unwrap();
        // B's first point must not carry any of A's totals
        assert_eq!(series[0].points[0].value, 1.0);
        assert_eq!(series[0].points[6].value, 7.0);
    }

    #[test]
    fn test_weekly_missing_cells_contribute_nothing() {
        let store = DataStore::from_rows(
            vec!["new_cases".to_string()],
            vec![
                ("A".to_string(), day(0), vec![Some(5.0)]),
                ("A".to_string(), day(1), vec![None]),
                ("A".to_string(), day(2), vec![Some(5.0)]),
            ],
        )
        .unwrap();
        let sel = selection(&["A"], Metric::Cases, Interval::Weekly, false);
        let series = resolve(&store, &sel).unwrap();
        let values: Vec<f64> = series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![5.0, 5.0, 10.0]);
    }

    #[test]
    fn test_normalized_tests_total_end_to_end() {
        let store = store_with("total_tests_per_thousand", &[("A", &[1.5, 2.5])]);
        let sel = selection(&["A"], Metric::Tests, Interval::Total, true);
        let series = resolve(&store, &sel).unwrap();
        assert_eq!(series[0].points[1].value, 2.5);
    }

    #[test]
    fn test_normalized_vaccinations_end_to_end() {
        // Normalize is requested but vaccinations resolve to the plain column
        let store = store_with("new_vaccinations", &[("A", &[100.0])]);
        let sel = selection(&["A"], Metric::Vaccinations, Interval::New, true);
        let series = resolve(&store, &sel).unwrap();
        assert_eq!(series[0].points[0].value, 100.0);
    }
}
