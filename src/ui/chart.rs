//! Series chart widget and the date-range slider under it.

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use super::theme::Theme;
use crate::data::Series;

/// Multi-line chart showing one dataset per selected location
pub struct SeriesChart<'a> {
    series: &'a [Series],
    title: &'a str,
    /// Visible date window from the slider (inclusive)
    window: (NaiveDate, NaiveDate),
    theme: &'a Theme,
}

impl<'a> SeriesChart<'a> {
    pub fn new(
        series: &'a [Series],
        title: &'a str,
        window: (NaiveDate, NaiveDate),
        theme: &'a Theme,
    ) -> Self {
        SeriesChart {
            series,
            title,
            window,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let (start, end) = self.window;

        // Convert each series to (days-since-window-start, value), keeping
        // only in-window points
        let all_points: Vec<Vec<(f64, f64)>> = self
            .series
            .iter()
            .map(|series| {
                series
                    .points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .map(|p| ((p.date - start).num_days() as f64, p.value))
                    .collect()
            })
            .collect();

        if all_points.iter().all(|points| points.is_empty()) {
            self.render_empty(frame, area, focused);
            return;
        }

        // X bounds span the visible window; y bounds come from the data
        let x_min = 0.0;
        let x_max = ((end - start).num_days() as f64).max(1.0);
        let mut y_min = f64::MAX;
        let mut y_max = f64::MIN;
        for points in &all_points {
            for &(_, y) in points {
                if y < y_min {
                    y_min = y;
                }
                if y > y_max {
                    y_max = y;
                }
            }
        }
        if y_min >= y_max {
            y_max = y_min + 1.0;
        }

        // Add some padding to y-axis
        let y_range = y_max - y_min;
        y_min -= y_range * 0.05;
        y_max += y_range * 0.05;

        let datasets: Vec<Dataset> = self
            .series
            .iter()
            .enumerate()
            .zip(all_points.iter())
            .map(|((i, series), points)| {
                let color = self.theme.chart_color(i);
                let label = if self.series.len() > 1 {
                    series.location.clone()
                } else {
                    String::new()
                };

                Dataset::default()
                    .name(label)
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(points)
            })
            .collect();

        let mid = start + chrono::Days::new(((end - start).num_days() / 2).max(0) as u64);
        let x_labels = vec![
            Span::raw(start.format("%Y-%m-%d").to_string()),
            Span::raw(mid.format("%Y-%m-%d").to_string()),
            Span::raw(end.format("%Y-%m-%d").to_string()),
        ];

        let y_labels = vec![
            Span::raw(format_value(y_min)),
            Span::raw(format_value((y_min + y_max) / 2.0)),
            Span::raw(format_value(y_max)),
        ];

        let border_style = if focused {
            self.theme.focused_border_style()
        } else {
            self.theme.border_style()
        };

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title_style(self.theme.title_style()),
            )
            .x_axis(
                Axis::default()
                    .title(Span::styled(
                        "date",
                        Style::default().add_modifier(Modifier::DIM),
                    ))
                    .style(self.theme.normal_style())
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            self.theme.focused_border_style()
        } else {
            self.theme.border_style()
        };

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(self.theme.title_style());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let message = ratatui::widgets::Paragraph::new("No data available")
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(message, inner);
    }
}

/// Single-line date-range slider with its two cosmetic range labels
pub struct DateSlider<'a> {
    /// Left label: min of the selected range (identity passthrough)
    label_lo: &'a str,
    /// Right label: max of the selected range (identity passthrough)
    label_hi: &'a str,
    lo: usize,
    hi: usize,
    len: usize,
    theme: &'a Theme,
}

impl<'a> DateSlider<'a> {
    pub fn new(
        label_lo: &'a str,
        label_hi: &'a str,
        lo: usize,
        hi: usize,
        len: usize,
        theme: &'a Theme,
    ) -> Self {
        DateSlider {
            label_lo,
            label_hi,
            lo,
            hi,
            len,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let labels_width = self.label_lo.len() + self.label_hi.len() + 2;
        let bar_width = (area.width as usize).saturating_sub(labels_width);

        let mut bar = String::with_capacity(bar_width);
        if self.len > 1 && bar_width > 0 {
            for cell in 0..bar_width {
                // Map the cell back onto the date index
                let idx = cell * (self.len - 1) / bar_width.saturating_sub(1).max(1);
                if idx >= self.lo && idx <= self.hi {
                    bar.push('█');
                } else {
                    bar.push('─');
                }
            }
        }

        let line = ratatui::text::Line::from(vec![
            Span::styled(self.label_lo, self.theme.title_style()),
            Span::raw(" "),
            Span::styled(bar, self.theme.normal_style()),
            Span::raw(" "),
            Span::styled(self.label_hi, self.theme.title_style()),
        ]);

        let paragraph = ratatui::widgets::Paragraph::new(line).style(self.theme.normal_style());
        frame.render_widget(paragraph, area);
    }
}

/// Format a value for display on axis labels
fn format_value(value: f64) -> String {
    if value.abs() < 0.001 && value != 0.0 {
        format!("{value:.2e}")
    } else if value.abs() >= 1000.0 {
        format!("{value:.2e}")
    } else if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.4}")
    }
}
