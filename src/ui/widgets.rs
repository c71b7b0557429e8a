//! Sidebar and status widgets for the dashboard.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::data::{Interval, Metric};

/// Country checklist panel
pub struct LocationList<'a> {
    locations: &'a [String],
    /// Locations currently part of the selection
    checked: &'a [String],
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> LocationList<'a> {
    pub fn new(
        locations: &'a [String],
        checked: &'a [String],
        cursor: usize,
        theme: &'a Theme,
    ) -> Self {
        LocationList {
            locations,
            checked,
            cursor,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .locations
            .iter()
            .map(|location| {
                let mark = if self.checked.iter().any(|c| c == location) {
                    "[x] "
                } else {
                    "[ ] "
                };
                ListItem::new(format!("{mark}{location}"))
            })
            .collect();

        let block = Block::default()
            .title(format!(" Locations ({}) ", self.checked.len()))
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(if focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            })
            .title_style(self.theme.title_style());

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Plotting options panel: metric, interval, and the normalization toggle
pub struct OptionsPanel<'a> {
    metric: Metric,
    interval: Interval,
    normalize: bool,
    theme: &'a Theme,
}

impl<'a> OptionsPanel<'a> {
    pub fn new(metric: Metric, interval: Interval, normalize: bool, theme: &'a Theme) -> Self {
        OptionsPanel {
            metric,
            interval,
            normalize,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            "Metric",
            self.theme.title_style(),
        )));
        for (i, metric) in Metric::ALL.iter().enumerate() {
            let style = if *metric == self.metric {
                self.theme.highlight_style()
            } else {
                self.theme.normal_style()
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", i + 1),
                    self.theme.border_style(),
                ),
                Span::styled(metric.label(), style),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Interval",
            self.theme.title_style(),
        )));
        for interval in Interval::ALL {
            let style = if interval == self.interval {
                self.theme.highlight_style()
            } else {
                self.theme.normal_style()
            };
            lines.push(Line::from(vec![
                Span::styled("[i] ", self.theme.border_style()),
                Span::styled(interval.label(), style),
            ]));
        }

        lines.push(Line::from(""));
        // The normalization control is inoperative for vaccinations; the
        // resolver ignores the flag there anyway
        let relative_line = if self.metric == Metric::Vaccinations {
            Line::from(vec![
                Span::styled("[n] ", self.theme.border_style()),
                Span::styled("Relative to population (n/a)", self.theme.disabled_style()),
            ])
        } else {
            let mark = if self.normalize { "[x]" } else { "[ ]" };
            Line::from(vec![
                Span::styled("[n] ", self.theme.border_style()),
                Span::styled(
                    format!("{mark} Relative to population"),
                    self.theme.normal_style(),
                ),
            ])
        };
        lines.push(relative_line);

        let block = Block::default()
            .title(" Options ")
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(if focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            })
            .title_style(self.theme.title_style());

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    column: &'a str,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(column: &'a str, error: Option<&'a str>, theme: &'a Theme) -> Self {
        StatusBar {
            column,
            error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = match self.error {
            Some(e) => (format!("Error: {e}"), self.theme.disabled_style()),
            None => (
                format!(
                    "covid-dash-tui: {} | [h] Help [q] Quit",
                    self.column
                ),
                self.theme.normal_style(),
            ),
        };

        let paragraph = Paragraph::new(Span::styled(text, style))
            .block(Block::default().borders(Borders::TOP));

        frame.render_widget(paragraph, area);
    }
}
