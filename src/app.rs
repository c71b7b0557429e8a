//! Main application logic and TUI event loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::cli::AppConfig;
use crate::data::{self, DataStore, Interval, Metric, Selection, Series};
use crate::ui::{
    chart::{DateSlider, SeriesChart},
    widgets::{LocationList, OptionsPanel, StatusBar},
    HelpOverlay, Theme,
};

/// Countries checked at startup, matching the web dashboard's defaults
const DEFAULT_LOCATIONS: [&str; 5] = [
    "United States",
    "United Kingdom",
    "Germany",
    "Canada",
    "Italy",
];

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Locations,
    Options,
    Chart,
}

impl FocusedPanel {
    fn next(self) -> Self {
        match self {
            FocusedPanel::Locations => FocusedPanel::Options,
            FocusedPanel::Options => FocusedPanel::Chart,
            FocusedPanel::Chart => FocusedPanel::Locations,
        }
    }

    fn prev(self) -> Self {
        match self {
            FocusedPanel::Locations => FocusedPanel::Chart,
            FocusedPanel::Options => FocusedPanel::Locations,
            FocusedPanel::Chart => FocusedPanel::Options,
        }
    }
}

/// Selected range over the store's global date index. Edges move one step
/// at a time and can meet but never cross.
#[derive(Debug, Clone, Copy)]
struct DateWindow {
    lo: usize,
    hi: usize,
    len: usize,
}

impl DateWindow {
    fn new(len: usize) -> Self {
        DateWindow {
            lo: 0,
            hi: len.saturating_sub(1),
            len,
        }
    }

    fn start_left(&mut self) {
        self.lo = self.lo.saturating_sub(1);
    }

    fn start_right(&mut self) {
        if self.lo < self.hi {
            self.lo += 1;
        }
    }

    fn end_left(&mut self) {
        if self.hi > self.lo {
            self.hi -= 1;
        }
    }

    fn end_right(&mut self) {
        if self.len > 0 && self.hi < self.len - 1 {
            self.hi += 1;
        }
    }
}

/// Application state
pub struct App {
    theme: Theme,

    // Data
    store: DataStore,
    series: Vec<Series>,
    /// Column the current selection resolved to (also the chart title)
    column: String,

    // Selection state
    selected_locations: Vec<String>,
    metric: Metric,
    interval: Interval,
    normalize: bool,
    window: DateWindow,

    // UI state
    focused: FocusedPanel,
    cursor_location: usize,
    show_help: bool,

    // Exit flag
    should_quit: bool,

    // Error message to display (non-fatal)
    error_message: Option<String>,
}

impl App {
    /// Create a new App instance. Loads the dataset once; a load failure
    /// here is fatal.
    pub fn new(config: AppConfig) -> Result<Self> {
        let theme = Theme::with_palette(&config.color_palette);
        let store = DataStore::load(&config.data_path)
            .with_context(|| format!("Failed to load dataset at {:?}", config.data_path))?;

        // Default checklist, limited to countries actually in the file
        let selected_locations: Vec<String> = DEFAULT_LOCATIONS
            .iter()
            .filter(|name| store.locations().iter().any(|l| l == *name))
            .map(|name| name.to_string())
            .collect();

        let window = DateWindow::new(store.dates().len());

        let mut app = App {
            theme,
            store,
            series: Vec::new(),
            column: String::new(),
            selected_locations,
            metric: config.metric,
            interval: config.interval,
            normalize: config.normalize,
            window,
            focused: FocusedPanel::Locations,
            cursor_location: 0,
            show_help: false,
            should_quit: false,
            error_message: None,
        };

        app.refresh_series();
        Ok(app)
    }

    /// The selection the current widget state describes
    fn selection(&self) -> Selection {
        Selection {
            locations: self.selected_locations.clone(),
            metric: self.metric,
            interval: self.interval,
            normalize: self.normalize,
        }
    }

    /// Re-resolve the series after any interaction. A resolution failure
    /// empties the chart for this render cycle only; the store is untouched.
    fn refresh_series(&mut self) {
        self.column = data::resolve_column(self.metric, self.interval, self.normalize);
        match data::resolve(&self.store, &self.selection()) {
            Ok(series) => {
                self.series = series;
                self.error_message = None;
            }
            Err(e) => {
                self.series.clear();
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// The two cosmetic slider labels: min/max of the selected date range,
    /// passed through unchanged from the slider state
    fn slider_labels(&self) -> (String, String) {
        let dates = self.store.dates();
        let format = |idx: usize| {
            dates
                .get(idx)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        (format(self.window.lo), format(self.window.hi))
    }

    /// Visible date window for the chart
    fn window_dates(&self) -> (NaiveDate, NaiveDate) {
        let dates = self.store.dates();
        let at = |idx: usize| dates.get(idx).copied().unwrap_or_default();
        (at(self.window.lo), at(self.window.hi))
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) {
        // Global shortcuts
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            KeyCode::Tab => {
                self.focused = self.focused.next();
                return;
            }
            KeyCode::BackTab => {
                self.focused = self.focused.prev();
                return;
            }
            _ => {}
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return;
        }

        match key {
            // Metric selection with number keys
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(n) = c.to_digit(10) {
                    if n > 0 && (n as usize) <= Metric::ALL.len() {
                        self.metric = Metric::ALL[(n as usize) - 1];
                        self.refresh_series();
                    }
                }
                return;
            }
            // Interval cycle
            KeyCode::Char('i') => {
                self.interval = self.interval.next();
                self.refresh_series();
                return;
            }
            // Normalization toggle; inoperative for vaccinations (the
            // dataset has no normalized vaccination columns)
            KeyCode::Char('n') => {
                if self.metric != Metric::Vaccinations {
                    self.normalize = !self.normalize;
                    self.refresh_series();
                }
                return;
            }
            // Date-range slider; purely cosmetic, no re-resolution needed
            KeyCode::Char('[') => {
                self.window.start_left();
                return;
            }
            KeyCode::Char(']') => {
                self.window.start_right();
                return;
            }
            KeyCode::Char('{') => {
                self.window.end_left();
                return;
            }
            KeyCode::Char('}') => {
                self.window.end_right();
                return;
            }
            _ => {}
        }

        // Panel-specific navigation
        match self.focused {
            FocusedPanel::Locations => self.handle_location_navigation(key),
            FocusedPanel::Options => self.handle_options_navigation(key),
            FocusedPanel::Chart => self.handle_chart_navigation(key),
        }
    }

    fn handle_location_navigation(&mut self, key: KeyCode) {
        let count = self.store.locations().len();
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    self.cursor_location = (self.cursor_location + 1) % count;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if count > 0 {
                    self.cursor_location = self
                        .cursor_location
                        .checked_sub(1)
                        .unwrap_or(count - 1);
                }
            }
            KeyCode::Char(' ') => {
                self.toggle_location_under_cursor();
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                self.focused = FocusedPanel::Options;
            }
            _ => {}
        }
    }

    /// Check or uncheck the location under the cursor. Check order is
    /// preserved, which is also the order the series are plotted in.
    fn toggle_location_under_cursor(&mut self) {
        let Some(location) = self.store.locations().get(self.cursor_location) else {
            return;
        };
        let location = location.clone();
        if let Some(pos) = self.selected_locations.iter().position(|l| *l == location) {
            self.selected_locations.remove(pos);
        } else {
            self.selected_locations.push(location);
        }
        self.refresh_series();
    }

    fn handle_options_navigation(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let idx = Metric::ALL
                    .iter()
                    .position(|m| *m == self.metric)
                    .unwrap_or(0);
                self.metric = Metric::ALL[(idx + 1) % Metric::ALL.len()];
                self.refresh_series();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let idx = Metric::ALL
                    .iter()
                    .position(|m| *m == self.metric)
                    .unwrap_or(0);
                self.metric = Metric::ALL[idx.checked_sub(1).unwrap_or(Metric::ALL.len() - 1)];
                self.refresh_series();
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                self.focused = FocusedPanel::Chart;
            }
            KeyCode::Esc => {
                self.focused = FocusedPanel::Locations;
            }
            _ => {}
        }
    }

    fn handle_chart_navigation(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.focused = FocusedPanel::Options;
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        // Main layout: body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        // Body layout: sidebar (left) and content (right)
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(30), // Sidebar
                Constraint::Min(40),    // Content
            ])
            .split(main_chunks[0]);

        // Sidebar layout: location checklist, plotting options
        let sidebar_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),    // Locations
                Constraint::Length(14), // Options
            ])
            .split(body_chunks[0]);

        // Content layout: chart and date slider
        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Chart
                Constraint::Length(1), // Date slider
            ])
            .split(body_chunks[1]);

        let location_list = LocationList::new(
            self.store.locations(),
            &self.selected_locations,
            self.cursor_location,
            &self.theme,
        );
        location_list.render(
            frame,
            sidebar_chunks[0],
            self.focused == FocusedPanel::Locations,
        );

        let options = OptionsPanel::new(self.metric, self.interval, self.normalize, &self.theme);
        options.render(
            frame,
            sidebar_chunks[1],
            self.focused == FocusedPanel::Options,
        );

        let chart = SeriesChart::new(&self.series, &self.column, self.window_dates(), &self.theme);
        chart.render(frame, content_chunks[0], self.focused == FocusedPanel::Chart);

        let (label_lo, label_hi) = self.slider_labels();
        let slider = DateSlider::new(
            &label_lo,
            &label_hi,
            self.window.lo,
            self.window.hi,
            self.store.dates().len(),
            &self.theme,
        );
        slider.render(frame, content_chunks[1]);

        let status_bar = StatusBar::new(&self.column, self.error_message.as_deref(), &self.theme);
        status_bar.render(frame, main_chunks[1]);

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Check if the dataset exists before touching the terminal
    if !config.data_path.exists() {
        eprintln!("No dataset found at: {:?}", config.data_path);
        eprintln!(
            "Download owid-covid-data.csv first, or point at a copy with --data-path"
        );
        anyhow::bail!("dataset not found");
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    // Create app - if this fails, restore terminal first
    let mut app = match App::new(config) {
        Ok(a) => a,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to initialize application");
        }
    };

    // Main loop - wrap in a closure to ensure cleanup
    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop. The table never changes after load, so the loop
/// is purely event-driven.
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_input(key.code, key.modifiers);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
