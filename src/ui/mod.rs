//! Terminal User Interface components for covid-dash-tui.

pub mod chart;
mod help;
mod theme;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
