//! Terminal User Interface (TUI) for the research assistant
//!
//! Upload zone, question box, answer display, document list, and recent
//! questions, drawn with ratatui over crossterm.

pub mod app;
pub mod drop;
mod events;
pub mod theme;
pub mod widgets;

pub use app::{App, Focus, TuiApp, APP_TITLE};
pub use drop::parse_dropped_paths;
pub use events::{Event, EventHandler};
pub use theme::Theme;
