//! ora: terminal client for an offline research assistant
//!
//! This library provides:
//! - A client for the answering backend (ask, upload, list and remove documents)
//! - Session state with latest-request-wins handling of responses
//! - A notebook of saved answers with JSON export
//! - Terminal UI (TUI) with upload zone, question box, and answer display

pub mod assistant;
pub mod backend;
pub mod config;
pub mod logging;
pub mod session;
pub mod transport;
pub mod tui;

pub use assistant::Assistant;
pub use config::{ClientConfig, Config};
