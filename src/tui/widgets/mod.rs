//! UI widgets for the TUI
//!
//! Each widget borrows the state it draws and renders it into a buffer.

mod answer_box;
mod documents_panel;
mod history_panel;
mod notebook_panel;
mod query_box;
mod status_bar;
mod upload_zone;

pub use answer_box::{sources_line, AnswerBox, ANSWER_PLACEHOLDER};
pub use documents_panel::{fit_width, DocumentsPanel};
pub use history_panel::{preview, recent_entries, HistoryPanel, PREVIEW_CHARS};
pub use notebook_panel::{NotebookPanel, EMPTY_NOTEBOOK};
pub use query_box::{
    submit_label, QueryBox, QueryDraft, ASK_LABEL, LOADING_LABEL, QUERY_PLACEHOLDER,
};
pub use status_bar::{key_hints, StatusBar};
pub use upload_zone::{UploadZone, DROP_HINT};
