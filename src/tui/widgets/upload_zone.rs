//! Upload drop zone
//!
//! Shows how to drop a file, the path being typed, and the upload status.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::session::upload::{UPLOAD_FAILED_STATUS, UPLOADING_STATUS};
use crate::session::UploadState;
use crate::tui::theme::Theme;

pub const DROP_HINT: &str =
    "Drag & drop a PDF or DOCX file here (or type its path and press Enter) to upload and process";

pub struct UploadZone<'a> {
    state: &'a UploadState,
    active_document: Option<&'a str>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> UploadZone<'a> {
    pub fn new(state: &'a UploadState, theme: &'a Theme) -> Self {
        Self {
            state,
            active_document: None,
            focused: false,
            theme,
        }
    }

    pub fn active_document(mut self, name: Option<&'a str>) -> Self {
        self.active_document = name;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn status_style(&self) -> Style {
        match self.state.status() {
            UPLOADING_STATUS => Style::default().fg(self.theme.warning),
            UPLOAD_FAILED_STATUS => Style::default().fg(self.theme.error),
            _ => Style::default().fg(self.theme.success),
        }
    }
}

impl Widget for UploadZone<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut title = String::from(" Upload ");
        if let Some(doc) = self.active_document {
            title = format!(" Upload (active: {}) ", doc);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(self.theme.border_for(self.focused)))
            .title(title);

        let mut lines = vec![Line::styled(
            DROP_HINT,
            Style::default().fg(self.theme.text_secondary),
        )];

        if self.focused || !self.state.path_draft().is_empty() {
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::styled(
                    self.state.path_draft(),
                    Style::default().fg(self.theme.text_primary),
                ),
                Span::styled(
                    " ",
                    Style::default().add_modifier(if self.focused {
                        Modifier::REVERSED
                    } else {
                        Modifier::empty()
                    }),
                ),
            ]));
        }

        if !self.state.status().is_empty() {
            lines.push(Line::styled(self.state.status(), self.status_style()));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
