//! Status bar widget
//!
//! One line with the request state, the ask endpoint, the notebook size,
//! the latest notice, and key hints for the focused panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::Focus;
use crate::tui::theme::Theme;

pub struct StatusBar<'a> {
    focus: Focus,
    loading: bool,
    endpoint: &'a str,
    notebook_len: usize,
    notice: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(endpoint: &'a str, theme: &'a Theme) -> Self {
        Self {
            focus: Focus::default(),
            loading: false,
            endpoint,
            notebook_len: 0,
            notice: None,
            theme,
        }
    }

    pub fn focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn notebook_len(mut self, len: usize) -> Self {
        self.notebook_len = len;
        self
    }

    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }
}

/// Key hints for the focused panel
pub fn key_hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Query => {
            "Enter ask · Alt+Enter newline · Tab focus · ^S save · ^N notes · ^E export · ^Q quit"
        }
        Focus::Upload => "Paste/drop or type a path · Enter upload · Tab focus · ^Q quit",
        Focus::Documents => "↑/↓ select · Del remove · r refresh · Tab focus · ^Q quit",
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (state, state_style) = if self.loading {
            ("● asking", Style::default().fg(self.theme.warning))
        } else {
            ("○ idle", Style::default().fg(self.theme.success))
        };

        let mut spans = vec![
            Span::styled(state, state_style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" │ {} │ notebook: {}", self.endpoint, self.notebook_len),
                Style::default().fg(self.theme.text_secondary),
            ),
        ];
        if let Some(notice) = self.notice {
            spans.push(Span::styled(
                format!(" │ {}", notice),
                Style::default().fg(self.theme.accent),
            ));
        }
        spans.push(Span::styled(
            format!(" │ {}", key_hints(self.focus)),
            Style::default().fg(self.theme.text_muted),
        ));

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
