//! Query widget
//!
//! A multi-line question draft with a submit control. Submission is refused
//! while the draft is blank or while the parent reports a request in flight.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::tui::theme::Theme;

pub const QUERY_PLACEHOLDER: &str = "Type your question here...";
pub const ASK_LABEL: &str = "Ask";
pub const LOADING_LABEL: &str = "Loading...";

/// Label of the submit control for the given loading state
pub fn submit_label(loading: bool) -> &'static str {
    if loading {
        LOADING_LABEL
    } else {
        ASK_LABEL
    }
}

/// The question being typed
#[derive(Debug, Default, Clone)]
pub struct QueryDraft {
    content: String,
    /// Cursor position (byte offset)
    cursor: usize,
}

impl QueryDraft {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether submitting would be rejected as blank
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.content.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn delete_char_before(&mut self) {
        if let Some((prev, _)) = self.content[..self.cursor].char_indices().last() {
            self.content.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete_char_at(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some((prev, _)) = self.content[..self.cursor].char_indices().last() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Move to the start of the current line
    pub fn move_home(&mut self) {
        self.cursor = self.content[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// Move to the end of the current line
    pub fn move_end(&mut self) {
        self.cursor = self.content[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.content.len());
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the draft for submission
    ///
    /// Returns `None` without touching anything when the draft is blank or a
    /// request is in flight. Otherwise returns the raw, untrimmed text; the
    /// draft is kept unless `clear` is set.
    pub fn submit(&mut self, loading: bool, clear: bool) -> Option<String> {
        if loading || self.is_blank() {
            return None;
        }
        let question = self.content.clone();
        if clear {
            self.clear();
        }
        Some(question)
    }
}

/// Renders the draft with an inline cursor and the submit control
pub struct QueryBox<'a> {
    draft: &'a QueryDraft,
    loading: bool,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QueryBox<'a> {
    pub fn new(draft: &'a QueryDraft, theme: &'a Theme) -> Self {
        Self {
            draft,
            loading: false,
            focused: false,
            theme,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn draft_lines(&self) -> Vec<Line<'a>> {
        let text_style = Style::default().fg(self.theme.text_primary);
        if self.draft.content().is_empty() {
            let mut spans = Vec::new();
            if self.focused {
                spans.push(Span::styled(" ", text_style.add_modifier(Modifier::REVERSED)));
            }
            spans.push(Span::styled(
                QUERY_PLACEHOLDER,
                Style::default().fg(self.theme.text_muted),
            ));
            return vec![Line::from(spans)];
        }

        let content: &'a str = self.draft.content();
        let cursor = self.draft.cursor().min(content.len());
        let mut lines = Vec::new();
        let mut offset = 0;
        for raw in content.split('\n') {
            let start = offset;
            let end = start + raw.len();
            offset = end + 1;

            if !self.focused || cursor < start || cursor > end {
                lines.push(Line::styled(raw, text_style));
                continue;
            }

            let (before, rest) = raw.split_at(cursor - start);
            let mut chars = rest.chars();
            let under = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
            lines.push(Line::from(vec![
                Span::styled(before, text_style),
                Span::styled(under, text_style.add_modifier(Modifier::REVERSED)),
                Span::styled(chars.as_str(), text_style),
            ]));
        }
        lines
    }
}

impl Widget for QueryBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = submit_label(self.loading);
        let button_style = if self.loading {
            Style::default().fg(self.theme.text_muted)
        } else {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_for(self.focused)))
            .title(" Question ")
            .title_bottom(
                Line::from(Span::styled(format!("[ {} ]", label), button_style))
                    .alignment(Alignment::Right),
            );

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        Paragraph::new(self.draft_lines())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
