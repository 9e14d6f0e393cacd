//! Documents known to the backend

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::backend::DocumentInfo;
use crate::tui::theme::Theme;

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`
pub fn fit_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().filter_map(|c| c.width()).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub struct DocumentsPanel<'a> {
    documents: &'a [DocumentInfo],
    selected: usize,
    warning: Option<&'a str>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> DocumentsPanel<'a> {
    pub fn new(documents: &'a [DocumentInfo], theme: &'a Theme) -> Self {
        Self {
            documents,
            selected: 0,
            warning: None,
            focused: false,
            theme,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn warning(mut self, warning: Option<&'a str>) -> Self {
        self.warning = warning;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for DocumentsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_for(self.focused)))
            .title(" Documents ");
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width.saturating_sub(2) as usize;
        let mut lines = Vec::new();
        if let Some(warning) = self.warning {
            lines.push(Line::styled(
                fit_width(warning, inner.width as usize),
                Style::default().fg(self.theme.warning),
            ));
        } else if self.documents.is_empty() {
            lines.push(Line::styled(
                "No documents",
                Style::default().fg(self.theme.text_muted),
            ));
        }

        for (i, doc) in self.documents.iter().enumerate() {
            let is_selected = self.focused && i == self.selected;
            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text_primary)
            };
            lines.push(Line::from(vec![
                Span::styled(if is_selected { "> " } else { "  " }, style),
                Span::styled(fit_width(doc.display_name(), width), style),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
