//! Recent questions panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::session::HistoryEntry;
use crate::tui::theme::Theme;

/// Answers longer than this are cut in the panel
pub const PREVIEW_CHARS: usize = 200;

/// The last `limit` entries, newest first
pub fn recent_entries(
    history: &[HistoryEntry],
    limit: usize,
) -> impl Iterator<Item = &HistoryEntry> {
    history.iter().rev().take(limit)
}

/// First `max_chars` characters of `text` followed by `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

pub struct HistoryPanel<'a> {
    history: &'a [HistoryEntry],
    limit: usize,
    theme: &'a Theme,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(history: &'a [HistoryEntry], limit: usize, theme: &'a Theme) -> Self {
        Self {
            history,
            limit,
            theme,
        }
    }
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .title(format!(" Recent Questions ({}) ", self.history.len()));

        let label = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        for entry in recent_entries(self.history, self.limit) {
            lines.push(Line::from(vec![
                Span::styled("Q: ", label),
                Span::styled(
                    entry.question.trim().replace('\n', " "),
                    Style::default().fg(self.theme.text_primary),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("A: ", label),
                Span::styled(
                    preview(&entry.answer, PREVIEW_CHARS),
                    Style::default().fg(self.theme.text_secondary),
                ),
            ]));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str) -> HistoryEntry {
        HistoryEntry {
            question: question.to_string(),
            answer: format!("answer to {}", question),
        }
    }

    #[test]
    fn test_recent_entries_newest_first() {
        let history: Vec<_> = (1..=7).map(|i| entry(&format!("q{}", i))).collect();
        let recent: Vec<_> = recent_entries(&history, 5)
            .map(|e| e.question.as_str())
            .collect();
        assert_eq!(recent, vec!["q7", "q6", "q5", "q4", "q3"]);
    }

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("short", 200), "short");
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        assert_eq!(preview("ééééé", 3), "ééé...");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("a\nb", 10), "a b");
    }
}
