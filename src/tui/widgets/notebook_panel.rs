//! Saved notes

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::answer_box::sources_line;
use crate::session::NotebookEntry;
use crate::tui::theme::Theme;

pub const EMPTY_NOTEBOOK: &str = "No saved notes yet. Press Ctrl+S to save an answer.";

/// Every saved question with its full answer, oldest first
pub struct NotebookPanel<'a> {
    entries: &'a [NotebookEntry],
    theme: &'a Theme,
}

impl<'a> NotebookPanel<'a> {
    pub fn new(entries: &'a [NotebookEntry], theme: &'a Theme) -> Self {
        Self { entries, theme }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        if self.entries.is_empty() {
            return vec![Line::styled(
                EMPTY_NOTEBOOK,
                Style::default().fg(self.theme.text_muted),
            )];
        }

        let label = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                lines.push(Line::styled("───", Style::default().fg(self.theme.border)));
            }
            lines.push(Line::from(vec![
                Span::styled("Q: ", label),
                Span::styled(
                    entry.question.trim().replace('\n', " "),
                    Style::default().fg(self.theme.text_primary),
                ),
            ]));
            for line in entry.answer.lines() {
                lines.push(Line::styled(
                    line,
                    Style::default().fg(self.theme.text_secondary),
                ));
            }
            if let Some(sources) = sources_line(&entry.sources) {
                lines.push(Line::styled(
                    sources,
                    Style::default()
                        .fg(self.theme.sources_fg)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
        }
        lines
    }
}

impl Widget for NotebookPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .title(format!(" Notebook ({}) ", self.entries.len()));

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Source;
    use crate::session::Notebook;

    #[test]
    fn test_empty_notebook_hint() {
        let theme = Theme::default();
        let lines = NotebookPanel::new(&[], &theme).lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), EMPTY_NOTEBOOK);
    }

    #[test]
    fn test_entries_listed_in_order() {
        let mut notebook = Notebook::default();
        notebook.add("first?".to_string(), "one\ntwo".to_string(), Vec::new());
        notebook.add(
            "second?".to_string(),
            "three".to_string(),
            vec![Source::from("doc1")],
        );

        let theme = Theme::default();
        let lines: Vec<String> = NotebookPanel::new(notebook.entries(), &theme)
            .lines()
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "Q: first?",
                "one",
                "two",
                "───",
                "Q: second?",
                "three",
                "Sources: doc1",
            ]
        );
    }
}
