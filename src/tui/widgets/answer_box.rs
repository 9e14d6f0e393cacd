//! Answer display
//!
//! Pure rendering of the current answer and its sources; it holds no state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::backend::Source;
use crate::tui::theme::Theme;

pub const ANSWER_PLACEHOLDER: &str = "Your answer will appear here.";

/// The sources line, or `None` when there are no sources
pub fn sources_line(sources: &[Source]) -> Option<String> {
    if sources.is_empty() {
        return None;
    }
    let labels: Vec<&str> = sources.iter().map(Source::label).collect();
    Some(format!("Sources: {}", labels.join(", ")))
}

pub struct AnswerBox<'a> {
    answer: &'a str,
    sources: &'a [Source],
    reasoning: Option<&'a str>,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> AnswerBox<'a> {
    pub fn new(answer: &'a str, sources: &'a [Source], theme: &'a Theme) -> Self {
        Self {
            answer,
            sources,
            reasoning: None,
            loading: false,
            theme,
        }
    }

    pub fn reasoning(mut self, reasoning: Option<&'a str>) -> Self {
        self.reasoning = reasoning;
        self
    }

    /// Only affects the border title
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    fn text(&self) -> Text<'a> {
        let mut text = if self.answer.is_empty() {
            Text::styled(
                ANSWER_PLACEHOLDER,
                Style::default().fg(self.theme.text_muted),
            )
        } else {
            // Text::styled splits on '\n', so line breaks survive
            Text::styled(self.answer, Style::default().fg(self.theme.text_primary))
        };

        if let Some(reasoning) = self.reasoning {
            text.push_line(Line::default());
            for line in reasoning.lines() {
                text.push_line(Line::styled(
                    line.to_string(),
                    Style::default()
                        .fg(self.theme.text_muted)
                        .add_modifier(Modifier::DIM),
                ));
            }
        }

        if let Some(sources) = sources_line(self.sources) {
            text.push_line(Line::default());
            text.push_line(Line::styled(
                sources,
                Style::default()
                    .fg(self.theme.sources_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        for source in self.sources {
            let Some(citation) = source.citation() else {
                continue;
            };
            text.push_line(Line::styled(
                format!("- {}", citation),
                Style::default().fg(self.theme.sources_fg),
            ));
            for line in source.snippet().into_iter().flat_map(str::lines) {
                text.push_line(Line::styled(
                    format!("  {}", line),
                    Style::default()
                        .fg(self.theme.text_muted)
                        .add_modifier(Modifier::DIM),
                ));
            }
        }
        text
    }
}

impl Widget for AnswerBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.loading {
            " Answer (waiting...) "
        } else {
            " Answer "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .title(title);

        Paragraph::new(self.text())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
