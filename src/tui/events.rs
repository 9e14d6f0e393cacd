//! Terminal event polling
//!
//! Wraps crossterm so the app loop sees keys, bracketed pastes (which is
//! how terminals deliver dropped files), resizes, and ticks.

use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
    Resize(u16, u16),
    /// Poll interval elapsed with nothing to read
    Tick,
}

#[derive(Debug)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Wait up to one tick for the next event
    pub fn poll(&self) -> anyhow::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(Self::convert(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }

    fn convert(event: event::Event) -> Event {
        match event {
            // Release/repeat events are reported on some platforms; only presses count
            event::Event::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            event::Event::Paste(text) => Event::Paste(text),
            event::Event::Resize(cols, rows) => Event::Resize(cols, rows),
            _ => Event::Tick,
        }
    }
}

impl Event {
    /// Ctrl-C or Ctrl-Q; a bare `q` is text in this app
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }

    /// Alt+Enter or Ctrl+J insert a newline instead of submitting
    pub fn is_newline(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::ALT,
                ..
            }) | Event::Key(KeyEvent {
                code: KeyCode::Char('j'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        assert!(key(KeyCode::Char('c'), KeyModifiers::CONTROL).is_quit());
        assert!(key(KeyCode::Char('q'), KeyModifiers::CONTROL).is_quit());
        assert!(!key(KeyCode::Char('q'), KeyModifiers::NONE).is_quit());
    }

    #[test]
    fn test_newline_keys() {
        assert!(key(KeyCode::Enter, KeyModifiers::ALT).is_newline());
        assert!(key(KeyCode::Char('j'), KeyModifiers::CONTROL).is_newline());
        assert!(!key(KeyCode::Enter, KeyModifiers::NONE).is_newline());
    }

    #[test]
    fn test_release_events_become_ticks() {
        let release = event::Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(EventHandler::convert(release), Event::Tick);
    }

    #[test]
    fn test_paste_passes_through() {
        let paste = event::Event::Paste("/tmp/a.pdf".to_string());
        assert_eq!(
            EventHandler::convert(paste),
            Event::Paste("/tmp/a.pdf".to_string())
        );
    }
}
