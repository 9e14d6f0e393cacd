//! TUI application
//!
//! [`App`] routes terminal events to the three leaf widgets and the root
//! [`Assistant`], and lays the screen out. [`TuiApp`] owns the terminal and
//! runs the loop.

use std::io::{self, Stdout};
use std::panic;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend as TerminalBackend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::{Frame, Terminal};

use super::drop::parse_dropped_paths;
use super::events::{Event, EventHandler};
use super::theme::Theme;
use super::widgets::{
    AnswerBox, DocumentsPanel, HistoryPanel, NotebookPanel, QueryBox, QueryDraft, StatusBar,
    UploadZone,
};
use crate::assistant::Assistant;
use crate::session::RequestToken;

pub const APP_TITLE: &str = "Offline Research Assistant";

/// Panel receiving keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Query,
    Upload,
    Documents,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Query => Self::Upload,
            Self::Upload => Self::Documents,
            Self::Documents => Self::Query,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Query => Self::Documents,
            Self::Upload => Self::Query,
            Self::Documents => Self::Upload,
        }
    }
}

#[derive(Debug)]
pub struct App {
    assistant: Assistant,
    query: QueryDraft,
    focus: Focus,
    selected_document: usize,
    show_notebook: bool,
    should_quit: bool,
    theme: Theme,
}

impl App {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            query: QueryDraft::default(),
            focus: Focus::default(),
            selected_document: 0,
            show_notebook: false,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn assistant_mut(&mut self) -> &mut Assistant {
        &mut self.assistant
    }

    pub fn query(&self) -> &QueryDraft {
        &self.query
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether the notebook replaces the answer display
    pub fn showing_notebook(&self) -> bool {
        self.show_notebook
    }

    /// Handle one terminal event; returns true when a redraw is needed
    pub fn handle_event(&mut self, event: Event) -> bool {
        if event.is_quit() {
            self.should_quit = true;
            return true;
        }

        let newline = event.is_newline();
        match event {
            Event::Key(key) => {
                self.assistant.session_mut().clear_notice();
                if newline {
                    if self.focus == Focus::Query {
                        self.query.insert_char('\n');
                    }
                } else {
                    self.handle_key(key);
                }
                true
            }
            Event::Paste(text) => {
                self.handle_paste(&text);
                true
            }
            Event::Resize(_, _) => true,
            Event::Tick => self.assistant.drain_events() > 0,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Tab, _) => self.focus = self.focus.next(),
            (KeyCode::BackTab, _) => self.focus = self.focus.previous(),
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                if !self.assistant.save_to_notebook() {
                    self.assistant
                        .session_mut()
                        .set_notice("Nothing to save yet");
                }
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.assistant.export_notebook();
            }
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                self.show_notebook = !self.show_notebook;
            }
            _ => match self.focus {
                Focus::Query => self.handle_query_key(key),
                Focus::Upload => self.handle_upload_key(key),
                Focus::Documents => self.handle_documents_key(key),
            },
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                self.submit_query();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.query.clear(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.query.insert_char(c)
            }
            (KeyCode::Backspace, _) => self.query.delete_char_before(),
            (KeyCode::Delete, _) => self.query.delete_char_at(),
            (KeyCode::Left, _) => self.query.move_left(),
            (KeyCode::Right, _) => self.query.move_right(),
            (KeyCode::Home, _) => self.query.move_home(),
            (KeyCode::End, _) => self.query.move_end(),
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                let typed = self.assistant.upload_mut().take_path_draft();
                self.drop_text(&typed);
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.assistant.upload_mut().push_path_char(c)
            }
            (KeyCode::Backspace, _) => self.assistant.upload_mut().pop_path_char(),
            _ => {}
        }
    }

    fn handle_documents_key(&mut self, key: KeyEvent) {
        let count = self.assistant.session().documents().len();
        match key.code {
            KeyCode::Up => self.selected_document = self.selected_document.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_document + 1 < count {
                    self.selected_document += 1;
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                let documents = self.assistant.session().documents();
                if let Some(doc) = documents.get(self.selected_document) {
                    let name = doc.display_name().to_string();
                    self.assistant.remove_document(name);
                }
            }
            KeyCode::Char('r') => self.assistant.refresh_documents(),
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str) {
        match self.focus {
            Focus::Query => self.query.insert_str(text),
            Focus::Upload => {
                self.drop_text(text);
            }
            Focus::Documents => {}
        }
    }

    /// Submit the draft through the query widget's validation
    pub fn submit_query(&mut self) -> Option<RequestToken> {
        let loading = self.assistant.session().is_loading();
        let clear = self.assistant.config().clear_draft_on_submit;
        let question = self.query.submit(loading, clear)?;
        Some(self.assistant.ask(question))
    }

    /// Treat `text` as a file drop
    pub fn drop_text(&mut self, text: &str) -> Option<RequestToken> {
        self.assistant.drop_files(parse_dropped_paths(text))
    }

    pub fn render(&self, frame: &mut Frame) {
        let theme = &self.theme;
        let session = self.assistant.session();
        let loading = session.is_loading();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(5), // Upload zone
                Constraint::Min(8),    // Query, answer, side panels
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        frame.render_widget(
            Line::styled(
                APP_TITLE,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            rows[0],
        );

        frame.render_widget(
            UploadZone::new(self.assistant.upload(), theme)
                .active_document(session.active_document())
                .focused(self.focus == Focus::Upload),
            rows[1],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[2]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(3)])
            .split(columns[0]);

        frame.render_widget(
            QueryBox::new(&self.query, theme)
                .loading(loading)
                .focused(self.focus == Focus::Query),
            main[0],
        );
        if self.show_notebook {
            frame.render_widget(
                NotebookPanel::new(session.notebook().entries(), theme),
                main[1],
            );
        } else {
            frame.render_widget(
                AnswerBox::new(session.answer(), session.sources(), theme)
                    .reasoning(session.reasoning())
                    .loading(loading),
                main[1],
            );
        }

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);

        let documents = session.documents();
        let last_document = documents.len().saturating_sub(1);
        frame.render_widget(
            DocumentsPanel::new(documents, theme)
                .selected(self.selected_document.min(last_document))
                .warning(session.documents_warning())
                .focused(self.focus == Focus::Documents),
            side[0],
        );
        frame.render_widget(
            HistoryPanel::new(
                session.history(),
                self.assistant.config().recent_history,
                theme,
            ),
            side[1],
        );

        frame.render_widget(
            StatusBar::new(self.assistant.config().ask_url.as_str(), theme)
                .focus(self.focus)
                .loading(loading)
                .notebook_len(session.notebook().len())
                .notice(session.notice()),
            rows[3],
        );
    }
}

/// Owns the terminal and drives [`App`]
pub struct TuiApp<B: TerminalBackend> {
    terminal: Terminal<B>,
    app: App,
    events: EventHandler,
}

impl<B: TerminalBackend> TuiApp<B> {
    pub fn new(terminal: Terminal<B>, app: App, events: EventHandler) -> Self {
        Self {
            terminal,
            app,
            events,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn draw(&mut self) -> anyhow::Result<()> {
        let app = &self.app;
        self.terminal.draw(|frame| app.render(frame))?;
        Ok(())
    }

    /// Run until the user quits
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.app.assistant_mut().drain_events();
            self.draw()?;

            let event = self.events.poll()?;
            self.app.handle_event(event);
            if self.app.should_quit() {
                tracing::info!("Quitting");
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Take over the real terminal
    ///
    /// Bracketed paste is enabled so dropped files arrive as one paste.
    pub fn start(app: App, events: EventHandler) -> anyhow::Result<Self> {
        Self::install_panic_hook();
        let terminal = Self::setup_terminal()?;
        Ok(Self::new(terminal, app, events))
    }

    /// Install a panic hook that restores the terminal before panicking
    fn install_panic_hook() {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = Self::restore_terminal_static();
            original_hook(panic_info);
        }));
    }

    fn restore_terminal_static() -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste)?;
        Ok(())
    }

    fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(Terminal::new(CrosstermBackend::new(stdout))?)
    }

    /// Restore the terminal to its original state
    pub fn restore_terminal(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
