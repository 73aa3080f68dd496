//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation between the form and the result
//! - Input event handling
//! - Synchronous assessment on submit

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::ArtifactAssessmentService;
use crate::domain::FeatureImportance;
use crate::CardioscanError;

use super::ui::{
    form::{render_form, FormState},
    importance::{render_importance, TOP_FEATURES},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    service: ArtifactAssessmentService,
    form: FormState,
    result: ResultState,

    /// Importances are fixed for the loaded model; computed once.
    importances: Option<Vec<FeatureImportance>>,
    show_importance: bool,
}

impl App {
    #[must_use]
    pub fn new(service: ArtifactAssessmentService) -> Self {
        let importances = service.top_feature_importances(TOP_FEATURES);
        Self {
            screen: Screen::Form,
            should_quit: false,
            service,
            form: FormState::default(),
            result: ResultState::default(),
            importances,
            show_importance: false,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let (main, side) = if self.show_importance {
                    let halves = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
                        .split(chunks[0]);
                    (halves[0], Some(halves[1]))
                } else {
                    (chunks[0], None)
                };

                match self.screen {
                    Screen::Form => render_form(f, main, &self.form),
                    Screen::Result => render_result(f, main, &self.result, self.show_importance),
                }
                if let Some(side) = side {
                    render_importance(f, side, self.importances.as_deref());
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.cycle(false),
            KeyCode::Right | KeyCode::Char(' ') => self.form.cycle(true),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Enter => self.submit(),
            KeyCode::Char('i') | KeyCode::Char('I') => self.show_importance = !self.show_importance,
            KeyCode::Char('r') | KeyCode::Char('R') => self.form.clear_sensitive(),
            KeyCode::Esc => self.form.error_message = None,
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => self.screen = Screen::Form,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form.clear_sensitive();
                self.result = ResultState::Empty;
                self.screen = Screen::Form;
            }
            KeyCode::Char('i') | KeyCode::Char('I') => self.show_importance = !self.show_importance,
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn submit(&mut self) {
        let input = match self.form.to_clinical_input() {
            Ok(input) => input,
            Err(message) => {
                self.form.error_message = Some(message);
                return;
            }
        };

        match self.service.assess(&input) {
            Ok(assessment) => {
                self.result = ResultState::Complete(assessment);
                self.screen = Screen::Result;
                // Typed values do not outlive the submission.
                self.form.clear_sensitive();
            }
            // Out-of-range values stay on the form so they can be corrected.
            Err(CardioscanError::Encoding(e)) => {
                self.form.error_message = Some(e.to_string());
            }
            Err(e) => {
                self.result = ResultState::Error(e.to_string());
                self.screen = Screen::Result;
            }
        }
    }
}
