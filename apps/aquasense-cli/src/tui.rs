//! Terminal User Interface for the interactive questionnaire.
//!
//! Provides a ratatui-based form for the ten questionnaire answers. Users
//! move between fields, type answers, and submit; invalid answers are shown
//! inline under each question.

use anyhow::{Context, Result};
use aquasense_core::{FieldKind, FormField, QuestionnaireWorkflow, SubmissionOutcome};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const HELP: &str = "↑/↓ or Tab move · type to answer · ←/→ yes/no · Enter submit · Esc quit";

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Submit,
    Quit,
}

/// Application state for the questionnaire TUI
struct QuestionnaireApp<'a> {
    /// Workflow holding the answers
    workflow: &'a QuestionnaireWorkflow,

    /// Index into `FormField::ALL`
    selected: usize,

    /// Status message
    status: String,
}

impl<'a> QuestionnaireApp<'a> {
    fn new(workflow: &'a QuestionnaireWorkflow) -> Self {
        Self {
            workflow,
            selected: 0,
            status: HELP.to_string(),
        }
    }

    fn field(&self) -> FormField {
        FormField::ALL[self.selected]
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) -> Action {
        let field = self.field();
        match key {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Enter => return Action::Submit,
            KeyCode::Down | KeyCode::Tab => {
                self.selected = (self.selected + 1) % FormField::ALL.len();
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = (self.selected + FormField::ALL.len() - 1) % FormField::ALL.len();
            }
            KeyCode::Left | KeyCode::Right if field.kind() == FieldKind::YesNo => {
                let next = match (self.workflow.form().get(field), key) {
                    ("yes", _) => "no",
                    ("no", _) => "yes",
                    (_, KeyCode::Left) => "yes",
                    _ => "no",
                };
                self.workflow.set(field, next);
            }
            KeyCode::Backspace => {
                let mut value = self.workflow.form().get(field).to_string();
                value.pop();
                self.workflow.set(field, value);
            }
            KeyCode::Char(c) => {
                let mut value = self.workflow.form().get(field).to_string();
                value.push(c);
                self.workflow.set(field, value);
            }
            _ => {}
        }
        Action::None
    }
}

/// Run the interactive questionnaire TUI
///
/// Returns `None` if the user quits before a submission leaves the form.
pub async fn run_questionnaire_tui(
    workflow: &QuestionnaireWorkflow,
) -> Result<Option<SubmissionOutcome>> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = QuestionnaireApp::new(workflow);

    // Run the event loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Run the main application loop
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut QuestionnaireApp<'_>,
) -> Result<Option<SubmissionOutcome>> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| anyhow::anyhow!("Failed to draw UI: {}", e))?;

        // Poll for events with timeout
        let action = if event::poll(std::time::Duration::from_millis(100))
            .context("Failed to poll events")?
            && let Event::Key(key) = event::read().context("Failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            app.handle_input(key.code)
        } else {
            Action::None
        };

        match action {
            Action::None => {}
            Action::Quit => return Ok(None),
            Action::Submit => {
                app.status = "Submitting...".to_string();
                terminal
                    .draw(|f| ui(f, app))
                    .map_err(|e| anyhow::anyhow!("Failed to draw UI: {}", e))?;

                match app.workflow.submit().await? {
                    SubmissionOutcome::ValidationFailed(errors) => {
                        app.status = format!("{} answer(s) need correcting. {}", errors.len(), HELP);
                        if let Some((field, _)) = errors.iter().next()
                            && let Some(pos) = FormField::ALL.iter().position(|f| *f == field)
                        {
                            app.selected = pos;
                        }
                    }
                    outcome => return Ok(Some(outcome)),
                }
            }
        }
    }
}

/// Render the UI
fn ui(frame: &mut Frame, app: &QuestionnaireApp<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Form
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "AquaSense Water Usage Questionnaire",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, app, chunks[1]);

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);
}

/// Render the questions with their answers and inline errors
fn render_form(frame: &mut Frame, app: &QuestionnaireApp<'_>, area: ratatui::layout::Rect) {
    let form = app.workflow.form();
    let errors = app.workflow.errors();

    let mut lines = Vec::new();
    for (idx, field) in FormField::ALL.into_iter().enumerate() {
        let selected = idx == app.selected;
        let marker = if selected { "> " } else { "  " };
        let label_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let value = form.get(field);
        let shown = match (value.is_empty(), field.kind()) {
            (true, FieldKind::YesNo) => "(yes/no)".to_string(),
            (true, FieldKind::Numeric) => "_".to_string(),
            _ => value.to_string(),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{} ", field.label()), label_style),
            Span::styled(shown, Style::default().fg(Color::White)),
        ]));
        if let Some(message) = errors.get(field) {
            lines.push(Line::from(Span::styled(
                format!("    {message}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let body = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Questions"))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}
