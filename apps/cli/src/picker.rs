//! Interactive version picker: a ratatui list in the alternate screen.

use std::io;
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use laradocs_core::VersionPicker;
use laradocs_shared::{LaradocsError, Result, Version};

/// Lets the user choose a version with the arrow keys.
pub(crate) struct TerminalPicker;

impl VersionPicker for TerminalPicker {
    fn pick(&self, versions: &[Version]) -> Result<Option<Version>> {
        if versions.is_empty() {
            return Ok(None);
        }

        let choice = run(versions).map_err(|e| LaradocsError::Terminal(e.to_string()))?;
        Ok(choice.map(|i| versions[i].clone()))
    }
}

/// Result of one key press.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Confirm(usize),
    Cancel,
}

struct PickerState {
    selected: usize,
    len: usize,
}

impl PickerState {
    fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Step {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Step::Cancel,
            KeyCode::Esc | KeyCode::Char('q') => Step::Cancel,
            KeyCode::Enter => Step::Confirm(self.selected),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Step::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.len {
                    self.selected += 1;
                }
                Step::Continue
            }
            KeyCode::Home => {
                self.selected = 0;
                Step::Continue
            }
            KeyCode::End => {
                self.selected = self.len.saturating_sub(1);
                Step::Continue
            }
            _ => Step::Continue,
        }
    }
}

/// Leaves raw mode and the alternate screen when dropped, panics included.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

fn run(versions: &[Version]) -> io::Result<Option<usize>> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut state = PickerState::new(versions.len());

    loop {
        terminal.draw(|f| draw(f, versions, &state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match state.handle_key(key.code, key.modifiers) {
                    Step::Continue => {}
                    Step::Confirm(i) => return Ok(Some(i)),
                    Step::Cancel => return Ok(None),
                }
            }
        }
    }
}

fn draw(f: &mut Frame, versions: &[Version], state: &PickerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // List
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    let items: Vec<ListItem> = versions
        .iter()
        .map(|v| ListItem::new(v.name.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Select a Laravel version "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    let hints = Paragraph::new("↑/↓ move   Enter select   Esc cancel")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hints, chunks[1]);
}
