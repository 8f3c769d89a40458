//! Event Handling
//!
//! Keyboard handling for the progress screen.

use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// What the main loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Quit,
    None,
}

/// Poll for a key press, waiting at most one UI tick
pub fn handle_events(app: &mut App) -> Result<Action> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key_event(app, key.code, key.modifiers));
            }
        }
    }
    Ok(Action::None)
}

pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Ctrl+C stops the campaign (if any) and leaves once the current item is done
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.request_stop();
        return Action::Quit;
    }

    match app.mode {
        Mode::Confirm => handle_confirm_mode(app, code),
        Mode::Running => handle_running_mode(app, code),
        Mode::Finished => handle_finished_mode(app, code),
    }
}

fn handle_confirm_mode(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => Action::Quit,
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.toggle_confirm_selection();
            Action::None
        },
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.confirm();
            Action::Start
        },
        KeyCode::Enter => {
            if app.confirm_selected_yes {
                app.confirm();
                Action::Start
            } else {
                Action::Quit
            }
        },
        _ => Action::None,
    }
}

fn handle_running_mode(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('s') | KeyCode::Esc => app.request_stop(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_log_up(1),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_log_down(1),
        KeyCode::PageUp => app.scroll_log_up(10),
        KeyCode::PageDown => app.scroll_log_down(10),
        _ => {},
    }
    Action::None
}

fn handle_finished_mode(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => return Action::Quit,
        KeyCode::Char('k') | KeyCode::Up => app.scroll_log_up(1),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_log_down(1),
        KeyCode::PageUp => app.scroll_log_up(10),
        KeyCode::PageDown => app.scroll_log_down(10),
        KeyCode::Home => app.log_scroll = app.log.len().saturating_sub(1),
        KeyCode::End => app.log_scroll = 0,
        _ => {},
    }
    Action::None
}
