//! Keyboard input handling.
//!
//! Overlays capture input first (help, then the auth dialog, then the search
//! box); everything else goes to the browse bindings.

use crate::app::{App, AppEvent};
use crate::auth::AuthMode;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Main input dispatch function.
pub fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    if app.auth_form.is_some() {
        handle_dialog_input(app, code, event_tx);
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code, event_tx);
        return Action::Continue;
    }

    handle_browse_input(app, code, event_tx)
}

fn handle_dialog_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => app.close_auth_dialog(),
        KeyCode::Enter => app.submit_auth(event_tx),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            if let Some(form) = app.auth_form.as_mut() {
                form.toggle_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.auth_form.as_mut() {
                form.pop_char();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.auth_form.as_mut() {
                if !form.submitting {
                    form.push_char(c);
                }
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input.clear();
        }
        KeyCode::Enter => {
            app.submit_search(event_tx);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}

fn handle_browse_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app.feed.filter().query().to_string();
        }
        KeyCode::Char('0') => app.show_all(event_tx),
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            app.select_category(index, event_tx);
        }
        KeyCode::Char(']') => app.cycle_category(true, event_tx),
        KeyCode::Char('[') => app.cycle_category(false, event_tx),
        KeyCode::Char('r') => app.retry(event_tx),
        KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('L') => open_dialog(app, AuthMode::Login),
        KeyCode::Char('R') => open_dialog(app, AuthMode::Register),
        KeyCode::Char('X') => {
            if !app.logout(event_tx) && app.nav.is_pending() {
                app.set_status("Checking session...");
            }
        }
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn open_dialog(app: &mut App, mode: AuthMode) {
    if !app.open_auth_dialog(mode) && app.nav.is_pending() {
        app.set_status("Checking session...");
    }
}
