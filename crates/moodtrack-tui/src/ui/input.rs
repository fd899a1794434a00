//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_comment_char, can_add_password_char, can_add_username_char, App, AppState, LoginFocus,
    Tab,
};

/// Move a list selection one row, staying within `len`
fn move_selection(selection: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *selection = 0;
    } else if down {
        *selection = (*selection + 1).min(len - 1);
    } else {
        *selection = selection.saturating_sub(1);
    }
}

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::EditingComment => {
            handle_comment_input(app, key);
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(tab) = app.tabs().get(index).copied() {
                app.select_tab(tab);
            }
        }
        KeyCode::Left => app.prev_tab(),
        KeyCode::Right => app.next_tab(),
        KeyCode::Char('u') => app.refresh(),
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('[') => app.change_page(false),
        KeyCode::Char(']') => app.change_page(true),
        _ => match app.current_tab {
            Tab::Today => handle_today_input(app, key),
            Tab::History => handle_history_input(app, key),
            Tab::Team => handle_team_input(app, key),
            Tab::Units => handle_units_input(app, key),
        },
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                // On failure login_error is set and the form stays up
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.chars().count(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_comment_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Backspace => {
            app.comment.pop();
        }
        KeyCode::Char(c) => {
            if can_add_comment_char(app.comment.chars().count(), c) {
                app.comment.push(c);
            }
        }
        _ => {}
    }
}

fn handle_today_input(app: &mut App, key: KeyEvent) {
    let type_count = app
        .dashboard
        .as_ref()
        .map(|d| d.personal().emotion_types.len())
        .unwrap_or(0);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.emotion_selection, type_count, false),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.emotion_selection, type_count, true),
        KeyCode::Char('c') => app.state = AppState::EditingComment,
        KeyCode::Enter => app.submit_selected_emotion(),
        _ => {}
    }
}

fn handle_history_input(app: &mut App, key: KeyEvent) {
    let len = app.history.results.len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.history_selection, len, false),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.history_selection, len, true),
        _ => {}
    }
}

fn handle_team_input(app: &mut App, key: KeyEvent) {
    let len = app.team.results.len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.team_selection, len, false),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.team_selection, len, true),
        _ => {}
    }
}

fn handle_units_input(app: &mut App, key: KeyEvent) {
    let len = app.current_section().map(|s| s.units.len()).unwrap_or(0);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(&mut app.unit_selection, len, false),
        KeyCode::Down | KeyCode::Char('j') => move_selection(&mut app.unit_selection, len, true),
        KeyCode::Char('s') => app.cycle_section(),
        KeyCode::Char('r') => app.download_selected_report(),
        _ => {}
    }
}
