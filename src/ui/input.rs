//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Network work is spawned by the app layer; the
//! handlers here never block.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_password_char, can_add_username_char, App, AppState, Focus, LoginFocus, Tab,
    PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => {
            handle_login_input(app, key);
            return Ok(false);
        }
        AppState::Form => {
            handle_form_input(app, key);
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
        AppState::ConfirmingCancel => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.confirm_cancel_booking();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
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
        KeyCode::Char('1') => app.switch_tab(Tab::Cars),
        KeyCode::Char('2') => app.switch_tab(Tab::News),
        KeyCode::Char('3') => app.switch_tab(Tab::Contact),
        KeyCode::Char('4') => app.switch_tab(Tab::Bookings),
        KeyCode::Char('5') => app.switch_tab(Tab::Favorites),
        KeyCode::Char('6') => app.switch_tab(Tab::Dashboard),
        KeyCode::Left => {
            let prev = app.current_tab.prev();
            app.switch_tab(prev);
        }
        KeyCode::Right => {
            let next = app.current_tab.next();
            app.switch_tab(next);
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Up => move_selection(app, -1),
        KeyCode::Down => move_selection(app, 1),
        KeyCode::PageUp => move_selection(app, -(PAGE_SCROLL_SIZE as i64)),
        KeyCode::PageDown => move_selection(app, PAGE_SCROLL_SIZE as i64),
        KeyCode::Char('u') => app.refresh_current_tab(),
        KeyCode::Char('l') => {
            if !app.is_authenticated() {
                app.start_login();
            }
        }
        KeyCode::Char('g') => {
            if !app.is_authenticated() {
                app.open_register();
            }
        }
        KeyCode::Char('o') => {
            if app.is_authenticated() {
                app.logout();
            }
        }
        _ => handle_tab_input(app, key),
    }

    Ok(false)
}

/// Keys specific to the current tab.
fn handle_tab_input(app: &mut App, key: KeyEvent) {
    match app.current_tab {
        Tab::Cars => match key.code {
            KeyCode::Char('b') => app.start_booking(),
            KeyCode::Char('f') => app.toggle_favorite(),
            KeyCode::Char('t') => app.cycle_type_filter(),
            KeyCode::Char('s') => app.cycle_seats_filter(),
            KeyCode::Char('r') => app.reset_filters(),
            KeyCode::Char('/') => app.open_search(),
            KeyCode::Enter => {
                app.focus = Focus::Detail;
                app.load_car_detail();
            }
            _ => {}
        },
        Tab::Favorites => match key.code {
            KeyCode::Char('b') => app.start_booking(),
            KeyCode::Char('f') => app.toggle_favorite(),
            KeyCode::Enter => {
                app.focus = Focus::Detail;
                app.load_car_detail();
            }
            _ => {}
        },
        Tab::Bookings => match key.code {
            KeyCode::Char('c') => app.request_cancel_booking(),
            KeyCode::Enter => app.load_booking_detail(),
            _ => {}
        },
        Tab::Dashboard => {
            if key.code == KeyCode::Char('p') {
                app.open_profile();
            }
        }
        Tab::Contact => {
            if key.code == KeyCode::Enter {
                app.open_contact();
            }
        }
        Tab::News => match key.code {
            KeyCode::Enter => {
                app.focus = Focus::Detail;
                app.load_news_detail();
            }
            KeyCode::Char('m') => app.load_more_news(),
            _ => {}
        },
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    if app.login_submitting && key.code != KeyCode::Esc {
        return;
    }

    match key.code {
        KeyCode::Esc => app.cancel_login(),
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
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
        KeyCode::Char('g') if app.login_focus == LoginFocus::Button => {
            app.open_register();
        }
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(&app.login_username) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(&app.login_password) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let submitting = app.form.as_ref().map(|f| f.submitting).unwrap_or(false);
    if submitting && key.code != KeyCode::Esc {
        return;
    }

    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.next_focus();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.prev_focus();
            }
        }
        KeyCode::Enter => {
            let on_submit = app.form.as_ref().map(|f| f.on_submit()).unwrap_or(false);
            if on_submit {
                app.submit_form();
            } else if let Some(form) = app.form.as_mut() {
                form.next_focus();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                form.pop_char();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.form.as_mut() {
                form.push_char(c);
            }
        }
        _ => {}
    }
}

/// Move the active list's selection, clamped to the list bounds.
fn move_selection(app: &mut App, delta: i64) {
    let (len, selection) = match app.current_tab {
        Tab::Cars => (app.cars.len(), &mut app.car_selection),
        Tab::Favorites => (app.favorites.len(), &mut app.favorite_selection),
        Tab::Bookings => (app.bookings.len(), &mut app.booking_selection),
        Tab::News => (app.news.len(), &mut app.news_selection),
        Tab::Contact | Tab::Dashboard => return,
    };
    if len == 0 {
        return;
    }
    *selection = (*selection as i64 + delta).clamp(0, len as i64 - 1) as usize;
}
