//! Event Handling
//!
//! Keyboard and mouse handling for mediadesk.

use crate::app::{App, Mode, Task};
use crate::resource::get_resource_by_shortcut;
use anyhow::Result;
use crossterm::event::{
    poll, read, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Position;
use std::time::Duration;

/// Handle events, returns true if app should quit
pub fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        match read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                return Ok(handle_key_event(app, key.code, key.modifiers));
            },
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            _ => {},
        }
    }
    Ok(false)
}

pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    // Input is locked while a request is in flight
    if app.is_busy() {
        return false;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Command => handle_command_mode(app, code, modifiers),
        Mode::Help => handle_help_mode(app, code),
        Mode::Confirm => handle_confirm_mode(app, code),
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Form => handle_form_mode(app, code, modifiers),
        Mode::Describe => handle_describe_mode(app, code, modifiers),
    }
}

/// A left click outside the form popup dismisses it
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Form || app.is_busy() {
        return;
    }
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    let Some(area) = app.form_area else {
        return;
    };
    if !area.contains(Position::new(mouse.column, mouse.row)) {
        app.cancel_form();
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Handle filter input first
    if app.filter_active {
        match code {
            KeyCode::Esc => {
                app.clear_filter();
            },
            KeyCode::Enter => {
                app.filter_active = false;
            },
            KeyCode::Backspace => {
                app.filter_text.pop();
                app.apply_filter();
            },
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.filter_text.push(c);
                app.apply_filter();
            },
            _ => {},
        }
        return false;
    }

    match code {
        // Quit
        KeyCode::Char('q') => return true,

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home | KeyCode::Char('g') => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(10),
        KeyCode::PageUp => app.page_up(10),

        // Ctrl+D/U for page navigation
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(10);
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up(10);
        },

        // Resource tabs
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(def) = get_resource_by_shortcut(c) {
                if def.key != app.current_resource_key {
                    app.navigate_to_resource(&def.key);
                }
            }
        },

        // Refresh
        KeyCode::Char('R') => {
            app.queue(Task::Refresh);
        },

        // Describe
        KeyCode::Enter | KeyCode::Char('d') => {
            app.enter_describe_mode();
        },

        // Record actions
        KeyCode::Char('n') => app.request_new(),
        KeyCode::Char('e') => app.request_edit(),
        KeyCode::Delete | KeyCode::Char('x') => app.request_delete(),
        KeyCode::Char('i') => app.toggle_inactive(),

        // Filter
        KeyCode::Char('/') => {
            app.filter_active = true;
        },

        // Command mode
        KeyCode::Char(':') => {
            app.enter_command_mode();
        },

        // Help
        KeyCode::Char('?') => {
            app.enter_help_mode();
        },

        _ => {},
    }

    false
}

fn handle_form_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let submit = code == KeyCode::Enter
        || (code == KeyCode::Char('s') && modifiers.contains(KeyModifiers::CONTROL));
    if submit {
        app.submit_form();
        return false;
    }
    if code == KeyCode::Esc {
        app.cancel_form();
        return false;
    }

    let Some(form) = app.list.form_mut() else {
        app.mode = Mode::Normal;
        return false;
    };

    match code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Right => form.cycle_option(true),
        KeyCode::Left => form.cycle_option(false),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        _ => {},
    }
    false
}

fn handle_command_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc => {
            app.exit_mode();
        },
        KeyCode::Enter => {
            return app.execute_command();
        },
        KeyCode::Backspace => {
            app.command_text.pop();
            app.update_command_suggestions();
        },
        KeyCode::Tab | KeyCode::Right => {
            app.apply_suggestion();
        },
        KeyCode::Down => {
            app.next_suggestion();
        },
        KeyCode::Up => {
            app.prev_suggestion();
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_text.push(c);
            app.update_command_suggestions();
        },
        _ => {},
    }
    false
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter
    ) {
        app.exit_mode();
    }
    false
}

fn handle_confirm_mode(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.exit_mode();
        },
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(ref mut pending) = app.pending_delete {
                pending.selected_yes = true;
            }
        },
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(ref mut pending) = app.pending_delete {
                pending.selected_yes = false;
            }
        },
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.confirm_delete();
        },
        KeyCode::Enter => {
            if app.pending_delete.as_ref().is_some_and(|p| p.selected_yes) {
                app.confirm_delete();
            } else {
                app.exit_mode();
            }
        },
        _ => {},
    }
    false
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Esc | KeyCode::Enter) {
        app.warning_message = None;
        app.exit_mode();
    }
    false
}

fn handle_describe_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.exit_mode();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            app.describe_scroll = app.describe_scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.describe_scroll = app.describe_scroll.saturating_sub(1);
        },
        KeyCode::PageDown => {
            app.describe_scroll = app.describe_scroll.saturating_add(10);
        },
        KeyCode::PageUp => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('d') => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                app.describe_scroll = app.describe_scroll.saturating_add(10);
            } else {
                app.exit_mode();
            }
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('g') | KeyCode::Home => {
            app.describe_scroll = 0;
        },
        KeyCode::Char('G') | KeyCode::End => {
            app.describe_scroll_to_bottom(30); // Approximate visible lines
        },
        _ => {},
    }
    false
}
