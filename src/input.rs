use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use arboard::Clipboard;
use anyhow::Result;
use tracing::debug;
use crate::app::App;
use crate::models::{Row, StatusMessage, Tab};

/// Applies one key press. Returns `Ok(false)` when the app should quit.
pub fn handle_key(key: KeyEvent, app: &mut App) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(false);
    }
    if app.prompt.is_some() {
        handle_prompt_key(key, app);
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Char('1') => app.set_tab(Tab::Todos),
        KeyCode::Char('2') => app.set_tab(Tab::Git),
        KeyCode::Tab | KeyCode::BackTab => app.set_tab(app.ui.active_tab.next()),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::Home | KeyCode::Char('g') => app.move_cursor(isize::MIN),
        KeyCode::End | KeyCode::Char('G') => app.move_cursor(isize::MAX),
        KeyCode::Esc => app.status = None,
        _ => match app.ui.active_tab {
            Tab::Todos => handle_todos_key(key.code, app),
            Tab::Git => handle_git_key(key.code, app),
        },
    }
    Ok(true)
}

fn handle_todos_key(code: KeyCode, app: &mut App) {
    match code {
        KeyCode::Char(' ') => {
            app.toggle_selected();
        }
        KeyCode::Enter => {
            if let Some(Row::Phase(p) | Row::Task(p, _)) = app.selected_row() {
                app.toggle_collapse(p);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => app.set_selected_collapsed(true),
        KeyCode::Right | KeyCode::Char('l') => app.set_selected_collapsed(false),
        KeyCode::Char('o') => app.open_prompt(),
        KeyCode::Char('r') => {
            app.reload_source();
        }
        KeyCode::Char('e') => {
            app.export_document();
        }
        _ => {}
    }
}

fn handle_git_key(code: KeyCode, app: &mut App) {
    match code {
        KeyCode::Char('r') => app.refresh_git_log(),
        KeyCode::Char('c') => {
            // Copy hash of the selected commit
            let Some(hash) = app.selected_commit().map(|c| c.hash.clone()) else { return };
            let copied = Clipboard::new().and_then(|mut cb| cb.set_text(hash.clone()));
            app.status = Some(match copied {
                Ok(()) => StatusMessage::info(format!("Copied {}", hash)),
                Err(e) => {
                    debug!(error = %e, "clipboard unavailable");
                    StatusMessage::error(format!("Clipboard unavailable: {}", e))
                }
            });
        }
        _ => {}
    }
}

fn handle_prompt_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.submit_prompt();
        }
        KeyCode::Esc => app.prompt = None,
        KeyCode::Backspace => {
            if let Some(buf) = app.prompt.as_mut() {
                buf.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buf) = app.prompt.as_mut() {
                buf.push(c);
            }
        }
        _ => {}
    }
}
