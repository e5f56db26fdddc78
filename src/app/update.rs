use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::app::keymap::KeyAction;
use crate::app::{AppConfig, AppState};
use crate::dialogs::{HostEvent, Intent};
use crate::ui;

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, config: AppConfig) -> Result<()> {
    let mut app = AppState::new(config);
    info!(dir = %app.current_path().display(), "started");

    loop {
        app.poll_loader();
        terminal.draw(|f| ui::render(f, &mut app)).context("draw frame")?;

        if event::poll(Duration::from_millis(100)).context("poll terminal events")? {
            if let Event::Key(key) = event::read().context("read terminal event")? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key) {
                    break;
                }
            }
        }
    }
    info!("quit");
    Ok(())
}

/// Handle one key press. Returns `true` when the app should exit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if app.show_help {
        app.show_help = false;
        return false;
    }
    if app.dialogs.is_open() {
        handle_dialog_key(app, key);
        return false;
    }
    app.status = None;

    let Some(action) = app.keymap.resolve(&key) else { return false };
    let page = app.rows_per_page.max(1) as isize;
    match action {
        KeyAction::Quit => return true,
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PageUp => app.move_selection(-page),
        KeyAction::PageDown => app.move_selection(page),
        KeyAction::OpenEntry => app.open_selected(),
        KeyAction::ParentDir => app.go_parent(),
        KeyAction::HistoryBack => app.go_back(),
        KeyAction::HistoryForward => app.go_forward(),
        KeyAction::CreateDirectory => app.open_create_directory(),
        KeyAction::CreateLink => app.open_create_link(),
        KeyAction::Delete => app.open_delete(),
        KeyAction::Rename => app.open_rename(),
        KeyAction::EditPermissions => app.open_edit_permissions(),
        KeyAction::Refresh => app.refresh(),
        KeyAction::Authenticate => app.open_authenticate(),
        KeyAction::OpenHelp => app.show_help = true,
        KeyAction::Ignore => {}
    }
    false
}

fn handle_dialog_key(app: &mut AppState, key: KeyEvent) {
    let Some(dialog) = app.dialogs.active_mut() else { return };
    let intent = match key.code {
        KeyCode::Esc => Some(Intent::Cancel),
        KeyCode::Tab | KeyCode::Down => {
            dialog.focus_next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            dialog.focus_prev();
            None
        }
        KeyCode::Left => {
            dialog.cycle(false);
            None
        }
        KeyCode::Right => {
            dialog.cycle(true);
            None
        }
        KeyCode::Backspace => {
            dialog.backspace();
            None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            dialog.insert_char(c);
            None
        }
        KeyCode::Enter => dialog.activate(),
        _ => None,
    };
    if let Some(intent) = intent {
        resolve_intent(app, intent);
    }
}

fn resolve_intent(app: &mut AppState, intent: Intent) {
    match app.dialogs.resolve(intent, &app.adapter, &mut app.history) {
        HostEvent::Completed => {
            app.refresh();
            app.status = Some("Done".to_string());
        }
        HostEvent::Authenticate(password) => app.authenticate(password),
        HostEvent::Cancelled | HostEvent::Replaced | HostEvent::Failed => {}
    }
}
