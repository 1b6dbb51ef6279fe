use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ignore release/repeat events reported by some terminals
    if key.kind != KeyEventKind::Press {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Start / stop monitoring
        KeyCode::Char('s') | KeyCode::Enter | KeyCode::Char(' ') => app.toggle_monitoring(),

        // Reload settings from the config file
        KeyCode::Char('r') => app.reload_settings(),

        // Clear the log pane
        KeyCode::Char('c') => app.clear_log(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
