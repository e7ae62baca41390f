use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, Focus};

#[derive(Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    /// Bracketed paste into the task box
    Paste(String),
    Backspace,
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            handle_key(key_event, state, bindings)
        }
        Event::Paste(text) if state.focus == Focus::Task => InputResult::Paste(text),
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    if let Some(action) = bindings.get(state.focus, &key) {
        if action == Action::Quit {
            return InputResult::Quit;
        }
        return InputResult::Action(action);
    }

    if state.focus == Focus::Task {
        return handle_text_input(key);
    }

    InputResult::Continue
}

fn handle_text_input(key: KeyEvent) -> InputResult {
    // Unbound Ctrl chords are dropped. Ctrl+Alt is AltGr on Windows and
    // composes characters such as '@'.
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    if ctrl && !alt {
        return InputResult::Continue;
    }

    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        _ => InputResult::Continue,
    }
}
