use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::state::Focus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Task box
    Submit,
    NewLine,
    ClearTask,

    // Preview
    Send,
    Regenerate,
    ScrollUp,
    ScrollDown,

    // Both
    ToggleFocus,
    Quit,
}

/// Key maps per focused panel. Unmapped keys in the task box are text input.
pub struct KeyBindings {
    task: HashMap<KeyEvent, Action>,
    preview: HashMap<KeyEvent, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            task: Self::task_bindings(),
            preview: Self::preview_bindings(),
        }
    }

    pub fn get(&self, focus: Focus, event: &KeyEvent) -> Option<Action> {
        // Ctrl+C always quits
        if *event == ctrl_key('c') {
            return Some(Action::Quit);
        }

        let map = match focus {
            Focus::Task => &self.task,
            Focus::Preview => &self.preview,
        };
        map.get(event).copied()
    }

    /// Key hints for the help bar, in display order
    pub fn hints(focus: Focus, has_draft: bool) -> Vec<(&'static str, &'static str)> {
        match focus {
            Focus::Task => {
                let mut hints = vec![("Enter", "generate"), ("Ctrl+N", "newline")];
                if has_draft {
                    hints.push(("Tab", "preview"));
                }
                hints.extend([("Ctrl+U", "clear"), ("Esc", "quit")]);
                hints
            }
            Focus::Preview => vec![
                ("s", "send"),
                ("g", "regenerate"),
                ("j/k", "scroll"),
                ("e", "edit task"),
                ("q", "quit"),
            ],
        }
    }

    fn task_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key_code(KeyCode::Enter), Action::Submit);
        map.insert(ctrl_key('n'), Action::NewLine);
        map.insert(ctrl_key('u'), Action::ClearTask);
        map.insert(key_code(KeyCode::Tab), Action::ToggleFocus);
        map.insert(key_code(KeyCode::Esc), Action::Quit);

        map
    }

    fn preview_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key('s'), Action::Send);
        map.insert(key('g'), Action::Regenerate);
        map.insert(key('j'), Action::ScrollDown);
        map.insert(key('k'), Action::ScrollUp);
        map.insert(key_code(KeyCode::Down), Action::ScrollDown);
        map.insert(key_code(KeyCode::Up), Action::ScrollUp);
        map.insert(key('e'), Action::ToggleFocus);
        map.insert(key_code(KeyCode::Tab), Action::ToggleFocus);
        map.insert(key_code(KeyCode::Esc), Action::ToggleFocus);
        map.insert(key('q'), Action::Quit);

        map
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
