//! Application state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa.

use std::time::Instant;

use crate::constants::ERROR_TTL_SECS;
use crate::mail::EmailDraft;

/// Which panel receives keyboard input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Task,
    Preview,
}

/// Status bar state: transient message, error, and blocking operation
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub error: Option<String>,
    pub error_time: Option<Instant>,
    /// Set while a backend call or send is in flight
    pub busy: Option<String>,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
    }
}

/// Snapshot of everything the UI draws. Cloned to the render thread.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Address emails are sent from
    pub sender: String,
    /// Task description being edited
    pub task: String,
    /// Read-only copy of the session's held draft
    pub preview: Option<EmailDraft>,
    pub focus: Focus,
    pub body_scroll: u16,
    pub status: StatusState,
}

impl AppState {
    pub fn new(sender: impl ToString) -> Self {
        Self {
            sender: sender.to_string(),
            ..Default::default()
        }
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.status.set_error(error);
    }

    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    pub fn clear_error_if_expired(&mut self) -> bool {
        self.status.clear_error_if_expired()
    }

    pub fn set_status(&mut self, msg: impl ToString) {
        self.status.set_message(msg);
    }

    pub fn set_busy(&mut self, label: impl ToString) {
        self.status.busy = Some(label.to_string());
    }

    pub fn clear_busy(&mut self) {
        self.status.busy = None;
    }

    /// Mirror the session's draft; focus falls back to the task box when it goes away.
    pub fn sync_preview(&mut self, draft: Option<&EmailDraft>) {
        let changed = self.preview.as_ref() != draft;
        self.preview = draft.cloned();
        if changed {
            self.body_scroll = 0;
        }
        if self.preview.is_none() {
            self.focus = Focus::Task;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.task.push(c);
    }

    pub fn backspace(&mut self) {
        self.task.pop();
    }

    pub fn clear_task(&mut self) {
        self.task.clear();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Task if self.preview.is_some() => Focus::Preview,
            _ => Focus::Task,
        };
    }

    pub fn scroll_body_down(&mut self, step: u16) {
        let max = self
            .preview
            .as_ref()
            .map(|d| d.body.lines().count().saturating_sub(1))
            .unwrap_or(0);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        self.body_scroll = self.body_scroll.saturating_add(step).min(max);
    }

    pub fn scroll_body_up(&mut self, step: u16) {
        self.body_scroll = self.body_scroll.saturating_sub(step);
    }
}
