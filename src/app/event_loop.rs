//! Main event loop

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::ai::CompletionBackend;
use crate::constants::INPUT_POLL_MS;
use crate::input::{InputResult, handle_input};
use crate::mail::MailTransport;

use super::App;
use super::render_thread::RenderThread;

impl<B: CompletionBackend, T: MailTransport> App<B, T> {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        let redraw = |state: &super::state::AppState| render_thread.render_blocking(state.clone());

        loop {
            if self.state.clear_error_if_expired() {
                self.dirty = true;
            }

            if self.dirty {
                // Stay dirty if the frame was skipped
                self.dirty = !render_thread.render(self.state.clone());
            }

            if event::poll(Duration::from_millis(INPUT_POLL_MS))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.handle_action(action, &redraw).await;
                    }
                    InputResult::Char(c) => self.state.insert_char(c),
                    InputResult::Paste(text) => self.state.task.push_str(&text),
                    InputResult::Backspace => self.state.backspace(),
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }
}
