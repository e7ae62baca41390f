//! Action dispatch: maps user actions onto session transitions and UI state

use crate::ai::CompletionBackend;
use crate::constants::BODY_SCROLL_STEP;
use crate::input::Action;
use crate::mail::MailTransport;

use super::App;
use super::state::{AppState, Focus};

impl<B: CompletionBackend, T: MailTransport> App<B, T> {
    /// Handle one action to completion. `redraw` is called before any blocking call.
    pub(crate) async fn handle_action(&mut self, action: Action, redraw: &impl Fn(&AppState)) {
        match action {
            Action::Submit | Action::Regenerate => self.generate_draft(redraw).await,
            Action::Send => self.send_draft(redraw).await,
            Action::NewLine => self.state.insert_char('\n'),
            Action::ClearTask => self.state.clear_task(),
            Action::ToggleFocus => self.state.toggle_focus(),
            Action::ScrollDown => self.state.scroll_body_down(BODY_SCROLL_STEP),
            Action::ScrollUp => self.state.scroll_body_up(BODY_SCROLL_STEP),
            // Handled by the event loop
            Action::Quit => {}
        }
    }

    async fn generate_draft(&mut self, redraw: &impl Fn(&AppState)) {
        self.state.clear_error();
        self.state.set_busy("Generating email...");
        redraw(&self.state);

        let task = self.state.task.clone();
        let result = self
            .session
            .submit(&task)
            .await
            .map(|draft| draft.recipient.clone());

        self.state.clear_busy();
        self.state.sync_preview(self.session.state().draft());

        match result {
            Ok(recipient) => {
                self.state.focus = Focus::Preview;
                self.state
                    .set_status(format!("Draft ready for {}. Press s to send.", recipient));
            }
            Err(e) => {
                tracing::warn!("Draft generation failed: {}", e);
                self.state.set_error(e);
            }
        }
    }

    async fn send_draft(&mut self, redraw: &impl Fn(&AppState)) {
        self.state.clear_error();
        self.state.set_busy("Sending email...");
        redraw(&self.state);

        let result = self.session.confirm_send().await;

        self.state.clear_busy();
        self.state.sync_preview(self.session.state().draft());

        match result {
            Ok(recipient) => {
                self.state
                    .set_status(format!("Email successfully sent to {}", recipient));
            }
            Err(e) => {
                tracing::warn!("Send failed: {}", e);
                self.state.set_error(e);
            }
        }
    }
}
