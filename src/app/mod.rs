//! Application core - owns the session workflow and the UI state

mod actions;
mod event_loop;
pub mod render_thread;
pub mod session;
pub mod state;

use anyhow::Result;

use render_thread::RenderThread;

use crate::ai::CompletionBackend;
use crate::input::KeyBindings;
use crate::mail::MailTransport;
use session::Session;
use state::AppState;

pub struct App<B, T> {
    pub(crate) session: Session<B, T>,
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl<B: CompletionBackend, T: MailTransport> App<B, T> {
    pub fn new(session: Session<B, T>, sender: &str) -> Self {
        let mut state = AppState::new(sender);
        state.set_status("Describe the email, including the recipient's address, then press Enter");

        Self {
            session,
            state,
            bindings: KeyBindings::new(),
            dirty: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Render thread owns terminal setup/teardown
        let render_thread = RenderThread::spawn()?;

        let result = self.event_loop(&render_thread).await;

        render_thread.shutdown();

        result
    }
}
