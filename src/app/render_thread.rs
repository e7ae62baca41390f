//! Terminal ownership on a dedicated thread.
//!
//! The event loop sends `AppState` snapshots; this thread draws them. While
//! the loop is parked on the completion backend or the relay, the last
//! snapshot (carrying the busy label) stays on screen.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::state::AppState;

type Screen = Terminal<CrosstermBackend<Stdout>>;

pub enum RenderCommand {
    Render(Box<AppState>),
    Shutdown,
}

pub struct RenderThread {
    frames: SyncSender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

/// Raw mode, alternate screen and bracketed paste; undone on any failure.
fn enter_screen() -> io::Result<Screen> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
        disable_raw_mode().ok();
        return Err(e);
    }

    Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
        disable_raw_mode().ok();
    })
}

fn leave_screen(screen: &mut Screen) {
    disable_raw_mode().ok();
    execute!(
        screen.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .ok();
}

fn draw_until_shutdown(frames: Receiver<RenderCommand>) {
    let mut screen = match enter_screen() {
        Ok(screen) => screen,
        Err(e) => {
            tracing::error!("Terminal setup failed: {}", e);
            return;
        }
    };

    while let Ok(RenderCommand::Render(state)) = frames.recv() {
        if let Err(e) = screen.draw(|f| crate::ui::render(f, &state)) {
            tracing::error!("Draw failed: {}", e);
        }
    }

    leave_screen(&mut screen);
}

impl RenderThread {
    pub fn spawn() -> io::Result<Self> {
        // One slot: a queued frame is always the newest worth drawing
        let (frames, rx) = mpsc::sync_channel::<RenderCommand>(1);

        let handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || draw_until_shutdown(rx))?;

        Ok(Self {
            frames,
            handle: Some(handle),
        })
    }

    /// Queue a frame without waiting. Returns false when the slot is taken,
    /// in which case the caller should try again on its next tick.
    pub fn render(&self, state: AppState) -> bool {
        match self.frames.try_send(RenderCommand::Render(Box::new(state))) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Render thread gone");
                true
            }
        }
    }

    /// Queue a frame, waiting for the slot. Used right before a long await.
    pub fn render_blocking(&self, state: AppState) {
        if self
            .frames
            .send(RenderCommand::Render(Box::new(state)))
            .is_err()
        {
            tracing::error!("Render thread gone");
        }
    }

    pub fn shutdown(mut self) {
        self.frames.send(RenderCommand::Shutdown).ok();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}
