use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use super::widgets::{busy_bar, error_bar, help_bar, sanitize_text, status_bar};
use crate::app::state::{AppState, Focus};
use crate::constants::TASK_BOX_HEIGHT;
use crate::input::KeyBindings;
use crate::mail::EmailDraft;

const CURSOR: &str = "█";

struct ScreenLayout {
    status_area: Rect,
    task_area: Rect,
    preview_area: Rect,
    message_area: Rect,
    help_area: Rect,
}

fn compute_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Status bar
            Constraint::Length(TASK_BOX_HEIGHT), // Task input
            Constraint::Min(0),                  // Preview
            Constraint::Length(1),               // Message / error / busy
            Constraint::Length(1),               // Help bar
        ])
        .split(area);

    ScreenLayout {
        status_area: chunks[0],
        task_area: chunks[1],
        preview_area: chunks[2],
        message_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let layout = compute_layout(frame.area());

    status_bar(
        frame,
        layout.status_area,
        "AI Email Assistant",
        &format!("Sending as {}", state.sender),
    );

    render_task(frame, layout.task_area, state);

    match &state.preview {
        Some(draft) => render_preview(
            frame,
            layout.preview_area,
            draft,
            state.body_scroll,
            state.focus == Focus::Preview,
        ),
        None => render_empty_preview(frame, layout.preview_area),
    }

    if let Some(label) = &state.status.busy {
        busy_bar(frame, layout.message_area, label);
    } else if let Some(error) = &state.status.error {
        error_bar(frame, layout.message_area, error);
    } else {
        let message = Paragraph::new(format!(" {}", state.status.message)).style(Theme::text_success());
        frame.render_widget(message, layout.message_area);
    }

    help_bar(
        frame,
        layout.help_area,
        &KeyBindings::hints(state.focus, state.preview.is_some()),
    );
}

fn bordered(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
}

/// Rows `text` occupies when wrapped at `width` columns (character wrap approximation)
pub(crate) fn wrapped_line_count(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_task(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Task;
    let block = bordered(" Task description (include the recipient's email) ", focused);
    let inner = block.inner(area);

    let mut text = state.task.clone();
    if focused {
        text.push_str(CURSOR);
    }

    // Keep the end of the text (and the cursor) in view
    let rows = wrapped_line_count(&text, inner.width);
    let scroll = rows.saturating_sub(inner.height);

    let paragraph = Paragraph::new(text)
        .style(Theme::text())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_empty_preview(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "No draft yet. Describe the email above and press Enter to generate one.",
        Theme::text_muted(),
    )))
    .wrap(Wrap { trim: true })
    .block(bordered(" Email Preview ", false));
    frame.render_widget(paragraph, area);
}

fn render_preview(frame: &mut Frame, area: Rect, draft: &EmailDraft, scroll: u16, focused: bool) {
    let block = bordered(" Email Preview ", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // To
            Constraint::Length(1), // Subject
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Body
        ])
        .split(inner);

    let header = |label: &str, value: &str| {
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<9}", label), Theme::label()),
            Span::styled(sanitize_text(value), Theme::text_accent()),
        ]))
    };
    frame.render_widget(header("To:", &draft.recipient), chunks[0]);
    frame.render_widget(header("Subject:", &draft.subject), chunks[1]);

    let body = Paragraph::new(sanitize_text(&draft.body))
        .style(Theme::text())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(body, chunks[3]);
}
