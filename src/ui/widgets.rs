//! Common UI widgets and utilities

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

/// Simple status bar with left and right text
pub fn status_bar(frame: &mut Frame, area: Rect, left: &str, right: &str) {
    let style = Theme::status_bar();

    let used = left.width() + right.width() + 4;
    let padding = " ".repeat((area.width as usize).saturating_sub(used));

    let line = Line::from(vec![
        Span::styled(format!(" {} ", left), style),
        Span::styled(padding, style),
        Span::styled(format!(" {} ", right), style),
    ]);

    frame.render_widget(Paragraph::new(line).style(style), area);
}

pub fn error_bar(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(format!(" Error: {} ", message)).style(Theme::error_bar());
    frame.render_widget(paragraph, area);
}

pub fn busy_bar(frame: &mut Frame, area: Rect, label: &str) {
    let paragraph = Paragraph::new(format!(" {} ", label)).style(Theme::busy_bar());
    frame.render_widget(paragraph, area);
}

/// How many hints fit in `available_width`, always at least one
pub fn hints_that_fit(hints: &[(&str, &str)], available_width: usize) -> usize {
    // Format: " key desc │" (separator between hints)
    let mut total_width = 0;
    let mut count = 0;
    for (i, (key, desc)) in hints.iter().enumerate() {
        let base = format!(" {} ", key).width() + desc.width();
        let width = if i < hints.len() - 1 { base + 3 } else { base + 1 };
        if total_width + width > available_width {
            break;
        }
        total_width += width;
        count += 1;
    }
    count.max(1).min(hints.len())
}

pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let hints_to_show = hints_that_fit(hints, area.width as usize);

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().take(hints_to_show).enumerate() {
        spans.push(Span::styled(format!(" {} ", key), Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        if i < hints_to_show - 1 {
            spans.push(Span::styled(" │ ", Theme::text_muted()));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Sanitize text for display: remove control characters and ANSI escape sequences
pub fn sanitize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        // ANSI escape sequence (ESC [ ... letter)
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        // Replace other control characters (except newline and tab) with space
        if c.is_control() && c != '\n' && c != '\t' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}
