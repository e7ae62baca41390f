//! Styles for the assistant screen, in a dark and a high-contrast variant.

use ratatui::style::{Color, Modifier, Style};
use std::sync::RwLock;

use crate::config::ThemeVariant;

static THEME_VARIANT: RwLock<ThemeVariant> = RwLock::new(ThemeVariant::Dark);

/// Select the variant once at startup, before the first frame.
pub fn init_theme(variant: ThemeVariant) {
    if let Ok(mut guard) = THEME_VARIANT.write() {
        *guard = variant;
    }
}

pub fn current_theme() -> ThemeVariant {
    THEME_VARIANT.read().map(|g| *g).unwrap_or_default()
}

struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
    key: Color,
    success: Color,
    status_bg: Color,
    error_bg: Color,
    busy_bg: Color,
    busy_fg: Color,
    border: Color,
    border_focused: Color,
}

const DARK: Palette = Palette {
    text: Color::White,
    muted: Color::Gray,
    accent: Color::Cyan,
    key: Color::Yellow,
    success: Color::Green,
    status_bg: Color::DarkGray,
    error_bg: Color::Red,
    busy_bg: Color::Blue,
    busy_fg: Color::White,
    border: Color::DarkGray,
    border_focused: Color::Cyan,
};

const HIGH_CONTRAST: Palette = Palette {
    text: Color::White,
    muted: Color::White,
    accent: Color::LightCyan,
    key: Color::LightYellow,
    success: Color::LightGreen,
    status_bg: Color::Black,
    error_bg: Color::Red,
    busy_bg: Color::Yellow,
    busy_fg: Color::Black,
    border: Color::White,
    border_focused: Color::LightYellow,
};

fn palette() -> &'static Palette {
    match current_theme() {
        ThemeVariant::Dark => &DARK,
        ThemeVariant::HighContrast => &HIGH_CONTRAST,
    }
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

pub struct Theme;

impl Theme {
    pub fn text() -> Style {
        fg(palette().text)
    }

    pub fn text_muted() -> Style {
        fg(palette().muted)
    }

    /// Recipient and subject values in the preview
    pub fn text_accent() -> Style {
        fg(palette().accent)
    }

    pub fn text_success() -> Style {
        fg(palette().success)
    }

    /// "To:" / "Subject:" field labels
    pub fn label() -> Style {
        fg(palette().muted).add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        fg(palette().text).bg(palette().status_bg)
    }

    pub fn error_bar() -> Style {
        fg(palette().text).bg(palette().error_bg)
    }

    pub fn busy_bar() -> Style {
        fg(palette().busy_fg)
            .bg(palette().busy_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn help_key() -> Style {
        fg(palette().key)
    }

    pub fn help_desc() -> Style {
        fg(palette().muted)
    }

    pub fn border() -> Style {
        fg(palette().border)
    }

    pub fn border_focused() -> Style {
        fg(palette().border_focused)
    }
}
