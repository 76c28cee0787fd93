//! Theme system for TUI colors and styles
//!
//! Defines color constants consistent with the CLI badges in `display`.

use iocraft::prelude::Color;

use crate::types::{TicketStatus, Urgency};

const GREY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Severity colors
    pub severity_critical: Color,
    pub severity_high: Color,
    pub severity_normal: Color,

    // Status colors
    pub status_open: Color,
    pub status_closed: Color,

    // Thread colors
    pub sender_support: Color,
    pub sender_customer: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub error: Color,
    pub id_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            severity_critical: Color::Red,
            severity_high: Color::Yellow,
            severity_normal: Color::Blue,

            status_open: Color::Green,
            status_closed: GREY,

            sender_support: Color::Magenta,
            sender_customer: Color::White,

            border: GREY,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: GREY,
            highlight: Color::Blue,
            highlight_text: Color::White,
            error: Color::Red,
            id_color: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn severity_color(&self, urgency: Urgency) -> Color {
        match urgency {
            Urgency::Critical => self.severity_critical,
            Urgency::High => self.severity_high,
            Urgency::Normal => self.severity_normal,
        }
    }

    pub fn status_color(&self, status: TicketStatus) -> Color {
        match status {
            TicketStatus::Open => self.status_open,
            TicketStatus::Closed => self.status_closed,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
