// Color themes for the TUI
//
// Two built-in palettes selected by the `theme` config key.

use crate::config::ThemeName;
use crate::logging::LogLevel;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Colors for every UI element
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,

    pub title: Color,
    pub highlight: Color,
    pub key_hint: Color,

    pub selected_bg: Color,
    pub selected_fg: Color,

    pub success: Color,
    pub error: Color,

    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_type: BorderType::Rounded,

            title: Color::Cyan,
            highlight: Color::Cyan,
            key_hint: Color::Yellow,

            selected_bg: Color::DarkGray,
            selected_fg: Color::Yellow,

            success: Color::Green,
            error: Color::Red,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::White,
            foreground: Color::Black,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_type: BorderType::Plain,

            title: Color::Blue,
            highlight: Color::Blue,
            key_hint: Color::Magenta,

            selected_bg: Color::LightBlue,
            selected_fg: Color::Black,

            success: Color::Green,
            error: Color::Red,

            log_error: Color::Red,
            log_warn: Color::Rgb(184, 134, 11), // Dark goldenrod
            log_info: Color::Blue,
            log_debug: Color::DarkGray,
        }
    }

    pub fn log_color(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Error => self.log_error,
            LogLevel::Warn => self.log_warn,
            LogLevel::Info => self.log_info,
            LogLevel::Debug | LogLevel::Trace => self.log_debug,
        }
    }
}
