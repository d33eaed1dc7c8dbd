//! Toast notification component
//!
//! Non-blocking overlays that auto-dismiss. Stacked in the top-right corner
//! on top of all other content, newest lowest.

use crate::admin::{Notice, NoticeLevel};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// A toast notification that auto-dismisses
pub struct Toast {
    pub message: String,
    pub level: NoticeLevel,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn from_notice(notice: Notice, duration: Duration) -> Self {
        Self {
            message: notice.message,
            level: notice.level,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Render as the `slot`-th toast from the top-right corner
    pub fn render(&self, f: &mut Frame, area: Rect, slot: u16, theme: &Theme) {
        let height = 3;
        let width = (self.message.width() as u16 + 6).min(area.width.saturating_sub(4));

        let x = area.right().saturating_sub(width + 2);
        let y = area.y + 1 + slot * height;
        if y + height > area.bottom() {
            return;
        }
        let toast_area = Rect::new(x, y, width, height);

        let color = match self.level {
            NoticeLevel::Success => theme.success,
            NoticeLevel::Error => theme.error,
        };
        let icon = match self.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(format!("{} {}", icon, self.message))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        // Clear the area first so toast appears on top
        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}
