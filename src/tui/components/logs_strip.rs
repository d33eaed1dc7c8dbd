//! Logs strip component
//!
//! The most recent system log lines, color-coded by level. Follows the tail
//! of the buffer; there is no scrolling.

use crate::logging::LogEntry;
use crate::tui::app::App;
use crate::tui::components::formatters::truncate;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let visible = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .log_buffer
        .recent(visible)
        .iter()
        .map(|entry| {
            ListItem::new(truncate(&format_log_entry(entry), width))
                .style(Style::default().fg(theme.log_color(entry.level)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(" System Logs "),
    );

    f.render_widget(list, area);
}
