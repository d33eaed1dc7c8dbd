// Views module - screen-level rendering logic
//
// Fixed shell around the active tab's listing:
// [tab bar] [listing] [logs strip] [status bar], then the modal overlay and
// toasts on top.

mod listing;
mod modal;

use super::app::App;
use crate::tui::components;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(2),
        ])
        .split(f.area());

    components::tab_bar::render(f, chunks[0], app);
    listing::render(f, chunks[1], app);
    components::logs_strip::render(f, chunks[2], app);
    components::status_bar::render(f, chunks[3], app);

    if let Some(overlay) = app.active_modal() {
        modal::render(f, overlay, app);
    }

    // Toasts on top of modals too
    let area = f.area();
    for (slot, toast) in app.toasts.iter().enumerate() {
        toast.render(f, area, slot as u16, &app.theme);
    }
}
