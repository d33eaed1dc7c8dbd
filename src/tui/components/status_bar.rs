// Status bar component
//
// Backend address, record count and the key hints that apply right now.

use crate::admin::Tab;
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Hints for the active tab; expansion keys only where rows expand
fn hints(tab: Tab) -> &'static [(&'static str, &'static str)] {
    match tab {
        Tab::Courses => &[
            ("n", "new"),
            ("e", "edit"),
            ("d", "delete"),
            ("⏎", "students"),
            ("x", "unenroll"),
        ],
        Tab::Students => &[
            ("n", "new"),
            ("e", "edit"),
            ("d", "delete"),
            ("a", "add course"),
            ("⏎", "courses"),
            ("x", "unenroll"),
        ],
        Tab::Enrollments => &[("n", "new"), ("d", "delete")],
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let count = app.admin.listing.records.len();

    let mut spans = vec![Span::styled(
        format!(" {} {} ", count, app.admin.tab.title().to_lowercase()),
        Style::default().fg(theme.foreground),
    )];

    if Breakpoint::from_width(area.width).at_least(Breakpoint::Wide) {
        spans.push(Span::styled(
            format!("│ {} ", app.api_url),
            Style::default().fg(theme.muted),
        ));
    }
    spans.push(Span::styled("│", Style::default().fg(theme.muted)));

    for (key, label) in hints(app.admin.tab) {
        spans.push(Span::styled(
            format!(" {}", key),
            Style::default().fg(theme.key_hint),
        ));
        spans.push(Span::styled(
            format!(" {}", label),
            Style::default().fg(theme.muted),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}
