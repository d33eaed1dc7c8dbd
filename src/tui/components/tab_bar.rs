// Tab bar component
//
// App title plus the three entity tabs; the active tab is highlighted.

use crate::admin::Tab;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(theme.key_hint)),
                Span::raw(tab.title()),
            ])
        })
        .collect();

    let loading = if app.admin.loading {
        format!(" {} loading ", app.spinner_char())
    } else {
        String::new()
    };

    let tabs = Tabs::new(titles)
        .select(app.admin.tab.index())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("│")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.title))
                .title(Span::styled(
                    " Tavares School ",
                    Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                ))
                .title_top(Line::from(loading).right_aligned())
                .title_bottom(Line::from(" ? help ").right_aligned()),
        );

    f.render_widget(tabs, area);
}
