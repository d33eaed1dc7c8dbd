// Modal overlay rendering
//
// Overlays are drawn centered on top of the listing:
// - Form: create/edit fields, or the course picker
// - Confirm: yes/no prompt before a delete or unenroll
// - Help: keyboard shortcuts

use crate::admin::{Confirm, Form, FormState};
use crate::tui::app::App;
use crate::tui::components::formatters::truncate;
use crate::tui::modal::Modal;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the overlay on top of everything else
pub fn render(f: &mut Frame, modal: Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Form { .. } => {
            if let Some(state) = &app.admin.form {
                render_form(f, state, &app.theme);
            }
        }
        Modal::Confirm => {
            if let Some(confirm) = &app.admin.confirm {
                render_confirm(f, confirm, &app.theme);
            }
        }
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn modal_block<'a>(title: String, footer: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .border_type(theme.border_type)
        .title(format!(" {} ", title))
        .title_bottom(Line::from(footer).centered())
        .style(Style::default().bg(theme.background))
}

// ─────────────────────────────────────────────────────────────────────────────
// Form
// ─────────────────────────────────────────────────────────────────────────────

fn render_form(f: &mut Frame, state: &FormState, theme: &Theme) {
    let width: u16 = 56;
    let inner_width = width.saturating_sub(4) as usize;
    let label_style = Style::default().fg(theme.muted);

    let mut lines = vec![Line::raw("")];

    match &state.form {
        Form::AddCourse {
            student,
            courses,
            selected,
        } => {
            lines.push(Line::from(vec![
                Span::styled(" Student: ", label_style),
                Span::styled(student.name.clone(), Style::default().fg(theme.foreground)),
            ]));
            lines.push(Line::raw(""));
            if state.load_failed {
                lines.push(Line::styled(
                    " Could not load courses. Esc and try again.",
                    Style::default().fg(theme.error),
                ));
            } else if courses.is_empty() {
                lines.push(Line::styled(" No courses loaded", label_style));
            }
            for (i, course) in courses.iter().enumerate() {
                let chosen = *selected == Some(i);
                let (mark, style) = if chosen {
                    (
                        "(•)",
                        Style::default()
                            .fg(theme.selected_fg)
                            .bg(theme.selected_bg)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("( )", Style::default().fg(theme.foreground))
                };
                let text = format!(" {} {}", mark, course.name);
                lines.push(Line::styled(truncate(&text, inner_width), style));
            }
        }
        form => {
            for (i, (label, value)) in form.fields().into_iter().enumerate() {
                let focused = i == state.focus && state.is_editable();
                lines.push(Line::styled(format!(" {}", label), label_style));

                let cursor = if focused { "▏" } else { "" };
                let value_style = if focused {
                    Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.foreground)
                };
                let shown = truncate(value, inner_width.saturating_sub(4));
                lines.push(Line::styled(format!("  › {}{}", shown, cursor), value_style));
                lines.push(Line::raw(""));
            }
        }
    }

    let footer = if state.close_at.is_some() {
        " Saved ✓ "
    } else if state.submitting {
        " Saving… "
    } else if matches!(state.form, Form::AddCourse { .. }) {
        " ↑↓ choose · Enter enroll · Esc cancel "
    } else {
        " Tab next field · Enter save · Esc cancel "
    };

    let height = (lines.len() as u16 + 2).max(7);
    let area = centered_rect(width, height, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(modal_block(state.form.title(), footer, theme)),
        area,
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirm
// ─────────────────────────────────────────────────────────────────────────────

fn render_confirm(f: &mut Frame, confirm: &Confirm, theme: &Theme) {
    let content = Text::from(vec![
        Line::raw(""),
        Line::styled(confirm.question(), Style::default().fg(theme.foreground)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.key_hint)),
            Span::styled(" yes    ", Style::default().fg(theme.muted)),
            Span::styled("n", Style::default().fg(theme.key_hint)),
            Span::styled(" no", Style::default().fg(theme.muted)),
        ])
        .centered(),
    ]);

    let area = centered_rect(50, 8, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content)
            .centered()
            .wrap(Wrap { trim: true })
            .block(
                modal_block(confirm.title().to_string(), " Esc cancels ", theme)
                    .border_style(Style::default().fg(theme.error)),
            ),
        area,
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

fn render_help(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let key_style = Style::default().fg(theme.key_hint);
    let desc_style = Style::default().fg(theme.foreground);
    let header_style = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);

    // Helper to create a keybind line: "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Tabs", header_style)),
        kb("1 / 2 / 3", "Courses / Students / Enrollments"),
        kb("Tab", "Next tab (Shift+Tab previous)"),
        kb("r", "Reload the current tab"),
        Line::raw(""),
        Line::from(Span::styled("  Rows", header_style)),
        kb("↑/↓, j/k", "Move selection"),
        kb("Enter/Space", "Show or hide enrollments"),
        kb("] / [", "Move inside the shown enrollments"),
        kb("y", "Copy the selected id"),
        Line::raw(""),
        Line::from(Span::styled("  Records", header_style)),
        kb("n", "New record"),
        kb("e", "Edit course or student"),
        kb("d", "Delete (asks first)"),
        kb("a", "Enroll the selected student"),
        kb("x", "Remove the highlighted enrollment"),
        Line::raw(""),
        Line::from(Span::styled("  Forms", header_style)),
        kb("Tab/↑↓", "Change field"),
        kb("Enter", "Save"),
        kb("Esc", "Cancel"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Theme: ", desc_style),
            Span::styled(theme.name, key_style),
        ]),
    ]);

    let area = centered_rect(54, 33, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).block(modal_block(
            "Help".to_string(),
            " Press ? or Esc to close ",
            theme,
        )),
        area,
    );
}
