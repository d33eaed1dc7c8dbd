// Listing view
//
// One row per record of the active tab. Course and student rows can be
// expanded in place to show their enrolled students/courses; the highlighted
// sublist entry is the target of the unenroll key.

use crate::admin::{Listing, Records};
use crate::model::DISPLAY_DATE;
use crate::tui::app::App;
use crate::tui::components::formatters::{fit, truncate};
use crate::tui::layout::Breakpoint;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const NAME_WIDTH: usize = 28;
const DETAIL_WIDTH: usize = 32;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let listing = &app.admin.listing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" {} ", app.admin.tab.title()));

    if listing.records.is_empty() {
        let message = if app.admin.loading {
            format!("{} Loading {}…", app.spinner_char(), app.admin.tab.title().to_lowercase())
        } else {
            format!(
                "No {} yet. Press n to add a {}.",
                app.admin.tab.title().to_lowercase(),
                app.admin.tab.noun().to_lowercase()
            )
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(theme.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let bp = Breakpoint::from_width(area.width);
    let (items, focus_line) = build_lines(listing, bp, width, theme);

    let mut state = ListState::default();
    state.select(Some(focus_line));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

/// Flatten rows and expanded sublists into list items
///
/// Returns the items and the index of the line to keep in view.
fn build_lines<'a>(
    listing: &Listing,
    bp: Breakpoint,
    width: usize,
    theme: &Theme,
) -> (Vec<ListItem<'a>>, usize) {
    let mut items = Vec::new();
    let mut focus_line = 0;
    let expandable = !matches!(listing.records, Records::Enrollments(_));

    for index in 0..listing.records.len() {
        let selected = index == listing.selected;
        let expanded = listing.is_expanded(index);
        if selected {
            focus_line = items.len();
        }

        let marker = match (expandable, expanded) {
            (false, _) => "  ",
            (true, false) => "▸ ",
            (true, true) => "▾ ",
        };
        let row_style = if selected {
            Style::default()
                .fg(theme.selected_fg)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.foreground)
        };

        let text = format!("{}{}", marker, row_columns(listing, index, bp));
        items.push(ListItem::new(Line::from(Span::styled(truncate(&text, width), row_style))));

        if !expanded {
            continue;
        }

        let subs = listing.sub_items(index);
        if subs.is_empty() {
            let empty = match listing.records {
                Records::Courses(_) => "no students enrolled",
                _ => "no courses",
            };
            items.push(ListItem::new(Line::from(Span::styled(
                format!("      ({})", empty),
                Style::default().fg(theme.muted),
            ))));
            continue;
        }

        for (sub_index, sub) in subs.iter().enumerate() {
            let highlighted = selected && sub_index == listing.sub_selected;
            if highlighted {
                focus_line = items.len();
            }
            let style = if highlighted {
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            let cursor = if highlighted { "›" } else { "•" };
            let text = format!("    {} {}", cursor, sub.label);
            items.push(ListItem::new(Line::from(Span::styled(truncate(&text, width), style))));
        }
    }

    (items, focus_line)
}

/// Row text with as many columns as the width allows
fn row_columns(listing: &Listing, index: usize, bp: Breakpoint) -> String {
    let related = listing.sub_items(index).len();
    let mut columns: Vec<String> = Vec::new();

    match &listing.records {
        Records::Courses(courses) => {
            let Some(course) = courses.get(index) else {
                return String::new();
            };
            columns.push(course.name.clone());
            if bp.at_least(Breakpoint::Normal) {
                columns.push(course.description.clone());
            }
            if bp.at_least(Breakpoint::Wide) {
                columns.push(plural(related, "student"));
            }
        }
        Records::Students(students) => {
            let Some(student) = students.get(index) else {
                return String::new();
            };
            columns.push(student.name.clone());
            if bp.at_least(Breakpoint::Normal) {
                columns.push(student.email.clone());
            }
            if bp.at_least(Breakpoint::Wide) {
                columns.push(student.birth_date.format(DISPLAY_DATE).to_string());
                columns.push(plural(related, "course"));
            }
        }
        Records::Enrollments(enrollments) => {
            let Some(enrollment) = enrollments.get(index) else {
                return String::new();
            };
            columns.push(enrollment.student_label());
            if bp.at_least(Breakpoint::Normal) {
                columns.push(enrollment.course_label());
            }
            if bp.at_least(Breakpoint::Wide) {
                columns.push(enrollment.enrolled_on().unwrap_or_default());
            }
        }
    }

    let last = columns.len() - 1;
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| match i {
            _ if i == last => column.clone(),
            0 => fit(column, NAME_WIDTH),
            _ => fit(column, DETAIL_WIDTH),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::Loaded;
    use crate::model::{Course, Student};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn listing_with_course() -> Listing {
        let mut by_course = HashMap::new();
        by_course.insert(
            "C1".to_string(),
            vec![
                Student {
                    id: "S1".to_string(),
                    name: "Ana".to_string(),
                    email: "ana@x.com".to_string(),
                    birth_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                },
                Student {
                    id: "S2".to_string(),
                    name: "Bia".to_string(),
                    email: "bia@x.com".to_string(),
                    birth_date: NaiveDate::from_ymd_opt(1999, 2, 2).unwrap(),
                },
            ],
        );
        let mut listing = Listing::default();
        listing.replace(Loaded {
            records: Records::Courses(vec![
                Course {
                    id: "C1".to_string(),
                    name: "Algorithms".to_string(),
                    description: "Intro".to_string(),
                },
                Course {
                    id: "C2".to_string(),
                    name: "Networks".to_string(),
                    description: String::new(),
                },
            ]),
            students_by_course: by_course,
            ..Default::default()
        });
        listing
    }

    #[test]
    fn test_collapsed_rows_only() {
        let listing = listing_with_course();
        let (items, focus) = build_lines(&listing, Breakpoint::Wide, 120, &Theme::dark());
        assert_eq!(items.len(), 2);
        assert_eq!(focus, 0);
    }

    #[test]
    fn test_expanded_row_adds_sublist_and_follows_cursor() {
        let mut listing = listing_with_course();
        listing.toggle_expanded(0);
        listing.sub_next();

        let (items, focus) = build_lines(&listing, Breakpoint::Wide, 120, &Theme::dark());
        // Row, two students, second row
        assert_eq!(items.len(), 4);
        assert_eq!(focus, 2);
    }

    #[test]
    fn test_expanded_row_without_students_shows_placeholder() {
        let mut listing = listing_with_course();
        listing.select_next();
        listing.toggle_expanded(1);

        let (items, focus) = build_lines(&listing, Breakpoint::Wide, 120, &Theme::dark());
        assert_eq!(items.len(), 3);
        assert_eq!(focus, 1);
    }

    #[test]
    fn test_columns_follow_breakpoint() {
        let listing = listing_with_course();
        assert_eq!(row_columns(&listing, 0, Breakpoint::Compact), "Algorithms");
        let wide = row_columns(&listing, 0, Breakpoint::Wide);
        assert!(wide.starts_with("Algorithms"));
        assert!(wide.ends_with("2 students"));
    }
}
