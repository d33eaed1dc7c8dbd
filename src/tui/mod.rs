// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, finished requests)
// - Spawning the admin state's commands and feeding results back

pub mod app;
pub mod components;
pub mod input;
pub mod layout;
pub mod modal;
pub mod theme;
pub mod views;

use crate::admin::{perform, Outcome, Tab};
use crate::api::ApiClient;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::validation::today;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop until the operator quits, and
/// restores the terminal even when the loop failed.
pub async fn run_tui(config: Config, client: ApiClient, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(&config, log_buffer);
    let result = run_event_loop(&mut terminal, &mut app, client).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Three sources wake the loop: keyboard input, the tick timer (delayed form
/// close, toast expiry) and finished backend requests. Requests run on their
/// own tasks so the screen keeps redrawing while they are in flight.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: ApiClient,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Outcome>();

    loop {
        for command in app.take_commands() {
            let client = client.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                // The receiver only goes away on quit
                let _ = tx.send(perform(&client, command).await);
            });
        }
        app.flush_notices();

        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => app.tick(),

            Some(outcome) = outcome_rx.recv() => app.apply(outcome),
        }

        if app.should_quit {
            tracing::info!("Operator quit");
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Global → Listing
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Ctrl+C always quits
    if key_event.kind == KeyEventKind::Press
        && key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        app.should_quit = true;
        return;
    }

    if handle_modal_input(app, &key_event) {
        return;
    }

    match key_event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            if !app.handle_key_press(key_event.code) {
                return;
            }
            if !handle_global_keys(app, &key_event) {
                handle_listing_keys(app, key_event.code);
            }
        }
        KeyEventKind::Release => app.handle_key_release(key_event.code),
    }
}

/// Route input to the topmost overlay. Returns true if an overlay is open.
fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(modal) = app.active_modal() else {
        return false;
    };

    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        return true;
    }
    if key_event.kind != KeyEventKind::Press {
        return true;
    }

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => match modal {
            Modal::Help => app.show_help = false,
            _ => {
                let refresh = app.admin.close_form();
                app.push(refresh);
            }
        },
        ModalAction::Submit => {
            let command = app.admin.submit_form(today());
            app.push(command);
        }
        ModalAction::Answer(yes) => {
            let command = app.admin.answer_confirm(yes);
            app.push(command);
        }
        action => {
            if let Some(state) = app.admin.form.as_mut() {
                match action {
                    ModalAction::NextField => state.focus_next(),
                    ModalAction::PrevField => state.focus_prev(),
                    ModalAction::Insert(c) => state.insert_char(c),
                    ModalAction::Backspace => state.backspace(),
                    ModalAction::Pick { forward } => state.select_step(forward),
                    _ => {}
                }
            }
        }
    }
    true
}

/// Keys that work on every tab. Returns true if handled.
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    let tab = match key_event.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return true;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return true;
        }
        KeyCode::Char('r') => {
            let command = app.admin.refresh();
            app.push(Some(command));
            return true;
        }
        KeyCode::Char('y') => {
            app.copy_selected_id();
            return true;
        }
        KeyCode::Char('1') => Tab::Courses,
        KeyCode::Char('2') => Tab::Students,
        KeyCode::Char('3') => Tab::Enrollments,
        KeyCode::Tab => app.admin.tab.next(),
        KeyCode::BackTab => app.admin.tab.prev(),
        _ => return false,
    };
    let command = app.admin.switch_tab(tab);
    app.push(Some(command));
    true
}

/// Row navigation and record actions on the active listing
fn handle_listing_keys(app: &mut App, key: KeyCode) {
    let admin = &mut app.admin;
    match key {
        KeyCode::Down | KeyCode::Char('j') => admin.listing.select_next(),
        KeyCode::Up | KeyCode::Char('k') => admin.listing.select_prev(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let selected = admin.listing.selected;
            admin.listing.toggle_expanded(selected);
        }
        KeyCode::Char(']') => admin.listing.sub_next(),
        KeyCode::Char('[') => admin.listing.sub_prev(),
        KeyCode::Char('n') => admin.open_create(),
        KeyCode::Char('e') => admin.open_edit(),
        KeyCode::Char('d') => admin.request_delete(),
        KeyCode::Char('x') => admin.request_unenroll(),
        KeyCode::Char('a') => {
            let load = admin.open_add_course();
            app.push(load);
        }
        _ => {}
    }
}
