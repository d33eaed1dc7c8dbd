// TUI application state
//
// Wraps the admin state with what only the terminal needs: theme, toasts,
// key debouncing, the help overlay, and the queue of commands waiting to be
// spawned by the event loop.

use super::components::Toast;
use super::input::InputHandler;
use super::modal::Modal;
use super::theme::Theme;
use crate::admin::{Admin, Command, Form, Notice, Outcome};
use crate::config::Config;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use std::time::{Duration, Instant};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Main application state for the TUI
pub struct App {
    pub admin: Admin,
    pub theme: Theme,
    pub log_buffer: LogBuffer,
    /// Base URL shown in the status bar
    pub api_url: String,
    pub toasts: Vec<Toast>,
    pub show_help: bool,
    pub should_quit: bool,
    toast_duration: Duration,
    input_handler: InputHandler,
    pending: Vec<Command>,
    spinner_frame: usize,
}

impl App {
    /// Create the app; the first read of the default tab is queued
    pub fn new(config: &Config, log_buffer: LogBuffer) -> Self {
        let mut admin = Admin::new(config.ui.close_delay());
        let first = admin.refresh();
        Self {
            admin,
            theme: Theme::from_name(config.theme),
            log_buffer,
            api_url: config.api_url.clone(),
            toasts: Vec::new(),
            show_help: false,
            should_quit: false,
            toast_duration: config.ui.toast_duration(),
            input_handler: InputHandler::default(),
            pending: vec![first],
            spinner_frame: 0,
        }
    }

    // ─── Command plumbing ───────────────────────────────────────────────────

    pub fn push(&mut self, command: Option<Command>) {
        self.pending.extend(command);
    }

    /// Commands waiting to be spawned
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    /// Feed a finished command back into the admin state
    pub fn apply(&mut self, outcome: Outcome) {
        let follow_ups = self.admin.apply(outcome, Instant::now());
        self.pending.extend(follow_ups);
    }

    /// Periodic housekeeping: delayed form close, toast expiry, spinner
    pub fn tick(&mut self) {
        let close = self.admin.tick(Instant::now());
        self.push(close);
        self.toasts.retain(|t| !t.is_expired());
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    /// Turn pending admin notices into toasts
    pub fn flush_notices(&mut self) {
        for notice in self.admin.drain_notices() {
            self.toasts.push(Toast::from_notice(notice, self.toast_duration));
        }
    }

    pub fn spinner_char(&self) -> &'static str {
        SPINNER[self.spinner_frame]
    }

    // ─── Input ──────────────────────────────────────────────────────────────

    /// The overlay capturing input, if any
    pub fn active_modal(&self) -> Option<Modal> {
        if self.admin.confirm.is_some() {
            Some(Modal::Confirm)
        } else if let Some(state) = &self.admin.form {
            Some(Modal::Form {
                picker: matches!(state.form, Form::AddCourse { .. }),
            })
        } else if self.show_help {
            Some(Modal::Help)
        } else {
            None
        }
    }

    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    // ─── Clipboard ──────────────────────────────────────────────────────────

    /// Copy the selected record's id and report it with a toast
    pub fn copy_selected_id(&mut self) {
        let Some(id) = self.admin.listing.selected_id().map(str::to_string) else {
            return;
        };
        let notice = match copy_to_clipboard(&id) {
            Ok(()) => Notice::success(format!("Copied id {}", id)),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {:#}", e);
                Notice::error("Clipboard unavailable")
            }
        };
        self.toasts.push(Toast::from_notice(notice, self.toast_duration));
    }
}

/// Copy text to the system clipboard
///
/// Fails without a display server (headless Linux) or on permission errors.
fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}
