//! Administration state: active tab, listing, open modal, notifications
//!
//! [`Admin`] is plain state. Operator intents (`switch_tab`, `submit_form`,
//! `answer_confirm`, ...) return the [`Command`]s to run; results come back
//! through [`Admin::apply`], which may ask for follow-up commands. Every
//! mutation is followed by a re-read of the active tab's collection; nothing
//! returned by a mutation is merged into the listing.
//!
//! Collection reads are tagged with a generation number. A read that
//! resolves after a newer one was issued, or after the operator moved to
//! another tab, is discarded. Form submissions carry a ticket in the same
//! way, so a save that resolves after its form was closed never touches the
//! form open now.

mod command;
mod form;
mod listing;
mod tab;

#[cfg(test)]
mod tests;

pub use command::{perform, Command, Loaded, Outcome, Save};
pub use form::{Form, FormState};
pub use listing::{Listing, Records};
pub use tab::Tab;

use crate::api::Resource;
use chrono::NaiveDate;
use std::time::{Duration, Instant};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A pending yes/no question guarding a destructive request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteRecord {
        resource: Resource,
        id: String,
        label: String,
    },
    RemoveEnrollment {
        student_id: String,
        course_id: String,
        label: String,
    },
}

impl Confirm {
    pub fn title(&self) -> &'static str {
        match self {
            Confirm::DeleteRecord { .. } => "Confirm Deletion",
            Confirm::RemoveEnrollment { .. } => "Remove Enrollment",
        }
    }

    pub fn question(&self) -> String {
        match self {
            Confirm::DeleteRecord { label, .. } => format!(
                "Delete \"{}\"? This action cannot be undone.",
                label
            ),
            Confirm::RemoveEnrollment { label, .. } => {
                format!("Remove the enrollment \"{}\"?", label)
            }
        }
    }
}

pub struct Admin {
    pub tab: Tab,
    pub listing: Listing,
    pub form: Option<FormState>,
    pub confirm: Option<Confirm>,
    /// A collection read is in flight
    pub loading: bool,
    generation: u64,
    /// Last ticket handed to a form submission
    tickets: u64,
    close_delay: Duration,
    notices: Vec<Notice>,
}

impl Admin {
    /// `close_delay` is how long a form stays open after a successful submit
    pub fn new(close_delay: Duration) -> Self {
        Self {
            tab: Tab::default(),
            listing: Listing::default(),
            form: None,
            confirm: None,
            loading: false,
            generation: 0,
            tickets: 0,
            close_delay,
            notices: Vec::new(),
        }
    }

    /// Issue a read of the active tab's collection
    pub fn refresh(&mut self) -> Command {
        self.generation += 1;
        self.loading = true;
        Command::Refresh {
            tab: self.tab,
            generation: self.generation,
        }
    }

    /// Switch tab; the new tab's collection is always re-read
    pub fn switch_tab(&mut self, tab: Tab) -> Command {
        if tab != self.tab {
            self.tab = tab;
            self.listing.clear(tab);
            self.listing.selected = 0;
        }
        self.refresh()
    }

    /// Notifications produced since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    // ─── Modals ─────────────────────────────────────────────────────────────

    /// Open the create form of the active tab
    pub fn open_create(&mut self) {
        let form = match self.tab {
            Tab::Courses => Form::new_course(),
            Tab::Students => Form::new_student(),
            Tab::Enrollments => Form::new_enrollment(),
        };
        self.form = Some(FormState::new(form));
    }

    /// Open the edit form of the selected row; enrollments cannot be edited
    pub fn open_edit(&mut self) {
        let index = self.listing.selected;
        let form = match &self.listing.records {
            Records::Courses(v) => v.get(index).map(Form::edit_course),
            Records::Students(v) => v.get(index).map(Form::edit_student),
            Records::Enrollments(_) => {
                tracing::debug!("Enrollments have no edit form");
                None
            }
        };
        if let Some(form) = form {
            self.form = Some(FormState::new(form));
        }
    }

    /// Open the course picker for the selected student
    pub fn open_add_course(&mut self) -> Option<Command> {
        let Records::Students(students) = &self.listing.records else {
            return None;
        };
        let student = students.get(self.listing.selected)?;
        self.form = Some(FormState::new(Form::add_course(student)));
        Some(Command::LoadCourseOptions)
    }

    /// Validate and submit the open form
    ///
    /// A failed guard produces an error notification and no command.
    pub fn submit_form(&mut self, today: NaiveDate) -> Option<Command> {
        let state = self.form.as_mut()?;
        if !state.is_editable() {
            return None;
        }

        match state.form.to_save(today) {
            Ok(save) => {
                self.tickets += 1;
                state.submitting = true;
                state.ticket = Some(self.tickets);
                Some(Command::Save {
                    ticket: self.tickets,
                    save,
                })
            }
            Err(e) => {
                tracing::info!("Form rejected: {}", e);
                self.notify(Notice::error(e.to_string()));
                None
            }
        }
    }

    /// Close the open form; closing always re-reads the collection
    pub fn close_form(&mut self) -> Option<Command> {
        self.form.take()?;
        Some(self.refresh())
    }

    /// Close a form whose post-success delay has elapsed
    pub fn tick(&mut self, now: Instant) -> Option<Command> {
        let due = self
            .form
            .as_ref()
            .and_then(|f| f.close_at)
            .is_some_and(|at| now >= at);
        if due {
            self.close_form()
        } else {
            None
        }
    }

    /// Ask before deleting the selected row
    pub fn request_delete(&mut self) {
        let index = self.listing.selected;
        let (Some(id), Some(label)) = (
            self.listing.records.id_at(index),
            self.listing.records.label_at(index),
        ) else {
            return;
        };
        self.confirm = Some(Confirm::DeleteRecord {
            resource: self.tab.resource(),
            id: id.to_string(),
            label,
        });
    }

    /// Ask before removing the highlighted enrollment of an expanded row
    pub fn request_unenroll(&mut self) {
        let Some(item) = self.listing.selected_sub_item() else {
            return;
        };
        self.confirm = Some(Confirm::RemoveEnrollment {
            student_id: item.student_id,
            course_id: item.course_id,
            label: item.label,
        });
    }

    /// Resolve the pending prompt; declining issues nothing
    pub fn answer_confirm(&mut self, yes: bool) -> Option<Command> {
        let confirm = self.confirm.take()?;
        if !yes {
            tracing::debug!("Operator declined: {}", confirm.title());
            return None;
        }
        Some(match confirm {
            Confirm::DeleteRecord { resource, id, .. } => Command::Delete { resource, id },
            Confirm::RemoveEnrollment {
                student_id,
                course_id,
                ..
            } => Command::RemoveEnrollment {
                student_id,
                course_id,
            },
        })
    }

    // ─── Results ────────────────────────────────────────────────────────────

    /// Apply a command result; returns the follow-up commands to run
    pub fn apply(&mut self, outcome: Outcome, now: Instant) -> Vec<Command> {
        match outcome {
            Outcome::Loaded {
                tab,
                generation,
                result,
            } => {
                if generation != self.generation || tab != self.tab {
                    tracing::debug!(
                        "Discarding stale {} read (generation {}, latest {})",
                        tab.title(),
                        generation,
                        self.generation
                    );
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(loaded) => {
                        tracing::debug!("Loaded {} {}", loaded.records.len(), tab.title());
                        self.listing.replace(loaded);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load {}: {}", tab.title(), e);
                        self.listing.clear(tab);
                        self.notify(Notice::error(format!(
                            "Failed to load {}",
                            tab.title().to_lowercase()
                        )));
                    }
                }
                Vec::new()
            }
            Outcome::CourseOptions(result) => {
                let picker = match self.form.as_mut() {
                    Some(state) if matches!(state.form, Form::AddCourse { .. }) => state,
                    _ => {
                        tracing::debug!("Course options arrived after the picker closed");
                        return Vec::new();
                    }
                };
                match result {
                    Ok(options) => {
                        picker.load_failed = false;
                        if let Form::AddCourse { courses, .. } = &mut picker.form {
                            *courses = options;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to load courses: {}", e);
                        picker.load_failed = true;
                        self.notify(Notice::error("Failed to load courses"));
                    }
                }
                Vec::new()
            }
            Outcome::Saved {
                ticket,
                kind,
                result,
            } => {
                let succeeded = result.is_ok();
                match &result {
                    Ok(()) => self.notify(Notice::success(kind.success_message())),
                    Err(e) => {
                        tracing::error!("{}: {}", kind.failure_message(), e);
                        self.notify(Notice::error(kind.failure_message()));
                    }
                }

                let Some(state) = self.form.as_mut().filter(|s| s.ticket == Some(ticket)) else {
                    tracing::debug!("Save {} resolved after its form closed", ticket);
                    // The close re-read may have raced the request
                    return if succeeded {
                        vec![self.refresh()]
                    } else {
                        Vec::new()
                    };
                };
                if succeeded {
                    state.close_at = Some(now + self.close_delay);
                } else {
                    state.submitting = false;
                }
                Vec::new()
            }
            Outcome::Deleted { resource, result } => {
                match result {
                    Ok(()) => self.notify(Notice::success("Record deleted")),
                    Err(e) => {
                        tracing::error!("Failed to delete {}: {}", resource.segment(), e);
                        self.notify(Notice::error("Failed to delete record"));
                    }
                }
                vec![self.refresh()]
            }
            Outcome::Unenrolled(result) => match result {
                Ok(()) => {
                    self.notify(Notice::success("Enrollment removed"));
                    vec![self.refresh()]
                }
                Err(e) => {
                    tracing::error!("Failed to remove enrollment: {}", e);
                    self.notify(Notice::error("Failed to remove enrollment"));
                    Vec::new()
                }
            },
        }
    }
}

