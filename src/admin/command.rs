// Backend work requested by the admin state, and its results
//
// The admin state never awaits. It hands out `Command`s; whoever owns the
// event loop runs them with `perform` (spawned in the TUI, inline in the CLI
// and tests) and feeds the resulting `Outcome` back through `Admin::apply`.

use super::listing::Records;
use super::tab::Tab;
use crate::api::{ApiClient, ApiError, Resource};
use crate::model::{Course, Enrollment, NewCourse, NewEnrollment, NewStudent, Student};
use std::collections::HashMap;

/// A unit of backend work
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Re-read the collection of `tab` and its per-row related data
    Refresh { tab: Tab, generation: u64 },
    /// Load the course options of the add-course picker
    LoadCourseOptions,
    /// Send a form's request; `ticket` identifies the submission
    Save { ticket: u64, save: Save },
    Delete { resource: Resource, id: String },
    RemoveEnrollment { student_id: String, course_id: String },
}

/// A create/update/enroll request built from a validated form
#[derive(Debug, Clone, PartialEq)]
pub enum Save {
    CreateCourse(NewCourse),
    CreateStudent(NewStudent),
    CreateEnrollment(NewEnrollment),
    UpdateCourse(Course),
    UpdateStudent(Student),
}

/// What a create/update/enroll did, for the notification text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created(&'static str),
    Updated(&'static str),
    Enrolled,
}

impl SaveKind {
    pub fn success_message(self) -> String {
        match self {
            SaveKind::Created(noun) => format!("{} created", noun),
            SaveKind::Updated(noun) => format!("{} updated", noun),
            SaveKind::Enrolled => "Student enrolled".to_string(),
        }
    }

    pub fn failure_message(self) -> String {
        match self {
            SaveKind::Created(noun) => format!("Failed to create {}", noun.to_lowercase()),
            SaveKind::Updated(noun) => format!("Failed to update {}", noun.to_lowercase()),
            SaveKind::Enrolled => "Failed to enroll student".to_string(),
        }
    }
}

/// A freshly read collection plus the related data its rows display
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub records: Records,
    pub enrollments_by_student: HashMap<String, Vec<Enrollment>>,
    pub students_by_course: HashMap<String, Vec<Student>>,
}

/// Result of a performed command
#[derive(Debug, Clone)]
pub enum Outcome {
    Loaded {
        tab: Tab,
        generation: u64,
        result: Result<Loaded, ApiError>,
    },
    CourseOptions(Result<Vec<Course>, ApiError>),
    Saved {
        ticket: u64,
        kind: SaveKind,
        result: Result<(), ApiError>,
    },
    Deleted {
        resource: Resource,
        result: Result<(), ApiError>,
    },
    Unenrolled(Result<(), ApiError>),
}

/// Run one command against the backend
pub async fn perform(client: &ApiClient, command: Command) -> Outcome {
    match command {
        Command::Refresh { tab, generation } => Outcome::Loaded {
            tab,
            generation,
            result: load(client, tab).await,
        },
        Command::LoadCourseOptions => Outcome::CourseOptions(client.list_courses().await),
        Command::Save { ticket, save } => {
            let (kind, result) = match save {
                Save::CreateCourse(body) => {
                    (SaveKind::Created("Course"), client.create_course(&body).await)
                }
                Save::CreateStudent(body) => {
                    (SaveKind::Created("Student"), client.create_student(&body).await)
                }
                Save::CreateEnrollment(body) => {
                    (SaveKind::Enrolled, client.create_enrollment(&body).await)
                }
                Save::UpdateCourse(course) => {
                    (SaveKind::Updated("Course"), client.update_course(&course).await)
                }
                Save::UpdateStudent(student) => {
                    (SaveKind::Updated("Student"), client.update_student(&student).await)
                }
            };
            Outcome::Saved {
                ticket,
                kind,
                result,
            }
        }
        Command::Delete { resource, id } => Outcome::Deleted {
            resource,
            result: client.delete(resource, &id).await,
        },
        Command::RemoveEnrollment {
            student_id,
            course_id,
        } => Outcome::Unenrolled(client.remove_enrollment(&student_id, &course_id).await),
    }
}

/// Read a tab's collection, then its related sublists concurrently
async fn load(client: &ApiClient, tab: Tab) -> Result<Loaded, ApiError> {
    match tab {
        Tab::Courses => {
            let courses = client.list_courses().await?;
            let ids: Vec<String> = courses.iter().map(|c| c.id.clone()).collect();
            let students_by_course = client.students_for_courses(&ids).await;
            Ok(Loaded {
                records: Records::Courses(courses),
                students_by_course,
                ..Default::default()
            })
        }
        Tab::Students => {
            let students = client.list_students().await?;
            let ids: Vec<String> = students.iter().map(|s| s.id.clone()).collect();
            let enrollments_by_student = client.enrollments_for_students(&ids).await;
            Ok(Loaded {
                records: Records::Students(students),
                enrollments_by_student,
                ..Default::default()
            })
        }
        Tab::Enrollments => Ok(Loaded {
            records: Records::Enrollments(client.list_enrollments().await?),
            ..Default::default()
        }),
    }
}
