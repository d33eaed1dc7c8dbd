// Create/edit form state
//
// One variant per kind of modal instead of a single record with optional
// fields. Each variant knows its editable fields and how to turn itself into
// the request to send, running the client-side guards on the way.

use super::command::Save;
use crate::model::{
    parse_date, Course, NewCourse, NewEnrollment, NewStudent, Student, WIRE_DATE,
};
use crate::validation::{check_min_age, required, ValidationError};
use chrono::NaiveDate;
use std::time::Instant;

/// The record being edited
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// New course (`id` is `None`) or edit of an existing one
    Course {
        id: Option<String>,
        name: String,
        description: String,
    },
    /// New student or edit of an existing one; birth date is kept as typed
    Student {
        id: Option<String>,
        name: String,
        email: String,
        birth_date: String,
    },
    /// Raw enrollment by ids (enrollments tab)
    Enrollment { student_id: String, course_id: String },
    /// Course picker for one student (students tab)
    AddCourse {
        student: Student,
        courses: Vec<Course>,
        selected: Option<usize>,
    },
}

impl Form {
    pub fn new_course() -> Self {
        Form::Course {
            id: None,
            name: String::new(),
            description: String::new(),
        }
    }

    pub fn edit_course(course: &Course) -> Self {
        Form::Course {
            id: Some(course.id.clone()),
            name: course.name.clone(),
            description: course.description.clone(),
        }
    }

    pub fn new_student() -> Self {
        Form::Student {
            id: None,
            name: String::new(),
            email: String::new(),
            birth_date: String::new(),
        }
    }

    pub fn edit_student(student: &Student) -> Self {
        Form::Student {
            id: Some(student.id.clone()),
            name: student.name.clone(),
            email: student.email.clone(),
            birth_date: student.birth_date.format(WIRE_DATE).to_string(),
        }
    }

    pub fn new_enrollment() -> Self {
        Form::Enrollment {
            student_id: String::new(),
            course_id: String::new(),
        }
    }

    pub fn add_course(student: &Student) -> Self {
        Form::AddCourse {
            student: student.clone(),
            courses: Vec::new(),
            selected: None,
        }
    }

    /// Modal title
    pub fn title(&self) -> String {
        match self {
            Form::Course { id: None, .. } => "New Course".to_string(),
            Form::Course { id: Some(_), .. } => "Edit Course".to_string(),
            Form::Student { id: None, .. } => "New Student".to_string(),
            Form::Student { id: Some(_), .. } => "Edit Student".to_string(),
            Form::Enrollment { .. } => "New Enrollment".to_string(),
            Form::AddCourse { student, .. } => format!("Add Course for {}", student.name),
        }
    }

    /// Editable text fields as (label, value)
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Form::Course {
                name, description, ..
            } => vec![("Name", name.as_str()), ("Description", description.as_str())],
            Form::Student {
                name,
                email,
                birth_date,
                ..
            } => vec![
                ("Name", name.as_str()),
                ("E-mail", email.as_str()),
                ("Birth date (YYYY-MM-DD)", birth_date.as_str()),
            ],
            Form::Enrollment {
                student_id,
                course_id,
            } => vec![
                ("Student ID", student_id.as_str()),
                ("Course ID", course_id.as_str()),
            ],
            Form::AddCourse { .. } => Vec::new(),
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match self {
            Form::Course {
                name, description, ..
            } => [name, description].into_iter().nth(index),
            Form::Student {
                name,
                email,
                birth_date,
                ..
            } => [name, email, birth_date].into_iter().nth(index),
            Form::Enrollment {
                student_id,
                course_id,
            } => [student_id, course_id].into_iter().nth(index),
            Form::AddCourse { .. } => None,
        }
    }

    /// Validate and build the request; nothing is sent on `Err`
    pub fn to_save(&self, today: NaiveDate) -> Result<Save, ValidationError> {
        match self {
            Form::Course {
                id,
                name,
                description,
            } => {
                let name = required("Name", name)?.to_string();
                let description = required("Description", description)?.to_string();
                Ok(match id {
                    None => Save::CreateCourse(NewCourse { name, description }),
                    Some(id) => Save::UpdateCourse(Course {
                        id: id.clone(),
                        name,
                        description,
                    }),
                })
            }
            Form::Student {
                id,
                name,
                email,
                birth_date,
            } => {
                let name = required("Name", name)?.to_string();
                let email = required("E-mail", email)?.to_string();
                let raw_date = required("Birth date", birth_date)?;
                let birth_date = parse_date(raw_date)
                    .ok_or_else(|| ValidationError::InvalidDate(raw_date.to_string()))?;
                check_min_age(birth_date, today)?;

                Ok(match id {
                    None => Save::CreateStudent(NewStudent {
                        name,
                        email,
                        birth_date,
                    }),
                    Some(id) => Save::UpdateStudent(Student {
                        id: id.clone(),
                        name,
                        email,
                        birth_date,
                    }),
                })
            }
            Form::Enrollment {
                student_id,
                course_id,
            } => {
                let student_id = required("Student ID", student_id)?.to_string();
                if course_id.trim().is_empty() {
                    return Err(ValidationError::NoCourseSelected);
                }
                Ok(Save::CreateEnrollment(NewEnrollment {
                    student_id,
                    course_id: course_id.trim().to_string(),
                }))
            }
            Form::AddCourse {
                student,
                courses,
                selected,
            } => {
                let course = selected
                    .and_then(|i| courses.get(i))
                    .ok_or(ValidationError::NoCourseSelected)?;
                Ok(Save::CreateEnrollment(NewEnrollment {
                    student_id: student.id.clone(),
                    course_id: course.id.clone(),
                }))
            }
        }
    }
}

/// An open form modal
#[derive(Debug, Clone)]
pub struct FormState {
    pub form: Form,
    /// Focused text field
    pub focus: usize,
    /// A request from this form is in flight or already succeeded
    pub submitting: bool,
    /// Ticket of this form's latest submission
    pub ticket: Option<u64>,
    /// The course picker's options could not be loaded
    pub load_failed: bool,
    /// When set, the modal closes at this instant
    pub close_at: Option<Instant>,
}

impl FormState {
    pub fn new(form: Form) -> Self {
        Self {
            form,
            focus: 0,
            submitting: false,
            ticket: None,
            load_failed: false,
            close_at: None,
        }
    }

    /// Whether the form still accepts edits
    pub fn is_editable(&self) -> bool {
        !self.submitting && self.close_at.is_none()
    }

    pub fn focus_next(&mut self) {
        let count = self.form.fields().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.form.fields().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.is_editable() {
            return;
        }
        if let Some(field) = self.form.field_mut(self.focus) {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_editable() {
            return;
        }
        if let Some(field) = self.form.field_mut(self.focus) {
            field.pop();
        }
    }

    /// Move the course picker selection (no-op for text forms)
    pub fn select_step(&mut self, forward: bool) {
        if !self.is_editable() {
            return;
        }
        if let Form::AddCourse {
            courses, selected, ..
        } = &mut self.form
        {
            if courses.is_empty() {
                return;
            }
            let last = courses.len() - 1;
            *selected = Some(match (*selected, forward) {
                (None, _) => 0,
                (Some(i), true) => (i + 1).min(last),
                (Some(i), false) => i.saturating_sub(1),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn student_form(birth: &str) -> Form {
        Form::Student {
            id: None,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            birth_date: birth.to_string(),
        }
    }

    #[test]
    fn test_course_form_builds_create() {
        let form = Form::Course {
            id: None,
            name: " Algorithms ".to_string(),
            description: "Intro".to_string(),
        };
        assert_eq!(
            form.to_save(today()),
            Ok(Save::CreateCourse(NewCourse {
                name: "Algorithms".to_string(),
                description: "Intro".to_string(),
            }))
        );
    }

    #[test]
    fn test_course_form_requires_description() {
        let form = Form::Course {
            id: None,
            name: "Algorithms".to_string(),
            description: String::new(),
        };
        assert_eq!(
            form.to_save(today()),
            Err(ValidationError::MissingField("Description"))
        );
    }

    #[test]
    fn test_student_form_age_boundary() {
        assert!(matches!(
            student_form("2008-10-16").to_save(today()),
            Ok(Save::CreateStudent(_))
        ));
        assert_eq!(
            student_form("2008-10-17").to_save(today()),
            Err(ValidationError::UnderAge { age: 17 })
        );
    }

    #[test]
    fn test_student_form_rejects_bad_date() {
        assert_eq!(
            student_form("16 Oct 2000").to_save(today()),
            Err(ValidationError::InvalidDate("16 Oct 2000".to_string()))
        );
    }

    #[test]
    fn test_edit_student_round_trips_id() {
        let student = Student {
            id: "7".to_string(),
            name: "Bia".to_string(),
            email: "bia@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1999, 4, 1).unwrap(),
        };
        let form = Form::edit_student(&student);
        assert_eq!(form.to_save(today()), Ok(Save::UpdateStudent(student)));
    }

    #[test]
    fn test_add_course_without_selection_is_rejected() {
        let student = Student {
            id: "S1".to_string(),
            name: "Ana".to_string(),
            email: String::new(),
            birth_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        };
        let mut state = FormState::new(Form::add_course(&student));
        assert_eq!(
            state.form.to_save(today()),
            Err(ValidationError::NoCourseSelected)
        );

        if let Form::AddCourse { courses, .. } = &mut state.form {
            courses.push(Course {
                id: "C1".to_string(),
                name: "Algorithms".to_string(),
                description: String::new(),
            });
        }
        state.select_step(true);
        assert_eq!(
            state.form.to_save(today()),
            Ok(Save::CreateEnrollment(NewEnrollment {
                student_id: "S1".to_string(),
                course_id: "C1".to_string(),
            }))
        );
    }

    #[test]
    fn test_enrollment_form_without_course_id() {
        let form = Form::Enrollment {
            student_id: "S1".to_string(),
            course_id: "  ".to_string(),
        };
        assert_eq!(
            form.to_save(today()),
            Err(ValidationError::NoCourseSelected)
        );
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut state = FormState::new(Form::new_course());
        state.insert_char('R');
        state.focus_next();
        state.insert_char('x');
        state.insert_char('y');
        state.backspace();

        assert_eq!(state.form.fields(), vec![("Name", "R"), ("Description", "x")]);

        state.submitting = true;
        state.insert_char('z');
        assert_eq!(state.form.fields()[1].1, "x");
    }
}
