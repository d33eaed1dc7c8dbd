// Listing state: the active collection, per-row related data, and the
// per-row expand/collapse flags.
//
// Expand flags are keyed by the owning entity id and survive reloads. They
// are independent from whether related data was fetched: a row can be
// expanded while its sublist is empty.

use super::command::Loaded;
use super::tab::Tab;
use crate::model::{Course, Enrollment, Student};
use std::collections::HashMap;

/// The records of the active tab
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Courses(Vec<Course>),
    Students(Vec<Student>),
    Enrollments(Vec<Enrollment>),
}

impl Default for Records {
    fn default() -> Self {
        Records::Courses(Vec::new())
    }
}

impl Records {
    pub fn empty(tab: Tab) -> Self {
        match tab {
            Tab::Courses => Records::Courses(Vec::new()),
            Tab::Students => Records::Students(Vec::new()),
            Tab::Enrollments => Records::Enrollments(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Courses(v) => v.len(),
            Records::Students(v) => v.len(),
            Records::Enrollments(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the record at `index`
    pub fn id_at(&self, index: usize) -> Option<&str> {
        match self {
            Records::Courses(v) => v.get(index).map(|c| c.id.as_str()),
            Records::Students(v) => v.get(index).map(|s| s.id.as_str()),
            Records::Enrollments(v) => v.get(index).map(|e| e.id.as_str()),
        }
    }

    /// Headline shown for the record at `index`
    pub fn label_at(&self, index: usize) -> Option<String> {
        match self {
            Records::Courses(v) => v.get(index).map(|c| c.name.clone()),
            Records::Students(v) => v.get(index).map(|s| s.name.clone()),
            Records::Enrollments(v) => v.get(index).map(|e| e.student_label()),
        }
    }
}

/// Collapsed/expanded flag per owning id, collapsed by default
#[derive(Debug, Clone, Default)]
pub struct ExpandState {
    flags: HashMap<String, bool>,
}

impl ExpandState {
    pub fn toggle(&mut self, id: &str) {
        let flag = self.flags.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }
}

/// One entry of an expanded row: an enrollment link that can be removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItem {
    pub label: String,
    pub student_id: String,
    pub course_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub records: Records,
    pub enrollments_by_student: HashMap<String, Vec<Enrollment>>,
    pub students_by_course: HashMap<String, Vec<Student>>,
    /// "Show students" flags on the courses tab
    pub expanded_courses: ExpandState,
    /// "Show courses" flags on the students tab
    pub expanded_students: ExpandState,
    /// Highlighted row
    pub selected: usize,
    /// Highlighted entry inside the highlighted row's expanded sublist
    pub sub_selected: usize,
}

impl Listing {
    /// Replace the collection and related data with a fresh read
    pub fn replace(&mut self, loaded: Loaded) {
        self.records = loaded.records;
        self.enrollments_by_student = loaded.enrollments_by_student;
        self.students_by_course = loaded.students_by_course;
        self.clamp_selection();
    }

    /// Drop the collection (failed read or tab switch)
    pub fn clear(&mut self, tab: Tab) {
        self.records = Records::empty(tab);
        self.enrollments_by_student.clear();
        self.students_by_course.clear();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
        self.sub_selected = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
            self.sub_selected = 0;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.sub_selected = 0;
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.records.id_at(self.selected)
    }

    /// Toggle the expand flag of the row at `index`
    pub fn toggle_expanded(&mut self, index: usize) {
        let id = match self.records.id_at(index) {
            Some(id) => id.to_string(),
            None => return,
        };
        match self.records {
            Records::Courses(_) => self.expanded_courses.toggle(&id),
            Records::Students(_) => self.expanded_students.toggle(&id),
            Records::Enrollments(_) => {}
        }
        self.sub_selected = 0;
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        let Some(id) = self.records.id_at(index) else {
            return false;
        };
        match self.records {
            Records::Courses(_) => self.expanded_courses.is_expanded(id),
            Records::Students(_) => self.expanded_students.is_expanded(id),
            Records::Enrollments(_) => false,
        }
    }

    /// Related entries of the row at `index` (students of a course, or
    /// courses of a student)
    pub fn sub_items(&self, index: usize) -> Vec<SubItem> {
        match &self.records {
            Records::Courses(courses) => {
                let Some(course) = courses.get(index) else {
                    return Vec::new();
                };
                self.students_by_course
                    .get(&course.id)
                    .map(|students| {
                        students
                            .iter()
                            .map(|s| SubItem {
                                label: s.name.clone(),
                                student_id: s.id.clone(),
                                course_id: course.id.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            }
            Records::Students(students) => {
                let Some(student) = students.get(index) else {
                    return Vec::new();
                };
                self.enrollments_by_student
                    .get(&student.id)
                    .map(|enrollments| {
                        enrollments
                            .iter()
                            .map(|e| SubItem {
                                label: e.course_label(),
                                student_id: e.student_id.clone(),
                                course_id: e.course_id.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            }
            Records::Enrollments(_) => Vec::new(),
        }
    }

    pub fn sub_next(&mut self) {
        let count = self.sub_items(self.selected).len();
        if self.sub_selected + 1 < count {
            self.sub_selected += 1;
        }
    }

    pub fn sub_prev(&mut self) {
        self.sub_selected = self.sub_selected.saturating_sub(1);
    }

    /// The highlighted sublist entry, only when the selected row is expanded
    pub fn selected_sub_item(&self) -> Option<SubItem> {
        if !self.is_expanded(self.selected) {
            return None;
        }
        self.sub_items(self.selected)
            .into_iter()
            .nth(self.sub_selected)
    }
}
