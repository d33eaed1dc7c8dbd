use crate::api::Resource;

/// Entity category driving which collection is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Courses,
    Students,
    Enrollments,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Courses, Tab::Students, Tab::Enrollments];

    pub fn resource(self) -> Resource {
        match self {
            Tab::Courses => Resource::Course,
            Tab::Students => Resource::Student,
            Tab::Enrollments => Resource::Enrollment,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Courses => "Courses",
            Tab::Students => "Students",
            Tab::Enrollments => "Enrollments",
        }
    }

    /// Singular noun for one record of the tab
    pub fn noun(self) -> &'static str {
        match self {
            Tab::Courses => "Course",
            Tab::Students => "Student",
            Tab::Enrollments => "Enrollment",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Courses => Tab::Students,
            Tab::Students => Tab::Enrollments,
            Tab::Enrollments => Tab::Courses,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Courses => Tab::Enrollments,
            Tab::Students => Tab::Courses,
            Tab::Enrollments => Tab::Students,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Courses => 0,
            Tab::Students => 1,
            Tab::Enrollments => 2,
        }
    }
}
