//! Instructor records and per-course enrollment counts.

use serde::Serialize;

/// An instructor and the number of students taught per course.
#[derive(Debug, Clone)]
pub struct Instructor {
    cwid: String,
    name: String,
    dept: String,
    /// Enrollment counts in order of first appearance.
    courses: Vec<(String, usize)>,
}

/// One row of the instructor summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorSummary {
    pub cwid: String,
    pub name: String,
    pub dept: String,
    pub course: String,
    pub students: usize,
}

impl InstructorSummary {
    pub const FIELD_NAMES: [&'static str; 5] = ["CWID", "Name", "Dept", "Course", "Students"];
}

impl Instructor {
    pub fn new(cwid: impl Into<String>, name: impl Into<String>, dept: impl Into<String>) -> Self {
        Self {
            cwid: cwid.into(),
            name: name.into(),
            dept: dept.into(),
            courses: Vec::new(),
        }
    }

    pub fn cwid(&self) -> &str {
        &self.cwid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dept(&self) -> &str {
        &self.dept
    }

    /// Counts one more student in `course`, starting from zero.
    pub fn record_enrollment(&mut self, course: &str) {
        match self.courses.iter_mut().find(|(c, _)| c == course) {
            Some((_, count)) => *count += 1,
            None => self.courses.push((course.to_string(), 1)),
        }
    }

    /// Number of students recorded for `course`; zero if never taught.
    pub fn enrollment(&self, course: &str) -> usize {
        self.courses
            .iter()
            .find(|(c, _)| c == course)
            .map_or(0, |(_, count)| *count)
    }

    /// Yields one row per course taught. Each call starts a fresh pass.
    pub fn summary_rows(&self) -> impl Iterator<Item = InstructorSummary> + '_ {
        self.courses
            .iter()
            .map(move |(course, count)| InstructorSummary {
                cwid: self.cwid.clone(),
                name: self.name.clone(),
                dept: self.dept.clone(),
                course: course.clone(),
                students: *count,
            })
    }
}
