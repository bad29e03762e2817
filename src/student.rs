//! Student records and the completed-courses summary row.

use serde::Serialize;
use std::collections::BTreeMap;

/// A student and the grades earned per course.
#[derive(Debug, Clone)]
pub struct Student {
    cwid: String,
    name: String,
    major: String,
    // Ordered by course name so summaries come out sorted.
    courses: BTreeMap<String, String>,
}

/// One row of the student summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub cwid: String,
    pub name: String,
    pub completed_courses: Vec<String>,
}

impl StudentSummary {
    pub const FIELD_NAMES: [&'static str; 3] = ["CWID", "Name", "Completed Courses"];
}

impl Student {
    pub fn new(cwid: impl Into<String>, name: impl Into<String>, major: impl Into<String>) -> Self {
        Self {
            cwid: cwid.into(),
            name: name.into(),
            major: major.into(),
            courses: BTreeMap::new(),
        }
    }

    pub fn cwid(&self) -> &str {
        &self.cwid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    /// Records `grade` for `course`, replacing any earlier grade.
    pub fn record_course(&mut self, course: impl Into<String>, grade: impl Into<String>) {
        self.courses.insert(course.into(), grade.into());
    }

    pub fn grade(&self, course: &str) -> Option<&str> {
        self.courses.get(course).map(String::as_str)
    }

    pub fn summary_row(&self) -> StudentSummary {
        StudentSummary {
            cwid: self.cwid.clone(),
            name: self.name.clone(),
            completed_courses: self.courses.keys().cloned().collect(),
        }
    }
}
