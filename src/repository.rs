//! Student and instructor registries joined through grade records.
//!
//! A [`Repository`] reads three tab-separated files from one directory:
//!
//! | File              | Fields                                   |
//! |-------------------|------------------------------------------|
//! | `students.txt`    | cwid, name, major                        |
//! | `instructors.txt` | cwid, name, dept                         |
//! | `grades.txt`      | student cwid, course, grade, instructor cwid |
//!
//! Students and instructors must be loaded before grades, since every grade
//! record is resolved against both registries.

use crate::error::{Diagnostic, IngestError};
use crate::instructor::{Instructor, InstructorSummary};
use crate::reader::read_records;
use crate::student::{Student, StudentSummary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SEPARATOR: u8 = b'\t';

/// File names looked up inside the repository directory.
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub students: String,
    pub instructors: String,
    pub grades: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            students: "students.txt".to_string(),
            instructors: "instructors.txt".to_string(),
            grades: "grades.txt".to_string(),
        }
    }
}

/// Outcome of a successful [`Repository::ingest`] pass.
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    pub students: usize,
    pub instructors: usize,
    pub grades: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Id-keyed map that iterates in insertion order.
///
/// Re-inserting an existing id replaces the value in place.
#[derive(Debug)]
struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    fn insert(&mut self, id: String, value: T) {
        match self.index.get(&id) {
            Some(&pos) => self.entries[pos] = value,
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(value);
            }
        }
    }

    fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.index.get(id).map(|&pos| &mut self.entries[pos])
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

#[derive(Debug)]
pub struct Repository {
    dir: PathBuf,
    files: DataFiles,
    students: Registry<Student>,
    instructors: Registry<Instructor>,
}

impl Repository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_files(dir, DataFiles::default())
    }

    pub fn with_files(dir: impl Into<PathBuf>, files: DataFiles) -> Self {
        Self {
            dir: dir.into(),
            files,
            students: Registry::default(),
            instructors: Registry::default(),
        }
    }

    /// Builds a repository for `dir` and ingests it in one step.
    pub fn load(dir: impl Into<PathBuf>) -> Result<(Self, IngestReport), IngestError> {
        let mut repo = Self::new(dir);
        let report = repo.ingest()?;
        Ok((repo, report))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads students, instructors and grades, in that order.
    ///
    /// Registries are rebuilt from scratch and only replace the current ones
    /// when every file was read successfully, so a failed pass leaves no
    /// partial state behind.
    ///
    /// # Errors
    ///
    /// Fails on the first missing file or malformed line. Grade records
    /// citing unknown ids are not errors; they are logged and returned in
    /// [`IngestReport::diagnostics`].
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn ingest(&mut self) -> Result<IngestReport, IngestError> {
        let mut students = Registry::default();
        let mut instructors = Registry::default();

        read_students(&self.dir.join(&self.files.students), &mut students)?;
        info!(count = students.len(), "Students loaded");

        read_instructors(&self.dir.join(&self.files.instructors), &mut instructors)?;
        info!(count = instructors.len(), "Instructors loaded");

        let (grades, diagnostics) = read_grades(
            &self.dir.join(&self.files.grades),
            &mut students,
            &mut instructors,
        )?;
        info!(
            count = grades,
            unknown_references = diagnostics.len(),
            "Grades loaded"
        );

        let report = IngestReport {
            students: students.len(),
            instructors: instructors.len(),
            grades,
            diagnostics,
        };

        self.students = students;
        self.instructors = instructors;

        Ok(report)
    }

    pub fn student(&self, cwid: &str) -> Option<&Student> {
        self.students.get(cwid)
    }

    pub fn instructor(&self, cwid: &str) -> Option<&Instructor> {
        self.instructors.get(cwid)
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn instructors(&self) -> impl Iterator<Item = &Instructor> {
        self.instructors.iter()
    }

    /// One row per student, in registry order.
    pub fn student_table(&self) -> Vec<StudentSummary> {
        self.students.iter().map(Student::summary_row).collect()
    }

    /// One row per (instructor, course) pair, in registry order.
    pub fn instructor_table(&self) -> Vec<InstructorSummary> {
        self.instructors
            .iter()
            .flat_map(|instructor| instructor.summary_rows())
            .collect()
    }
}

fn read_students(path: &Path, students: &mut Registry<Student>) -> Result<(), IngestError> {
    for record in read_records::<3>(path, SEPARATOR, false)? {
        let [cwid, name, major] = record?;
        debug!(cwid = %cwid, "Student");
        students.insert(cwid.clone(), Student::new(cwid, name, major));
    }
    Ok(())
}

fn read_instructors(
    path: &Path,
    instructors: &mut Registry<Instructor>,
) -> Result<(), IngestError> {
    for record in read_records::<3>(path, SEPARATOR, false)? {
        let [cwid, name, dept] = record?;
        debug!(cwid = %cwid, "Instructor");
        instructors.insert(cwid.clone(), Instructor::new(cwid, name, dept));
    }
    Ok(())
}

/// Applies every grade record to both registries and returns the record
/// count along with any unknown references.
fn read_grades(
    path: &Path,
    students: &mut Registry<Student>,
    instructors: &mut Registry<Instructor>,
) -> Result<(usize, Vec<Diagnostic>), IngestError> {
    let mut count = 0;
    let mut diagnostics = Vec::new();

    for record in read_records::<4>(path, SEPARATOR, false)? {
        let [student_cwid, course, grade, instructor_cwid] = record?;
        count += 1;

        // The two sides are resolved independently.
        match students.get_mut(&student_cwid) {
            Some(student) => student.record_course(course.clone(), grade),
            None => {
                warn!(cwid = %student_cwid, course = %course, "Grade for unknown student");
                diagnostics.push(Diagnostic::UnknownStudent {
                    cwid: student_cwid,
                    course: course.clone(),
                });
            }
        }

        match instructors.get_mut(&instructor_cwid) {
            Some(instructor) => instructor.record_enrollment(&course),
            None => {
                warn!(cwid = %instructor_cwid, course = %course, "Grade for unknown instructor");
                diagnostics.push(Diagnostic::UnknownInstructor {
                    cwid: instructor_cwid,
                    course,
                });
            }
        }
    }

    Ok((count, diagnostics))
}
