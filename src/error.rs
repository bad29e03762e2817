//! Error and diagnostic types produced while ingesting registry files.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal ingestion failures. Any of these aborts the whole ingestion pass.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Can't open '{}': file not found", .path.display())]
    MissingFile { path: PathBuf },

    #[error(
        "'{}' has {found} fields on line {line} but expected {expected}",
        .path.display()
    )]
    MalformedLine {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A grade record that cites an id missing from one of the registries.
///
/// These are non-fatal: the missing side of the record is skipped and
/// ingestion continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnknownStudent { cwid: String, course: String },
    UnknownInstructor { cwid: String, course: String },
}

impl Diagnostic {
    /// The id that could not be resolved.
    pub fn cwid(&self) -> &str {
        match self {
            Diagnostic::UnknownStudent { cwid, .. } | Diagnostic::UnknownInstructor { cwid, .. } => {
                cwid
            }
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownStudent { cwid, course } => {
                write!(f, "grade for unknown student {cwid} in {course}")
            }
            Diagnostic::UnknownInstructor { cwid, course } => {
                write!(f, "grade for unknown instructor {cwid} in {course}")
            }
        }
    }
}
