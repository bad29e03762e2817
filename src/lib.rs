pub mod error;
pub mod instructor;
pub mod output;
pub mod reader;
pub mod repository;
pub mod student;

pub use error::{Diagnostic, IngestError};
pub use repository::{DataFiles, IngestReport, Repository};
