//! Lazy decoder for fixed-width delimited text files.
//!
//! Registry files are plain tab-separated lines without quoting. Each line is
//! decoded into an `[String; N]` so callers can destructure it directly:
//!
//! ```no_run
//! # use univ_report::reader::read_records;
//! for record in read_records::<3>("data/students.txt", b'\t', false)? {
//!     let [cwid, name, major] = record?;
//!     println!("{cwid} {name} {major}");
//! }
//! # Ok::<(), univ_report::error::IngestError>(())
//! ```

use crate::error::IngestError;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Iterator over the decoded lines of one file.
///
/// Owns the open file handle; dropping the iterator closes the file.
pub struct Records<const N: usize> {
    path: PathBuf,
    separator: char,
    skip_header: bool,
    line: u64,
    lines: Lines<BufReader<File>>,
}

/// Opens `path` and returns a lazy iterator of `N`-field records.
///
/// Every line counts, blank ones included: an empty line has a single empty
/// field. When `header` is set the first line is skipped. `separator` must be
/// an ASCII byte.
///
/// # Errors
///
/// Returns [`IngestError::MissingFile`] if `path` does not exist and
/// [`IngestError::Io`] for any other open failure. Field count mismatches
/// are reported lazily, by the iterator, on the offending line.
pub fn read_records<const N: usize>(
    path: impl AsRef<Path>,
    separator: u8,
    header: bool,
) -> Result<Records<N>, IngestError> {
    let path = path.as_ref().to_path_buf();

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(IngestError::MissingFile { path });
        }
        Err(source) => return Err(IngestError::Io { path, source }),
    };
    debug!(path = %path.display(), fields = N, header, "Opened record file");

    Ok(Records {
        path,
        separator: char::from(separator),
        skip_header: header,
        line: 0,
        lines: BufReader::new(file).lines(),
    })
}

impl<const N: usize> Records<N> {
    fn next_line(&mut self) -> Option<Result<String, IngestError>> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.map_err(|source| IngestError::Io {
            path: self.path.clone(),
            source,
        }))
    }
}

impl<const N: usize> Iterator for Records<N> {
    type Item = Result<[String; N], IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_header {
            self.skip_header = false;
            if let Err(e) = self.next_line()? {
                return Some(Err(e));
            }
        }

        let line = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };

        let fields: Vec<String> = line.split(self.separator).map(str::to_owned).collect();
        Some(
            <[String; N]>::try_from(fields).map_err(|fields| IngestError::MalformedLine {
                path: self.path.clone(),
                line: self.line,
                found: fields.len(),
                expected: N,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_tab_separated_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "1\tAlice\tSSW\n2\tBob Smith\tCS\n");

        let rows: Vec<[String; 3]> = read_records::<3>(&path, b'\t', false)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["1", "Alice", "SSW"].map(String::from));
        assert_eq!(rows[1][1], "Bob Smith");
    }

    #[test]
    fn test_header_line_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "cwid|name|major\n10|Ann|EE\n");

        let rows: Vec<[String; 3]> = read_records::<3>(&path, b'|', true)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows, vec![["10", "Ann", "EE"].map(String::from)]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "1\tAlice\tSSW\r\n");

        let row = read_records::<3>(&path, b'\t', false)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(row[2], "SSW");
    }

    #[test]
    fn test_quotes_are_literal() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "1\t\"O'Neil, J\"\tSSW\n");

        let row = read_records::<3>(&path, b'\t', false)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(row[1], "\"O'Neil, J\"");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_records::<3>(dir.path().join("nope.txt"), b'\t', false);

        assert!(matches!(result, Err(IngestError::MissingFile { .. })));
    }

    #[test]
    fn test_field_count_mismatch_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "g.txt", "1\tSSW 540\tA\t2\n1\tSSW 564\tB\n");

        let mut records = read_records::<4>(&path, b'\t', false).unwrap();
        assert!(records.next().unwrap().is_ok());

        match records.next().unwrap() {
            Err(IngestError::MalformedLine {
                line,
                found,
                expected,
                ..
            }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 3);
                assert_eq!(expected, 4);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_too_many_fields_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "1\tAlice\tSSW\textra\n");

        let result = read_records::<3>(&path, b'\t', false)
            .unwrap()
            .next()
            .unwrap();

        assert!(matches!(
            result,
            Err(IngestError::MalformedLine { found: 4, .. })
        ));
    }

    #[test]
    fn test_blank_line_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "1\tAlice\tSSW\n\n2\tBob\tCS\n");

        let result: Result<Vec<[String; 3]>, _> =
            read_records::<3>(&path, b'\t', false).unwrap().collect();

        assert!(matches!(
            result,
            Err(IngestError::MalformedLine {
                line: 2,
                found: 1,
                expected: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_trailing_blank_line_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "g.txt", "1\tSSW540\tA\t2\n\n");

        let mut records = read_records::<4>(&path, b'\t', false).unwrap();
        assert!(records.next().unwrap().is_ok());
        assert!(matches!(
            records.next().unwrap(),
            Err(IngestError::MalformedLine { line: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_line_number_counts_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "cwid\tname\tmajor\n1\tAlice\tSSW\n\nbad\n");

        let errors: Vec<_> = read_records::<3>(&path, b'\t', true)
            .unwrap()
            .filter_map(Result::err)
            .collect();

        let lines: Vec<u64> = errors
            .iter()
            .map(|e| match e {
                IngestError::MalformedLine { line, .. } => *line,
                other => panic!("expected MalformedLine, got {other:?}"),
            })
            .collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "s.txt", "");

        assert_eq!(read_records::<3>(&path, b'\t', false).unwrap().count(), 0);
    }
}
