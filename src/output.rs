//! Rendering of the summary tables.
//!
//! Supports bordered text tables, JSON, and CSV export.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::error::Diagnostic;
use crate::instructor::InstructorSummary;
use crate::repository::{IngestReport, Repository};
use crate::student::StudentSummary;

pub const STUDENT_CSV: &str = "student_summary.csv";
pub const INSTRUCTOR_CSV: &str = "instructor_summary.csv";

/// Full report serialized by [`write_json`].
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub students: Vec<StudentSummary>,
    pub instructors: Vec<InstructorSummary>,
    pub diagnostics: &'a [Diagnostic],
}

/// Formats course names as a list literal, e.g. `['SSW 540', 'SSW 564']`.
pub fn format_courses(courses: &[String]) -> String {
    let items: Vec<String> = courses.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", items.join(", "))
}

/// Renders `rows` under `headers` as a bordered table with centred cells.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{rule}+\n");

    let mut out = String::new();
    out.push_str(&rule);
    out.push_str(&render_line(headers.iter().copied(), &widths));
    out.push_str(&rule);
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    if !rows.is_empty() {
        out.push_str(&rule);
    }
    out
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!(" {} ", center(cell, width)))
        .collect();
    format!("|{}|\n", cells.join("|"))
}

/// Centres `text` in `width` columns. When the padding is uneven the extra
/// space goes right of odd-length text and left of even-length text.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let excess = width.saturating_sub(len);
    let (left, right) = if excess % 2 == 1 && len % 2 == 0 {
        (excess / 2 + 1, excess / 2)
    } else {
        (excess / 2, excess - excess / 2)
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

pub fn student_rows(rows: &[StudentSummary]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.cwid.clone(),
                r.name.clone(),
                format_courses(&r.completed_courses),
            ]
        })
        .collect()
}

pub fn instructor_rows(rows: &[InstructorSummary]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.cwid.clone(),
                r.name.clone(),
                r.dept.clone(),
                r.course.clone(),
                r.students.to_string(),
            ]
        })
        .collect()
}

/// Writes the student table followed by the instructor table.
pub fn write_tables(out: &mut impl Write, repo: &Repository) -> io::Result<()> {
    let students = student_rows(&repo.student_table());
    let instructors = instructor_rows(&repo.instructor_table());

    writeln!(out, "\nStudent Table")?;
    write!(out, "{}", render_table(&StudentSummary::FIELD_NAMES, &students))?;
    writeln!(out, "\nInstructor Table")?;
    write!(
        out,
        "{}",
        render_table(&InstructorSummary::FIELD_NAMES, &instructors)
    )?;
    Ok(())
}

pub fn print_tables(repo: &Repository) -> Result<()> {
    write_tables(&mut io::stdout().lock(), repo)?;
    Ok(())
}

/// Writes both tables and the ingest diagnostics as pretty-printed JSON.
pub fn write_json(out: &mut impl Write, repo: &Repository, report: &IngestReport) -> Result<()> {
    let report = Report {
        generated_at: Utc::now(),
        students: repo.student_table(),
        instructors: repo.instructor_table(),
        diagnostics: &report.diagnostics,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_json(repo: &Repository, report: &IngestReport) -> Result<()> {
    write_json(&mut io::stdout().lock(), repo, report)
}

/// Exports both tables as CSV files inside `dir`, creating it if needed.
///
/// Completed courses are joined with `;` in a single cell.
pub fn write_csv(dir: &Path, repo: &Repository) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create '{}'", dir.display()))?;

    let path = dir.join(STUDENT_CSV);
    debug!(path = %path.display(), "Writing student CSV");
    let mut writer = WriterBuilder::new().from_path(&path)?;
    writer.write_record(StudentSummary::FIELD_NAMES)?;
    for row in repo.student_table() {
        writer.write_record([row.cwid, row.name, row.completed_courses.join(";")])?;
    }
    writer.flush()?;

    let path = dir.join(INSTRUCTOR_CSV);
    debug!(path = %path.display(), "Writing instructor CSV");
    let mut writer = WriterBuilder::new().from_path(&path)?;
    writer.write_record(InstructorSummary::FIELD_NAMES)?;
    for row in repo.instructor_table() {
        writer.write_record([
            row.cwid,
            row.name,
            row.dept,
            row.course,
            row.students.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(dir = %dir.display(), "CSV export complete");
    Ok(())
}
