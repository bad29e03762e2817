//! CLI entry point for the university registry report.
//!
//! Reads the student, instructor and grade files from a data directory and
//! prints the student and instructor summary tables.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use univ_report::{Repository, output};

#[derive(Parser)]
#[command(name = "univ_report")]
#[command(about = "Summarize student and instructor registries", long_about = None)]
struct Cli {
    /// Directory containing students.txt, instructors.txt and grades.txt
    #[arg(value_name = "DIR", env = "UNIV_REPORT_DIR", default_value = "data")]
    dir: PathBuf,

    /// Output format for the summary tables
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Also export the summaries as CSV files into this directory
    #[arg(long, value_name = "DIR")]
    csv_dir: Option<PathBuf>,

    /// Ingest and report problems without printing the tables
    #[arg(long, default_value_t = false)]
    no_tables: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    info!(dir = %cli.dir.display(), "Loading repository");

    let (repo, report) = match Repository::load(&cli.dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            // Fatal ingestion problems end the run without tables.
            error!(error = %e, "Ingestion failed");
            println!("{e}");
            return Ok(());
        }
    };

    info!(
        dir = %repo.dir().display(),
        students = report.students,
        instructors = report.instructors,
        grades = report.grades,
        "Repository loaded"
    );

    if !report.diagnostics.is_empty() {
        warn!(
            count = report.diagnostics.len(),
            "Grade records referenced unknown students or instructors"
        );
    }

    if !cli.no_tables {
        match cli.format {
            Format::Table => output::print_tables(&repo)?,
            Format::Json => output::print_json(&repo, &report)?,
        }
    }

    if let Some(csv_dir) = &cli.csv_dir {
        output::write_csv(csv_dir, &repo)
            .with_context(|| format!("failed to export CSV to '{}'", csv_dir.display()))?;
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard must live until exit so buffered file output is flushed.
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/univ_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("univ_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
