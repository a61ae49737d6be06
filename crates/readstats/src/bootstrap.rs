use std::path::{Path, PathBuf};
use std::sync::Arc;

use readstats_core::error::{AnalyticsError, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// Logs go to stderr so the report on stdout stays clean; pass `log_file`
/// to write them to a file instead.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match log_file {
        Some(path) => BoxMakeWriter::new(Arc::new(std::fs::File::create(path)?)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_ansi(log_file.is_none())
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Input resolution ───────────────────────────────────────────────────────────

/// Resolve the CLI input path to one concrete export file.
///
/// A file path passes through untouched. A directory resolves to its most
/// recently modified `.csv` file, matching the original upload flow where
/// the analysis always ran over whatever export arrived last. A directory
/// with no exports at all is a parse error.
pub fn resolve_input(input: &Path) -> Result<PathBuf> {
    if !input.is_dir() {
        return Ok(input.to_path_buf());
    }

    readstats_data::ingest::latest_csv(input).ok_or_else(|| {
        AnalyticsError::Parse(format!("no .csv files found under {}", input.display()))
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
