//! CSV export discovery and ingestion.
//!
//! Turns uploaded reading-log bytes into a [`RecordTable`] and locates
//! export files on disk for the CLI front-end. Quoted fields matter here:
//! real export titles contain commas.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use readstats_core::error::{AnalyticsError, Result};
use readstats_core::models::RecordTable;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse uploaded bytes with a declared file extension into a table.
///
/// Only the `csv` extension is accepted (ASCII case-insensitive); anything
/// else fails with a parse error before the bytes are touched.
pub fn ingest(bytes: &[u8], extension: &str) -> Result<RecordTable> {
    if !extension.eq_ignore_ascii_case("csv") {
        return Err(AnalyticsError::Parse(format!(
            "unsupported file extension: {extension}"
        )));
    }
    parse_csv(bytes)
}

/// Read and ingest the file at `path`, using the path's own extension.
pub fn read_table(path: &Path) -> Result<RecordTable> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let bytes = std::fs::read(path).map_err(|source| AnalyticsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    ingest(&bytes, extension)
}

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Input path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// The most recently modified `.csv` file under `dir`.
///
/// The original upload flow always analyzed whatever export arrived last;
/// the CLI keeps that behavior when pointed at a directory.
pub fn latest_csv(dir: &Path) -> Option<PathBuf> {
    find_csv_files(dir)
        .into_iter()
        .max_by_key(|path| modified_time(path))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn modified_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Parse CSV bytes into a [`RecordTable`].
///
/// Rows narrower than the header are padded with empty cells and wider
/// rows are cut, so every row ends up header-width. A malformed or
/// undecodable input surfaces as a parse error; an input without a header
/// row does too.
fn parse_csv(bytes: &[u8]) -> Result<RecordTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnalyticsError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AnalyticsError::Parse(
            "input contains no header row".to_string(),
        ));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AnalyticsError::Parse(e.to_string()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    debug!(
        "Parsed CSV table: {} columns, {} rows",
        headers.len(),
        rows.len()
    );

    Ok(RecordTable { headers, rows })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
