//! Row normalization: raw table cells into analyzable read records.
//!
//! First analytics stage. Resolves the finish date (with the date-added
//! fallback for "read" books), keeps only the "read" shelf, derives the
//! period fields, and applies the cutoff-year lower bound. Rows that cannot
//! be normalized are dropped, never escalated: the engine favors fewer but
//! usable rows over aborting the whole analysis.

use chrono::{Datelike, NaiveDate};
use readstats_core::error::{AnalyticsError, Result};
use readstats_core::models::{NormalizedRecord, RecordTable, Shelf};
use tracing::debug;

// ── Column names ──────────────────────────────────────────────────────────────

/// Header of the title column.
pub const COLUMN_TITLE: &str = "Title";
/// Header of the star-rating column; 0 means unrated.
pub const COLUMN_RATING: &str = "My Rating";
/// Header of the shelf-status column.
pub const COLUMN_SHELF: &str = "Exclusive Shelf";
/// Header of the date the book entered the log.
pub const COLUMN_DATE_ADDED: &str = "Date Added";
/// Header of the finish-date column.
pub const COLUMN_DATE_READ: &str = "Date Read";

/// Page-count header aliases across export revisions, probed in order.
pub const PAGE_COLUMNS: &[&str] = &["Number of Pages", "num_pages", "Pages"];

/// Date layouts accepted in export cells, tried in order.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalize a raw table into "read"-shelf records with derived period fields.
///
/// `cutoff_year` is an inclusive lower bound on the read-year; `None` keeps
/// every year. Fails only when a required column is missing from the header.
/// Individual rows that cannot be resolved are dropped silently: missing
/// finish dates are expected for in-progress books.
pub fn normalize(table: &RecordTable, cutoff_year: Option<i32>) -> Result<Vec<NormalizedRecord>> {
    let columns = ColumnMap::resolve(table)?;

    let mut records = Vec::new();
    let mut dropped_shelf = 0usize;
    let mut dropped_date = 0usize;
    let mut dropped_cutoff = 0usize;

    for row in &table.rows {
        if !Shelf::parse(&row[columns.shelf]).is_read() {
            dropped_shelf += 1;
            continue;
        }

        let Some(read_date) = resolve_read_date(&row[columns.date_read], &row[columns.date_added])
        else {
            dropped_date += 1;
            continue;
        };

        let year = read_date.year();
        if let Some(cutoff) = cutoff_year {
            if year < cutoff {
                dropped_cutoff += 1;
                continue;
            }
        }

        records.push(NormalizedRecord {
            title: row[columns.title].clone(),
            rating: parse_rating(&row[columns.rating]),
            pages: columns.pages.and_then(|idx| parse_pages(&row[idx])),
            read_date,
            year,
            month: read_date.month(),
            weekday: read_date.weekday().num_days_from_monday(),
            weekday_name: read_date.format("%A").to_string(),
        });
    }

    debug!(
        "Normalized {} of {} rows ({} off-shelf, {} without a usable date, {} before cutoff)",
        records.len(),
        table.len(),
        dropped_shelf,
        dropped_date,
        dropped_cutoff
    );

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Column indexes resolved once per table.
struct ColumnMap {
    title: usize,
    rating: usize,
    shelf: usize,
    date_added: usize,
    date_read: usize,
    /// Optional: some export revisions carry no page-count column at all.
    pages: Option<usize>,
}

impl ColumnMap {
    fn resolve(table: &RecordTable) -> Result<Self> {
        Ok(Self {
            title: require(table, COLUMN_TITLE)?,
            rating: require(table, COLUMN_RATING)?,
            shelf: require(table, COLUMN_SHELF)?,
            date_added: require(table, COLUMN_DATE_ADDED)?,
            date_read: require(table, COLUMN_DATE_READ)?,
            pages: table.column_index_any(PAGE_COLUMNS),
        })
    }
}

fn require(table: &RecordTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))
}

/// Finish date of a "read" row, falling back to the date added.
fn resolve_read_date(date_read: &str, date_added: &str) -> Option<NaiveDate> {
    parse_date(date_read).or_else(|| parse_date(date_added))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Star rating as exported. Unparseable cells read as unrated.
fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Page count. Exports write both plain integers and float-formatted
/// integers ("320.0"), so both spellings are accepted.
fn parse_pages(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(pages) = raw.parse::<u32>() {
        return Some(pages);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .map(|p| p as u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
