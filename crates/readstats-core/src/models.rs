use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shelf status of a book in the source log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shelf {
    /// Finished books; the only shelf the analytics consider.
    Read,
    /// Books currently in progress.
    CurrentlyReading,
    /// Wishlist entries.
    ToRead,
    /// Any shelf value this engine does not recognize.
    Other,
}

impl Shelf {
    /// Parse a raw shelf cell. Unrecognized values map to `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "read" => Shelf::Read,
            "currently-reading" => Shelf::CurrentlyReading,
            "to-read" => Shelf::ToRead,
            _ => Shelf::Other,
        }
    }

    /// Whether this is the "read" shelf.
    pub fn is_read(self) -> bool {
        self == Shelf::Read
    }
}

/// In-memory tabular snapshot of one uploaded reading-log export.
///
/// Built once per analysis request from parsed file bytes and discarded
/// after the response is produced. None of the analytics components
/// mutate it or retain it across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordTable {
    /// Column names exactly as they appeared in the header row.
    pub headers: Vec<String>,
    /// Row-major cell values; every row has the same width as `headers`.
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Index of the column with the given header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column matching any of the given header names.
    ///
    /// Goodreads export revisions disagree on some column names (the page
    /// count in particular), so lookups may carry a list of aliases.
    pub fn column_index_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column_index(name))
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A "read"-shelf row after date resolution and period derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Book title as exported.
    pub title: String,
    /// Star rating 0–5 as exported; zero or `None` means unrated.
    pub rating: Option<f64>,
    /// Page count as exported; `None` when absent or unparseable.
    pub pages: Option<u32>,
    /// Finish date, after the date-added fallback.
    pub read_date: NaiveDate,
    /// Calendar year of `read_date`.
    pub year: i32,
    /// Calendar month of `read_date`, 1–12.
    pub month: u32,
    /// ISO weekday of `read_date`, Monday = 0 through Sunday = 6.
    pub weekday: u32,
    /// Full English weekday name, e.g. "Wednesday".
    pub weekday_name: String,
}

impl NormalizedRecord {
    /// Rating usable for averaging. Zero and absent both mean "unrated"
    /// in Goodreads exports and are excluded from every mean.
    pub fn usable_rating(&self) -> Option<f64> {
        self.rating.filter(|r| *r > 0.0)
    }

    /// Page count usable for statistics; zero pages means unknown.
    pub fn usable_pages(&self) -> Option<u32> {
        self.pages.filter(|p| *p > 0)
    }
}

/// How a series is drawn by the plotting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Vertical bars.
    Bar,
    /// A connected line.
    Line,
}

/// Which vertical axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesAxis {
    /// The default left-hand axis.
    #[serde(rename = "y")]
    Primary,
    /// The right-hand overlay axis of a dual-axis chart.
    #[serde(rename = "y2")]
    Secondary,
}

impl SeriesAxis {
    /// True for the default axis; the flag is omitted from serialized
    /// series unless it points at the secondary axis.
    pub fn is_primary(&self) -> bool {
        matches!(self, SeriesAxis::Primary)
    }
}

/// One plotted series: parallel label/value arrays plus draw metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Display name, present only on charts with more than one series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category labels, parallel to `y`.
    pub x: Vec<String>,
    /// Numeric values, parallel to `x`.
    pub y: Vec<f64>,
    /// Draw style.
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    /// Value labels rendered on the series, parallel to `y`.
    pub text: Vec<String>,
    /// Axis assignment, serialized as `"yaxis": "y2"` only when secondary.
    #[serde(rename = "yaxis", skip_serializing_if = "SeriesAxis::is_primary")]
    pub axis: SeriesAxis,
}

/// Category x-axis: a title plus the full ordered label set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAxis {
    pub title: String,
    /// One label per key of the underlying aggregation, in key order.
    pub labels: Vec<String>,
}

/// Value y-axis, carrying only a title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub title: String,
}

/// Chart-level presentation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Composed chart title, cutoff suffix included.
    pub title: String,
    #[serde(rename = "xaxis")]
    pub x_axis: CategoryAxis,
    #[serde(rename = "yaxis")]
    pub y_axis: ValueAxis,
    /// Secondary axis of dual-axis charts.
    #[serde(rename = "yaxis2", skip_serializing_if = "Option::is_none")]
    pub y_axis2: Option<ValueAxis>,
    /// Whether the plotting client should draw a legend.
    #[serde(rename = "showlegend")]
    pub show_legend: bool,
}

/// Declarative, renderer-agnostic chart: series data plus layout.
///
/// Serializes as `{"data": [...], "layout": {...}}`, the shape a generic
/// plotting client consumes directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "data")]
    pub series: Vec<Series>,
    pub layout: Layout,
}

impl ChartSpec {
    /// Composed chart title.
    pub fn title(&self) -> &str {
        &self.layout.title
    }

    /// Ordered x-axis labels, one per key of the underlying aggregation.
    pub fn x_axis_labels(&self) -> &[String] {
        &self.layout.x_axis.labels
    }
}
