use std::path::PathBuf;
use thiserror::Error;

use crate::options::ChartKind;

/// All errors produced by the readstats analytics engine.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A required input column is absent from the uploaded table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The uploaded bytes are not valid tabular data.
    #[error("Failed to parse input file: {0}")]
    Parse(String),

    /// A chart kind name is not one of the recognized kinds.
    #[error("Unsupported chart kind: {0}")]
    UnsupportedChartKind(String),

    /// A specific chart cannot be built from the available data.
    ///
    /// Partial-success signal: the façade omits the chart and carries on
    /// unless no requested chart could be built at all.
    #[error("No data available for chart {0}")]
    EmptyChart(ChartKind),

    /// The table contains no analyzable "read" records.
    #[error("No analyzable records in the input table")]
    NoData,

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the readstats crates.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Stable machine-readable tag, one per taxonomy entry.
    ///
    /// Transports key their status mapping off this tag instead of
    /// string-matching the display message.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsError::MissingColumn(_) => "schema",
            AnalyticsError::Parse(_) => "parse",
            AnalyticsError::UnsupportedChartKind(_) => "unsupported_chart_kind",
            AnalyticsError::EmptyChart(_) => "empty_data",
            AnalyticsError::NoData => "no_data",
            AnalyticsError::FileRead { .. } | AnalyticsError::Io(_) => "io",
            AnalyticsError::Other(_) => "internal",
        }
    }

    /// True when the failure was caused by the client's input rather than
    /// the engine or its host. Transports map client errors to 4xx status
    /// codes and everything else to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::MissingColumn(_)
                | AnalyticsError::Parse(_)
                | AnalyticsError::UnsupportedChartKind(_)
                | AnalyticsError::EmptyChart(_)
                | AnalyticsError::NoData
        )
    }
}
