use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::locale::Locale;
use crate::options::{AnalyzeOptions, ChartKind, DEFAULT_CUTOFF_YEAR, DEFAULT_TOP_N};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Reading-log analytics from Goodreads-style CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "readstats",
    about = "Reading-log analytics from Goodreads-style CSV exports",
    version
)]
pub struct Settings {
    /// CSV export to analyze, or a directory holding exports (the newest
    /// .csv file inside is picked)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Inclusive lower bound on read-year for the period charts
    #[arg(long, default_value_t = DEFAULT_CUTOFF_YEAR)]
    pub cutoff_year: i32,

    /// Disable the read-year lower bound entirely
    #[arg(long, conflicts_with = "cutoff_year")]
    pub all_years: bool,

    /// Comma-separated chart kinds to build (default: all)
    #[arg(long, value_delimiter = ',')]
    pub charts: Option<Vec<String>>,

    /// Number of entries in the top-rated list
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Label language for chart titles, months and weekdays
    #[arg(long, default_value = "en", value_parser = ["en", "uk"])]
    pub locale: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Log file path (stderr when absent)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Convert CLI flags into the engine's options structure.
    ///
    /// Chart kind names are validated here rather than by clap so a typo
    /// surfaces with the engine's own unsupported-kind message.
    pub fn analyze_options(&self) -> Result<AnalyzeOptions> {
        let charts = match &self.charts {
            Some(names) => names
                .iter()
                .map(|name| name.trim().parse::<ChartKind>())
                .collect::<Result<Vec<_>>>()?,
            None => ChartKind::ALL.to_vec(),
        };

        let cutoff_year = if self.all_years {
            None
        } else {
            Some(self.cutoff_year)
        };

        // --locale is gated to the known tags by its value parser.
        let locale = Locale::from_tag(&self.locale).unwrap_or_default();

        Ok(AnalyzeOptions {
            cutoff_year,
            charts,
            top_n: self.top_n,
            locale,
        })
    }

    /// Logging level after the `--debug` override.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
