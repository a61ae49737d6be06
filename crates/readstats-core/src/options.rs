//! Analysis configuration: the closed set of chart kinds plus the
//! options structure accepted by the analytics façade.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::locale::Locale;

/// Inclusive lower bound on read-year applied to period charts when the
/// caller does not say otherwise.
pub const DEFAULT_CUTOFF_YEAR: i32 = 2018;

/// Number of entries in the top-rated headline list by default.
pub const DEFAULT_TOP_N: usize = 5;

/// The closed set of charts the engine can build.
///
/// Ordered as the charts appear in the report; the ordering also keys the
/// serialized chart map so repeated runs emit byte-identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Finished books per calendar year.
    CountsByYear,
    /// Finished books per calendar month, across all years.
    CountsByMonth,
    /// Finished books per ISO weekday, Monday first.
    CountsByWeekday,
    /// Average rating (line, primary axis) and average page count
    /// (bars, secondary axis) per year.
    RatingsAndPagesByYear,
    /// Shortest and longest book per year as grouped bars.
    MinMaxPagesByYear,
}

impl ChartKind {
    /// Every supported kind, in report order.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::CountsByYear,
        ChartKind::CountsByMonth,
        ChartKind::CountsByWeekday,
        ChartKind::RatingsAndPagesByYear,
        ChartKind::MinMaxPagesByYear,
    ];

    /// The wire name of this kind, as used in options and report keys.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::CountsByYear => "counts_by_year",
            ChartKind::CountsByMonth => "counts_by_month",
            ChartKind::CountsByWeekday => "counts_by_weekday",
            ChartKind::RatingsAndPagesByYear => "ratings_and_pages_by_year",
            ChartKind::MinMaxPagesByYear => "min_max_pages_by_year",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AnalyticsError::UnsupportedChartKind(s.to_string()))
    }
}

/// Options accepted by the analytics façade.
///
/// Every recognized option is an explicit field with a default; unknown
/// keys are rejected at the deserialization boundary rather than ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzeOptions {
    /// Inclusive lower bound on read-year for the period charts.
    /// `None` means no lower bound. Headline metrics ignore this value.
    pub cutoff_year: Option<i32>,
    /// Chart kinds to build; duplicates are ignored.
    pub charts: Vec<ChartKind>,
    /// Number of entries in the top-rated headline list.
    pub top_n: usize,
    /// Locale for month/weekday labels and chart titles.
    pub locale: Locale,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            cutoff_year: Some(DEFAULT_CUTOFF_YEAR),
            charts: ChartKind::ALL.to_vec(),
            top_n: DEFAULT_TOP_N,
            locale: Locale::default(),
        }
    }
}

impl AnalyzeOptions {
    /// Options that request no charts at all (headline metrics only).
    pub fn headline_only() -> Self {
        AnalyzeOptions {
            charts: Vec::new(),
            ..AnalyzeOptions::default()
        }
    }
}
