//! Grouped statistics over normalized records.
//!
//! Second analytics stage: groups records by a period key (year, month, or
//! weekday) and computes per-group counts plus rating and page statistics.

use std::collections::BTreeMap;

use readstats_core::models::NormalizedRecord;
use readstats_core::options::ChartKind;

// ── PeriodSelector ────────────────────────────────────────────────────────────

/// Grouping dimension for one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    /// Calendar year.
    Year,
    /// Calendar month, 1 through 12.
    Month,
    /// ISO weekday, Monday = 0 through Sunday = 6.
    Weekday,
}

impl PeriodSelector {
    /// The derived field a record contributes under.
    pub fn key_of(self, record: &NormalizedRecord) -> i32 {
        match self {
            PeriodSelector::Year => record.year,
            PeriodSelector::Month => record.month as i32,
            PeriodSelector::Weekday => record.weekday as i32,
        }
    }

    /// The dimension a chart kind groups by.
    pub fn for_chart(kind: ChartKind) -> Self {
        match kind {
            ChartKind::CountsByYear
            | ChartKind::RatingsAndPagesByYear
            | ChartKind::MinMaxPagesByYear => PeriodSelector::Year,
            ChartKind::CountsByMonth => PeriodSelector::Month,
            ChartKind::CountsByWeekday => PeriodSelector::Weekday,
        }
    }
}

// ── GroupStats ────────────────────────────────────────────────────────────────

/// Statistics for all records sharing one period key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    /// Number of records in the group.
    pub count: u64,
    /// Mean star rating over rated records only; absent when none are rated.
    pub rating_mean: Option<f64>,
    /// Mean page count over records with a known positive page count.
    pub pages_mean: Option<f64>,
    /// Smallest known page count in the group.
    pub pages_min: Option<u32>,
    /// Largest known page count in the group.
    pub pages_max: Option<u32>,
}

impl GroupStats {
    /// True when at least one record in the group had a usable page count.
    pub fn has_pages(&self) -> bool {
        self.pages_mean.is_some()
    }
}

// ── AggregationResult ─────────────────────────────────────────────────────────

/// Per-key statistics produced by one aggregation pass, keyed ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    /// The dimension the records were grouped by.
    pub selector: PeriodSelector,
    /// Statistics per period key. Keys exist only for non-empty groups.
    pub groups: BTreeMap<i32, GroupStats>,
}

impl AggregationResult {
    /// Period keys in ascending order.
    pub fn keys(&self) -> Vec<i32> {
        self.groups.keys().copied().collect()
    }

    /// True when no record mapped to any group.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// True when at least one group carries page statistics.
    pub fn has_page_stats(&self) -> bool {
        self.groups.values().any(GroupStats::has_pages)
    }
}

// ── PeriodAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups normalized records by a period key.
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Group `records` by `selector` and compute per-group statistics.
    ///
    /// Never fails; empty input yields an empty result. Keys come out
    /// ascending, Monday first for weekdays.
    pub fn aggregate_by(
        records: &[NormalizedRecord],
        selector: PeriodSelector,
    ) -> AggregationResult {
        // BTreeMap keeps the period keys sorted without a second pass.
        let mut accumulators: BTreeMap<i32, GroupAccumulator> = BTreeMap::new();

        for record in records {
            accumulators
                .entry(selector.key_of(record))
                .or_default()
                .add(record);
        }

        AggregationResult {
            selector,
            groups: accumulators
                .into_iter()
                .map(|(key, acc)| (key, acc.finish()))
                .collect(),
        }
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Running totals for one group, folded into [`GroupStats`] at the end.
#[derive(Debug, Default)]
struct GroupAccumulator {
    count: u64,
    rating_sum: f64,
    rated: u64,
    pages_sum: u64,
    paged: u64,
    pages_min: Option<u32>,
    pages_max: Option<u32>,
}

impl GroupAccumulator {
    fn add(&mut self, record: &NormalizedRecord) {
        self.count += 1;

        if let Some(rating) = record.usable_rating() {
            self.rating_sum += rating;
            self.rated += 1;
        }

        if let Some(pages) = record.usable_pages() {
            self.pages_sum += u64::from(pages);
            self.paged += 1;
            self.pages_min = Some(self.pages_min.map_or(pages, |min| min.min(pages)));
            self.pages_max = Some(self.pages_max.map_or(pages, |max| max.max(pages)));
        }
    }

    fn finish(self) -> GroupStats {
        let rating_mean = if self.rated > 0 {
            Some(self.rating_sum / self.rated as f64)
        } else {
            None
        };
        let pages_mean = if self.paged > 0 {
            Some(self.pages_sum as f64 / self.paged as f64)
        } else {
            None
        };

        GroupStats {
            count: self.count,
            rating_mean,
            pages_mean,
            pages_min: self.pages_min,
            pages_max: self.pages_max,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
