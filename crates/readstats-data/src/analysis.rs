//! Main analysis pipeline for readstats.
//!
//! Orchestrates normalization, aggregation and chart building for each
//! requested chart kind, returning an [`AnalysisReport`] ready for
//! serialization. This is the sole entry point the transport layer calls.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Utc};
use readstats_core::error::{AnalyticsError, Result};
use readstats_core::models::{ChartSpec, NormalizedRecord, RecordTable};
use readstats_core::options::{AnalyzeOptions, ChartKind};
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregator::{PeriodAggregator, PeriodSelector};
use crate::charts::ChartBuilder;
use crate::normalizer::normalize;

// ── Public types ──────────────────────────────────────────────────────────────

/// One entry of the top-rated headline list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBook {
    /// Book title as exported.
    pub title: String,
    /// Star rating as exported; 0.0 for unrated books.
    pub rating: f64,
}

/// The complete output of [`analyze`], serialized as the response payload.
///
/// Headline metrics cover the full "read" set regardless of the cutoff;
/// only the per-period charts are scoped to it. The chart map is keyed by
/// chart kind and sorted, so repeated runs over the same table serialize
/// byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Number of rows in the uploaded table, every shelf included.
    pub total_books: usize,
    /// Mean rating over rated "read" records, rounded to 2 decimals;
    /// 0.0 when nothing is rated.
    pub average_rating: f64,
    /// Highest-rated "read" records, original table order kept on ties.
    pub top_books: Vec<TopBook>,
    /// One spec per successfully built chart kind.
    pub charts: BTreeMap<ChartKind, ChartSpec>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full analysis pipeline over one uploaded table.
///
/// Uses the current calendar year for title composition; see
/// [`analyze_at`] for the deterministic variant and the pipeline contract.
pub fn analyze(table: &RecordTable, options: &AnalyzeOptions) -> Result<AnalysisReport> {
    analyze_at(table, options, Utc::now().year())
}

/// [`analyze`] with an injected current year.
///
/// 1. Normalize the table without the cutoff.
/// 2. Compute headline metrics over that full "read" set.
/// 3. Apply the cutoff, then aggregate and build each requested chart.
/// 4. Treat a chart-level empty-data failure as partial success: the chart
///    is omitted unless no requested chart could be built at all.
///
/// Fails with a no-data error when the table has no parsable "read" rows
/// and at least one chart was requested. An entirely empty table with no
/// requested charts yields zero-valued headline metrics.
pub fn analyze_at(
    table: &RecordTable,
    options: &AnalyzeOptions,
    current_year: i32,
) -> Result<AnalysisReport> {
    // ── Step 1: Normalize without the cutoff ──────────────────────────────────
    let full = normalize(table, None)?;

    // ── Step 2: Headline metrics ──────────────────────────────────────────────
    let average_rating = average_rating(&full);
    let top_books = top_books(&full, options.top_n);

    // Duplicates collapse here; the report map is keyed by kind anyway.
    let requested: BTreeSet<ChartKind> = options.charts.iter().copied().collect();

    if full.is_empty() && !requested.is_empty() {
        return Err(AnalyticsError::NoData);
    }

    // ── Step 3: Build the requested charts ────────────────────────────────────
    let scoped = apply_cutoff(&full, options.cutoff_year);
    debug!(
        "Building {} charts over {} of {} read records",
        requested.len(),
        scoped.len(),
        full.len()
    );

    let mut charts: BTreeMap<ChartKind, ChartSpec> = BTreeMap::new();
    let mut first_empty: Option<AnalyticsError> = None;

    for &kind in &requested {
        let result = PeriodAggregator::aggregate_by(&scoped, PeriodSelector::for_chart(kind));
        match ChartBuilder::build_chart(
            &result,
            kind,
            options.cutoff_year,
            current_year,
            options.locale,
        ) {
            Ok(spec) => {
                charts.insert(kind, spec);
            }
            Err(err @ AnalyticsError::EmptyChart(_)) => {
                warn!("Omitting chart {}: {}", kind, err);
                if first_empty.is_none() {
                    first_empty = Some(err);
                }
            }
            Err(err) => return Err(err),
        }
    }

    // ── Step 4: Partial success ───────────────────────────────────────────────
    if charts.is_empty() {
        if let Some(err) = first_empty {
            return Err(err);
        }
    }

    Ok(AnalysisReport {
        total_books: table.len(),
        average_rating,
        top_books,
        charts,
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Mean rating over rated records, 2 decimals; 0.0 when none are rated.
fn average_rating(records: &[NormalizedRecord]) -> f64 {
    let ratings: Vec<f64> = records
        .iter()
        .filter_map(NormalizedRecord::usable_rating)
        .collect();
    if ratings.is_empty() {
        return 0.0;
    }
    round2(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// The `top_n` highest-rated records. The sort is stable and descending,
/// unrated records ranking as 0, so ties keep the original table order.
fn top_books(records: &[NormalizedRecord], top_n: usize) -> Vec<TopBook> {
    let rating_of = |record: &NormalizedRecord| record.rating.unwrap_or(0.0);

    let mut ranked: Vec<&NormalizedRecord> = records.iter().collect();
    ranked.sort_by(|a, b| rating_of(b).total_cmp(&rating_of(a)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|record| TopBook {
            title: record.title.clone(),
            rating: rating_of(record),
        })
        .collect()
}

fn apply_cutoff(records: &[NormalizedRecord], cutoff_year: Option<i32>) -> Vec<NormalizedRecord> {
    match cutoff_year {
        Some(cutoff) => records
            .iter()
            .filter(|record| record.year >= cutoff)
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use readstats_core::locale::Locale;
    use readstats_core::models::SeriesKind;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn sample_headers() -> Vec<String> {
        [
            "Title",
            "My Rating",
            "Number of Pages",
            "Exclusive Shelf",
            "Date Added",
            "Date Read",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect()
    }

    fn sample_row(
        title: &str,
        rating: &str,
        pages: &str,
        shelf: &str,
        date_added: &str,
        date_read: &str,
    ) -> Vec<String> {
        [title, rating, pages, shelf, date_added, date_read]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn read_row(title: &str, rating: &str, pages: &str, date_read: &str) -> Vec<String> {
        sample_row(title, rating, pages, "read", "", date_read)
    }

    fn make_table(rows: Vec<Vec<String>>) -> RecordTable {
        RecordTable {
            headers: sample_headers(),
            rows,
        }
    }

    fn options_with(charts: Vec<ChartKind>, cutoff_year: Option<i32>) -> AnalyzeOptions {
        AnalyzeOptions {
            cutoff_year,
            charts,
            ..AnalyzeOptions::default()
        }
    }

    // ── Headline metrics and counts ───────────────────────────────────────────

    #[test]
    fn test_analyze_counts_and_headline_metrics() {
        let table = make_table(vec![
            read_row("First", "4", "300", "2019/03/01"),
            read_row("Second", "5", "200", "2019/11/20"),
            read_row("Third", "3", "250", "2020/01/05"),
        ]);
        let options = options_with(vec![ChartKind::CountsByYear], Some(2018));
        let report = analyze_at(&table, &options, 2026).unwrap();

        assert_eq!(report.total_books, 3);
        assert!((report.average_rating - 4.0).abs() < f64::EPSILON);

        let titles: Vec<&str> = report.top_books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First", "Third"]);
        assert_eq!(report.top_books[0].rating, 5.0);

        let chart = &report.charts[&ChartKind::CountsByYear];
        assert_eq!(chart.series[0].x, vec!["2019", "2020"]);
        assert_eq!(chart.series[0].y, vec![2.0, 1.0]);
        assert_eq!(chart.title(), "Books read per year from 2018 onward");
    }

    #[test]
    fn test_analyze_total_books_counts_every_shelf() {
        let table = make_table(vec![
            read_row("Read", "4", "", "2020/01/05"),
            sample_row("Wishlist", "0", "", "to-read", "2020/01/01", ""),
            sample_row("Current", "0", "", "currently-reading", "2020/01/01", ""),
        ]);
        let report = analyze_at(&table, &AnalyzeOptions::headline_only(), 2026).unwrap();

        assert_eq!(report.total_books, 3);
        assert_eq!(report.top_books.len(), 1);
    }

    #[test]
    fn test_analyze_average_excludes_unrated() {
        let table = make_table(vec![
            read_row("Rated", "4", "", "2020/01/05"),
            read_row("Unrated", "0", "", "2020/02/05"),
        ]);
        let report = analyze_at(&table, &AnalyzeOptions::headline_only(), 2026).unwrap();
        assert!((report.average_rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_analyze_average_rounds_to_two_decimals() {
        let table = make_table(vec![
            read_row("A", "5", "", "2020/01/05"),
            read_row("B", "4", "", "2020/02/05"),
            read_row("C", "4", "", "2020/03/05"),
        ]);
        let report = analyze_at(&table, &AnalyzeOptions::headline_only(), 2026).unwrap();
        // mean(5, 4, 4) = 4.333... → 4.33
        assert_eq!(report.average_rating, 4.33);
    }

    #[test]
    fn test_analyze_date_added_fallback_feeds_charts() {
        let table = make_table(vec![sample_row(
            "No finish date",
            "4",
            "",
            "read",
            "2020/05/01",
            "",
        )]);
        let options = options_with(vec![ChartKind::CountsByYear], None);
        let report = analyze_at(&table, &options, 2026).unwrap();

        let chart = &report.charts[&ChartKind::CountsByYear];
        assert_eq!(chart.series[0].x, vec!["2020"]);
    }

    // ── Top books ─────────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_top_books_tie_keeps_table_order() {
        let table = make_table(vec![
            read_row("Earlier", "4", "", "2020/01/05"),
            read_row("Later", "4", "", "2019/01/05"),
        ]);
        let options = AnalyzeOptions {
            top_n: 1,
            charts: Vec::new(),
            ..AnalyzeOptions::default()
        };
        let report = analyze_at(&table, &options, 2026).unwrap();

        assert_eq!(report.top_books.len(), 1);
        assert_eq!(report.top_books[0].title, "Earlier");
    }

    #[test]
    fn test_analyze_top_books_ranks_unrated_last() {
        let table = make_table(vec![
            read_row("Unrated", "0", "", "2020/01/05"),
            read_row("Rated", "2", "", "2020/02/05"),
        ]);
        let report = analyze_at(&table, &AnalyzeOptions::headline_only(), 2026).unwrap();

        assert_eq!(report.top_books[0].title, "Rated");
        assert_eq!(report.top_books[1].title, "Unrated");
        assert_eq!(report.top_books[1].rating, 0.0);
    }

    // ── Cutoff behavior ───────────────────────────────────────────────────────

    #[test]
    fn test_analyze_headline_ignores_cutoff_charts_respect_it() {
        let table = make_table(vec![
            read_row("Old", "2", "", "2015/06/01"),
            read_row("New", "4", "", "2020/06/01"),
        ]);

        let scoped = analyze_at(
            &table,
            &options_with(vec![ChartKind::CountsByYear], Some(2018)),
            2026,
        )
        .unwrap();
        let unbounded = analyze_at(
            &table,
            &options_with(vec![ChartKind::CountsByYear], None),
            2026,
        )
        .unwrap();

        // Same headline average either way: mean(2, 4).
        assert_eq!(scoped.average_rating, 3.0);
        assert_eq!(unbounded.average_rating, 3.0);
        assert_eq!(scoped.top_books, unbounded.top_books);

        // The chart only sees the cutoff-scoped years.
        let scoped_chart = &scoped.charts[&ChartKind::CountsByYear];
        assert_eq!(scoped_chart.series[0].x, vec!["2020"]);
        let unbounded_chart = &unbounded.charts[&ChartKind::CountsByYear];
        assert_eq!(unbounded_chart.series[0].x, vec!["2015", "2020"]);
    }

    #[test]
    fn test_analyze_cutoff_scoped_out_records_degrade_to_empty_series() {
        let table = make_table(vec![read_row("Old", "4", "", "2019/06/01")]);
        let options = options_with(vec![ChartKind::CountsByWeekday], Some(2025));
        let report = analyze_at(&table, &options, 2026).unwrap();

        let chart = &report.charts[&ChartKind::CountsByWeekday];
        assert!(chart.series[0].x.is_empty());
        assert!(chart.x_axis_labels().is_empty());
    }

    // ── Failure modes ─────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_no_parsable_read_rows_with_charts_is_no_data() {
        let table = make_table(vec![
            sample_row("Wishlist", "0", "", "to-read", "2020/01/01", ""),
            read_row("Bad dates", "4", "", "not a date"),
        ]);
        let options = options_with(vec![ChartKind::CountsByYear], Some(2018));
        let err = analyze_at(&table, &options, 2026).unwrap_err();

        assert_eq!(err.kind(), "no_data");
    }

    #[test]
    fn test_analyze_empty_table_without_charts_succeeds() {
        let table = make_table(vec![]);
        let report = analyze_at(&table, &AnalyzeOptions::headline_only(), 2026).unwrap();

        assert_eq!(report.total_books, 0);
        assert_eq!(report.average_rating, 0.0);
        assert!(report.top_books.is_empty());
        assert!(report.charts.is_empty());
    }

    #[test]
    fn test_analyze_min_max_sole_chart_surfaces_empty_data() {
        let table = make_table(vec![read_row("No pages", "4", "", "2020/01/05")]);
        let options = options_with(vec![ChartKind::MinMaxPagesByYear], Some(2018));
        let err = analyze_at(&table, &options, 2026).unwrap_err();

        assert_eq!(err.kind(), "empty_data");
    }

    #[test]
    fn test_analyze_partial_success_omits_only_the_empty_chart() {
        let table = make_table(vec![read_row("No pages", "4", "", "2020/01/05")]);
        let options = options_with(
            vec![ChartKind::CountsByYear, ChartKind::MinMaxPagesByYear],
            Some(2018),
        );
        let report = analyze_at(&table, &options, 2026).unwrap();

        assert!(report.charts.contains_key(&ChartKind::CountsByYear));
        assert!(!report.charts.contains_key(&ChartKind::MinMaxPagesByYear));
    }

    // ── Options handling ──────────────────────────────────────────────────────

    #[test]
    fn test_analyze_duplicate_chart_kinds_collapse() {
        let table = make_table(vec![read_row("Book", "4", "", "2020/01/05")]);
        let options = options_with(
            vec![ChartKind::CountsByYear, ChartKind::CountsByYear],
            Some(2018),
        );
        let report = analyze_at(&table, &options, 2026).unwrap();

        assert_eq!(report.charts.len(), 1);
    }

    #[test]
    fn test_analyze_default_options_build_all_five_charts() {
        let table = make_table(vec![
            read_row("A", "4", "320", "2020/01/05"),
            read_row("B", "5", "150", "2021/07/15"),
        ]);
        let report = analyze_at(&table, &AnalyzeOptions::default(), 2026).unwrap();

        assert_eq!(report.charts.len(), 5);
        for kind in ChartKind::ALL {
            assert!(report.charts.contains_key(&kind), "missing {kind}");
        }
    }

    #[test]
    fn test_analyze_locale_reaches_chart_labels() {
        let table = make_table(vec![read_row("Book", "4", "", "2020/01/05")]);
        let options = AnalyzeOptions {
            charts: vec![ChartKind::CountsByYear],
            locale: Locale::Ukrainian,
            cutoff_year: None,
            ..AnalyzeOptions::default()
        };
        let report = analyze_at(&table, &options, 2026).unwrap();

        let chart = &report.charts[&ChartKind::CountsByYear];
        assert_eq!(chart.title(), "Кількість прочитаних книг за роками");
    }

    #[test]
    fn test_analyze_title_uses_injected_current_year() {
        let table = make_table(vec![read_row("Book", "4", "", "2026/01/05")]);
        let options = options_with(vec![ChartKind::CountsByMonth], Some(2026));

        let now = analyze_at(&table, &options, 2026).unwrap();
        assert_eq!(
            now.charts[&ChartKind::CountsByMonth].title(),
            "Books read per month in 2026"
        );

        let later = analyze_at(&table, &options, 2030).unwrap();
        assert_eq!(
            later.charts[&ChartKind::CountsByMonth].title(),
            "Books read per month from 2026 onward"
        );
    }

    // ── Output shape and determinism ──────────────────────────────────────────

    #[test]
    fn test_analyze_report_serialization_shape() {
        let table = make_table(vec![read_row("Dune", "5", "412", "2020/01/05")]);
        let options = options_with(
            vec![ChartKind::CountsByYear, ChartKind::RatingsAndPagesByYear],
            Some(2018),
        );
        let report = analyze_at(&table, &options, 2026).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totalBooks"], 1);
        assert_eq!(json["averageRating"], 5.0);
        assert_eq!(json["topBooks"][0]["title"], "Dune");
        assert_eq!(json["topBooks"][0]["rating"], 5.0);

        let chart = &json["charts"]["counts_by_year"];
        assert_eq!(chart["data"][0]["type"], "bar");
        assert_eq!(chart["layout"]["xaxis"]["labels"][0], "2020");

        let dual = &json["charts"]["ratings_and_pages_by_year"];
        assert_eq!(dual["data"][0]["type"], "line");
        assert_eq!(dual["data"][1]["yaxis"], "y2");
    }

    #[test]
    fn test_analyze_twice_is_byte_identical() {
        let table = make_table(vec![
            read_row("A", "4", "320", "2020/01/05"),
            read_row("B", "0", "", "2021/07/15"),
            sample_row("C", "3", "200", "to-read", "2021/01/01", ""),
        ]);
        let options = AnalyzeOptions::default();

        let first = serde_json::to_string(&analyze_at(&table, &options, 2026).unwrap()).unwrap();
        let second = serde_json::to_string(&analyze_at(&table, &options, 2026).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_chart_map_is_sorted_by_kind() {
        let table = make_table(vec![read_row("Book", "4", "320", "2020/01/05")]);
        // Request out of report order; the map still serializes in order.
        let options = options_with(
            vec![ChartKind::CountsByWeekday, ChartKind::CountsByYear],
            None,
        );
        let report = analyze_at(&table, &options, 2026).unwrap();

        let kinds: Vec<ChartKind> = report.charts.keys().copied().collect();
        assert_eq!(
            kinds,
            vec![ChartKind::CountsByYear, ChartKind::CountsByWeekday]
        );
    }

    #[test]
    fn test_analyze_line_series_present_for_ratings_chart() {
        let table = make_table(vec![
            read_row("A", "4", "100", "2020/01/05"),
            read_row("B", "2", "300", "2020/06/05"),
        ]);
        let options = options_with(vec![ChartKind::RatingsAndPagesByYear], None);
        let report = analyze_at(&table, &options, 2026).unwrap();

        let chart = &report.charts[&ChartKind::RatingsAndPagesByYear];
        assert_eq!(chart.series[0].kind, SeriesKind::Line);
        assert_eq!(chart.series[0].y, vec![3.0]);
        assert_eq!(chart.series[1].y, vec![200.0]);
    }
}
