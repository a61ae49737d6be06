//! Chart construction from aggregation results.
//!
//! Final analytics stage: turns an [`AggregationResult`] into a declarative,
//! renderer-agnostic [`ChartSpec`]. Period keys become words (or year
//! strings) only here, titles pick up their cutoff suffix here, and all
//! label text comes from the locale tables.

use readstats_core::error::{AnalyticsError, Result};
use readstats_core::locale::Locale;
use readstats_core::models::{
    CategoryAxis, ChartSpec, Layout, Series, SeriesAxis, SeriesKind, ValueAxis,
};
use readstats_core::options::ChartKind;

use crate::aggregator::{AggregationResult, GroupStats, PeriodSelector};

// ── ChartBuilder ──────────────────────────────────────────────────────────────

/// Stateless builder turning aggregation results into chart specs.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Build the chart of `kind` from `result`.
    ///
    /// `cutoff_year` and `current_year` only shape the title: a cutoff equal
    /// to the current calendar year reads "in <year>", any other cutoff reads
    /// "from <year> onward", and no cutoff leaves the base title alone. The
    /// current year is a parameter so title composition stays deterministic
    /// under test.
    ///
    /// Fails with an empty-data error only for
    /// [`ChartKind::MinMaxPagesByYear`] when no group carries page
    /// statistics; every other kind degrades to empty series.
    pub fn build_chart(
        result: &AggregationResult,
        kind: ChartKind,
        cutoff_year: Option<i32>,
        current_year: i32,
        locale: Locale,
    ) -> Result<ChartSpec> {
        let labels = locale.chart_labels(kind);

        let series = match kind {
            ChartKind::CountsByYear | ChartKind::CountsByMonth | ChartKind::CountsByWeekday => {
                vec![count_series(result, locale)]
            }
            ChartKind::RatingsAndPagesByYear => {
                ratings_and_pages_series(result, locale, labels.series)
            }
            ChartKind::MinMaxPagesByYear => min_max_series(result, kind, locale, labels.series)?,
        };

        // The axis label set always covers every key, even when a statistic
        // series had to drop some of them.
        let x_labels: Vec<String> = result
            .keys()
            .into_iter()
            .map(|key| key_label(result.selector, key, locale))
            .collect();

        Ok(ChartSpec {
            layout: Layout {
                title: compose_title(labels.title, cutoff_year, current_year, locale),
                x_axis: CategoryAxis {
                    title: labels.x_axis.to_string(),
                    labels: x_labels,
                },
                y_axis: ValueAxis {
                    title: labels.y_axis.to_string(),
                },
                y_axis2: labels.y_axis2.map(|title| ValueAxis {
                    title: title.to_string(),
                }),
                show_legend: series.len() > 1,
            },
            series,
        })
    }
}

// ── Series builders ───────────────────────────────────────────────────────────

/// One bar per period key, the group count as both value and bar label.
fn count_series(result: &AggregationResult, locale: Locale) -> Series {
    let mut x = Vec::with_capacity(result.groups.len());
    let mut y = Vec::with_capacity(result.groups.len());
    let mut text = Vec::with_capacity(result.groups.len());

    for (&key, stats) in &result.groups {
        x.push(key_label(result.selector, key, locale));
        y.push(stats.count as f64);
        text.push(stats.count.to_string());
    }

    Series {
        name: None,
        x,
        y,
        kind: SeriesKind::Bar,
        text,
        axis: SeriesAxis::Primary,
    }
}

/// Rating means as the line on the primary axis, page means as bars on the
/// secondary axis. A group lacking one statistic drops out of that series
/// only; the other series and the axis label set keep it.
fn ratings_and_pages_series(
    result: &AggregationResult,
    locale: Locale,
    names: &[&str],
) -> Vec<Series> {
    let ratings = statistic_series(
        result,
        locale,
        series_name(names, 0),
        SeriesKind::Line,
        SeriesAxis::Primary,
        |stats| stats.rating_mean,
        |mean| format!("{mean:.2}"),
    );
    let pages = statistic_series(
        result,
        locale,
        series_name(names, 1),
        SeriesKind::Bar,
        SeriesAxis::Secondary,
        |stats| stats.pages_mean,
        |mean| format!("{}", mean.round() as u64),
    );
    vec![ratings, pages]
}

/// Shortest and longest page count per period as two grouped bar series.
fn min_max_series(
    result: &AggregationResult,
    kind: ChartKind,
    locale: Locale,
    names: &[&str],
) -> Result<Vec<Series>> {
    if !result.has_page_stats() {
        return Err(AnalyticsError::EmptyChart(kind));
    }

    let min = statistic_series(
        result,
        locale,
        series_name(names, 0),
        SeriesKind::Bar,
        SeriesAxis::Primary,
        |stats| stats.pages_min.map(f64::from),
        |pages| format!("{pages:.0}"),
    );
    let max = statistic_series(
        result,
        locale,
        series_name(names, 1),
        SeriesKind::Bar,
        SeriesAxis::Primary,
        |stats| stats.pages_max.map(f64::from),
        |pages| format!("{pages:.0}"),
    );
    Ok(vec![min, max])
}

/// One series over the groups where `value` yields a statistic. Series
/// values stay exact; rounding is confined to the `text` labels.
fn statistic_series(
    result: &AggregationResult,
    locale: Locale,
    name: Option<String>,
    kind: SeriesKind,
    axis: SeriesAxis,
    value: impl Fn(&GroupStats) -> Option<f64>,
    label: impl Fn(f64) -> String,
) -> Series {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut text = Vec::new();

    for (&key, stats) in &result.groups {
        let Some(v) = value(stats) else { continue };
        x.push(key_label(result.selector, key, locale));
        y.push(v);
        text.push(label(v));
    }

    Series {
        name,
        x,
        y,
        kind,
        text,
        axis,
    }
}

// ── Label helpers ─────────────────────────────────────────────────────────────

fn series_name(names: &[&str], index: usize) -> Option<String> {
    names.get(index).map(|name| name.to_string())
}

/// Display label for one period key: the year digits, or the localized
/// month/weekday name.
fn key_label(selector: PeriodSelector, key: i32, locale: Locale) -> String {
    match selector {
        PeriodSelector::Year => key.to_string(),
        PeriodSelector::Month => locale.month_name(key as u32).to_string(),
        PeriodSelector::Weekday => locale.weekday_name(key as u32).to_string(),
    }
}

fn compose_title(base: &str, cutoff_year: Option<i32>, current_year: i32, locale: Locale) -> String {
    match cutoff_year {
        Some(year) if year == current_year => locale.title_with_current_year(base, year),
        Some(year) => locale.title_from_year(base, year),
        None => base.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
