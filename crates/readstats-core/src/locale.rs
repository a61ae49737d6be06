//! Display-language tables for chart labels.
//!
//! The engine derives period keys numerically; only at the chart boundary
//! do month and weekday numbers become words, and only here do titles get
//! composed. English is the default; Ukrainian matches the labels of the
//! original web UI this engine replaced.

use serde::{Deserialize, Serialize};

use crate::options::ChartKind;

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const UK_MONTHS: [&str; 12] = [
    "Січень",
    "Лютий",
    "Березень",
    "Квітень",
    "Травень",
    "Червень",
    "Липень",
    "Серпень",
    "Вересень",
    "Жовтень",
    "Листопад",
    "Грудень",
];

// Monday first, matching the weekday key convention (Monday = 0).
const EN_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const UK_WEEKDAYS: [&str; 7] = [
    "Понеділок",
    "Вівторок",
    "Середа",
    "Четвер",
    "П'ятниця",
    "Субота",
    "Неділя",
];

/// Display language for chart labels and titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "uk")]
    Ukrainian,
}

/// Static label set for one chart kind in one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLabels {
    /// Base title, before any cutoff suffix.
    pub title: &'static str,
    /// Category (x) axis title.
    pub x_axis: &'static str,
    /// Primary value (y) axis title.
    pub y_axis: &'static str,
    /// Secondary value axis title, set only for dual-axis kinds.
    pub y_axis2: Option<&'static str>,
    /// Per-series display names, in series order; empty when the chart
    /// has a single anonymous series.
    pub series: &'static [&'static str],
}

impl Locale {
    /// Locale from a short language tag, as passed on the command line.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        match tag {
            "en" => Some(Locale::English),
            "uk" => Some(Locale::Ukrainian),
            _ => None,
        }
    }

    /// Full month name for a 1-based month number; empty for bad input.
    pub fn month_name(self, month: u32) -> &'static str {
        let table = match self {
            Locale::English => &EN_MONTHS,
            Locale::Ukrainian => &UK_MONTHS,
        };
        month
            .checked_sub(1)
            .and_then(|i| table.get(i as usize))
            .copied()
            .unwrap_or("")
    }

    /// Full weekday name for a Monday-first index 0–6; empty for bad input.
    pub fn weekday_name(self, weekday: u32) -> &'static str {
        let table = match self {
            Locale::English => &EN_WEEKDAYS,
            Locale::Ukrainian => &UK_WEEKDAYS,
        };
        table.get(weekday as usize).copied().unwrap_or("")
    }

    /// Title suffix variant used when the cutoff is the current year,
    /// e.g. "Books read per month in 2026".
    pub fn title_with_current_year(self, base: &str, year: i32) -> String {
        match self {
            Locale::English => format!("{base} in {year}"),
            Locale::Ukrainian => format!("{base} у {year} році"),
        }
    }

    /// Title suffix variant used for a past cutoff year,
    /// e.g. "Books read per month from 2018 onward".
    pub fn title_from_year(self, base: &str, year: i32) -> String {
        match self {
            Locale::English => format!("{base} from {year} onward"),
            Locale::Ukrainian => format!("{base} з {year} року"),
        }
    }

    /// The full label set for one chart kind.
    pub fn chart_labels(self, kind: ChartKind) -> ChartLabels {
        match self {
            Locale::English => english_labels(kind),
            Locale::Ukrainian => ukrainian_labels(kind),
        }
    }
}

fn english_labels(kind: ChartKind) -> ChartLabels {
    match kind {
        ChartKind::CountsByYear => ChartLabels {
            title: "Books read per year",
            x_axis: "Year",
            y_axis: "Books",
            y_axis2: None,
            series: &[],
        },
        ChartKind::CountsByMonth => ChartLabels {
            title: "Books read per month",
            x_axis: "Month",
            y_axis: "Books",
            y_axis2: None,
            series: &[],
        },
        ChartKind::CountsByWeekday => ChartLabels {
            title: "Books read per weekday",
            x_axis: "Weekday",
            y_axis: "Books",
            y_axis2: None,
            series: &[],
        },
        ChartKind::RatingsAndPagesByYear => ChartLabels {
            title: "Average rating and page count per year",
            x_axis: "Year",
            y_axis: "Average rating",
            y_axis2: Some("Average pages"),
            series: &["Average rating", "Average pages"],
        },
        ChartKind::MinMaxPagesByYear => ChartLabels {
            title: "Min and max page count per year",
            x_axis: "Year",
            y_axis: "Pages",
            y_axis2: None,
            series: &["Min pages", "Max pages"],
        },
    }
}

fn ukrainian_labels(kind: ChartKind) -> ChartLabels {
    match kind {
        ChartKind::CountsByYear => ChartLabels {
            title: "Кількість прочитаних книг за роками",
            x_axis: "Рік",
            y_axis: "Кількість книг",
            y_axis2: None,
            series: &[],
        },
        ChartKind::CountsByMonth => ChartLabels {
            title: "Кількість прочитаних книг за місяцями",
            x_axis: "Місяць",
            y_axis: "Кількість книг",
            y_axis2: None,
            series: &[],
        },
        ChartKind::CountsByWeekday => ChartLabels {
            title: "Кількість прочитаних книг за днями тижня",
            x_axis: "День тижня",
            y_axis: "Кількість книг",
            y_axis2: None,
            series: &[],
        },
        ChartKind::RatingsAndPagesByYear => ChartLabels {
            title: "Середні оцінки та кількість сторінок за роками",
            x_axis: "Рік",
            y_axis: "Середня оцінка",
            y_axis2: Some("Середня кількість сторінок"),
            series: &["Середня оцінка", "Середня к-сть сторінок"],
        },
        ChartKind::MinMaxPagesByYear => ChartLabels {
            title: "Мін. та макс. кількість сторінок за роками",
            x_axis: "Рік",
            y_axis: "Кількість сторінок",
            y_axis2: None,
            series: &["Мін. к-сть сторінок", "Макс. к-сть сторінок"],
        },
    }
}
