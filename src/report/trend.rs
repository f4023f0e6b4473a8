//! Period-over-period comparisons.
//!
//! A trend compares a metric over the period ending now against the same
//! metric over the period before it, e.g. this month vs. last month.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::{payment::PaymentRecord, report::aggregation::CompensatedSum};

/// The length of the windows that a trend compares.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Seven days.
    Weekly,
    /// One calendar month.
    #[default]
    Monthly,
    /// One calendar year.
    Yearly,
}

impl Period {
    /// Every period, in the order offered to users.
    pub const ALL: [Period; 3] = [Period::Weekly, Period::Monthly, Period::Yearly];

    /// The value used for this period in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// Text describing the current window, e.g. "This month".
    pub fn label(self) -> &'static str {
        match self {
            Period::Weekly => "This week",
            Period::Monthly => "This month",
            Period::Yearly => "This year",
        }
    }

    /// The instant `count` periods before `now`.
    ///
    /// Calendar periods keep the time of day and clamp the day of month to the
    /// length of the target month, e.g. one month before March 31st 2024 is
    /// February 29th 2024.
    fn before(self, now: OffsetDateTime, count: i32) -> OffsetDateTime {
        match self {
            Period::Weekly => now - Duration::weeks(i64::from(count)),
            Period::Monthly => months_before(now, count),
            Period::Yearly => months_before(now, count * 12),
        }
    }

    /// The current and previous windows ending at `now`.
    pub fn windows(self, now: OffsetDateTime) -> TrendWindows {
        let one_period_ago = self.before(now, 1);
        let two_periods_ago = self.before(now, 2);

        TrendWindows {
            current: TimeWindow {
                start: one_period_ago,
                end: now,
            },
            previous: TimeWindow {
                start: two_periods_ago,
                end: one_period_ago,
            },
        }
    }
}

fn months_before(now: OffsetDateTime, months: i32) -> OffsetDateTime {
    let date = now.date();
    let month_index = date.year() * 12 + i32::from(date.month() as u8 - 1) - months;
    let year = month_index.div_euclid(12);
    let month = Month::January.nth_next(month_index.rem_euclid(12) as u8);
    let day = date.day().min(days_in_month(year, month));

    match Date::from_calendar_date(year, month, day) {
        Ok(date) => now.replace_date(date),
        Err(error) => {
            tracing::error!("could not go back {months} months from {now}: {error}");
            now
        }
    }
}

fn days_in_month(year: i32, month: Month) -> u8 {
    (28..=31)
        .rev()
        .find(|&day| Date::from_calendar_date(year, month, day).is_ok())
        .unwrap_or(28)
}

/// A half-open range of instants, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// The first instant in the window.
    pub start: OffsetDateTime,
    /// The first instant after the window.
    pub end: OffsetDateTime,
}

impl TimeWindow {
    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The two adjacent windows a trend compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindows {
    /// The window ending now.
    pub current: TimeWindow,
    /// The window ending where `current` starts.
    pub previous: TimeWindow,
}

/// A metric measured over two adjacent windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    /// The metric over the current window.
    pub current: f64,
    /// The metric over the previous window.
    pub previous: f64,
    /// Signed change from `previous` to `current` in percent.
    ///
    /// Zero when `previous` is zero, so a first appearance never shows as
    /// infinite growth.
    pub percent_change: f64,
}

impl TrendResult {
    /// Compare `current` against `previous`.
    pub fn new(current: f64, previous: f64) -> Self {
        let percent_change = if previous > 0.0 {
            (current - previous) / previous * 100.0
        } else {
            0.0
        };

        Self {
            current,
            previous,
            percent_change: if percent_change.is_finite() {
                percent_change
            } else {
                0.0
            },
        }
    }

    /// Whether the previous window had anything to compare against.
    pub fn has_baseline(&self) -> bool {
        self.previous > 0.0
    }
}

/// Sums the amounts of `records`.
pub fn sum_amount(records: &[&PaymentRecord]) -> f64 {
    records
        .iter()
        .map(|record| record.amount)
        .collect::<CompensatedSum>()
        .value()
}

/// Counts `records`.
pub fn record_count(records: &[&PaymentRecord]) -> f64 {
    records.len() as f64
}

/// Measures `metric` over the current and previous `period` ending at `now`.
///
/// Records are placed in a window by [PaymentRecord::timestamp]; records
/// without one are in neither window.
pub fn trend<M>(
    records: &[PaymentRecord],
    metric: M,
    period: Period,
    now: OffsetDateTime,
) -> TrendResult
where
    M: Fn(&[&PaymentRecord]) -> f64,
{
    let windows = period.windows(now);
    let mut current = Vec::new();
    let mut previous = Vec::new();

    for record in records {
        let Some(timestamp) = record.timestamp() else {
            continue;
        };

        if windows.current.contains(timestamp) {
            current.push(record);
        } else if windows.previous.contains(timestamp) {
            previous.push(record);
        }
    }

    TrendResult::new(metric(&current), metric(&previous))
}
