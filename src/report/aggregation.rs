//! Grouping payment records into buckets and summing them.
//!
//! Provides the generic [aggregate] function and the key functions used by the
//! dashboard: by kind, by status and by calendar month of payment.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Month};

use crate::{
    payment::{PaymentKind, PaymentRecord, PaymentStatus},
    report::palette::{FALLBACK_COLOR, kind_color, status_color},
};

/// A key that records can be grouped by.
///
/// The key's ordering decides the order of the buckets in an [Aggregate].
pub trait BucketKey: Ord + Clone {
    /// The text shown for the bucket in tables and legends.
    fn label(&self) -> String;

    /// The display color of the bucket.
    fn color(&self) -> &'static str {
        FALLBACK_COLOR
    }
}

impl BucketKey for PaymentKind {
    fn label(&self) -> String {
        PaymentKind::label(self)
    }

    fn color(&self) -> &'static str {
        kind_color(self.slug())
    }
}

impl BucketKey for PaymentStatus {
    fn label(&self) -> String {
        PaymentStatus::label(self)
    }

    fn color(&self) -> &'static str {
        status_color(self.slug())
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 for January.
    pub month: u8,
}

impl MonthKey {
    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Option<Date> {
        let month = Month::try_from(self.month).ok()?;
        Date::from_calendar_date(self.year, month, 1).ok()
    }
}

impl BucketKey for MonthKey {
    fn label(&self) -> String {
        match Month::try_from(self.month) {
            Ok(month) => format!("{} {}", format_month_label(month), self.year),
            Err(_) => format!("{:02}/{}", self.month, self.year),
        }
    }
}

/// Formats a month as a three-letter abbreviation, e.g. "Jan".
pub fn format_month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Groups by payment kind. Every record has a kind, so none are excluded.
pub fn by_kind(record: &PaymentRecord) -> Option<PaymentKind> {
    Some(record.kind.clone())
}

/// Groups by payment status. Every record has a status, so none are excluded.
pub fn by_status(record: &PaymentRecord) -> Option<PaymentStatus> {
    Some(record.status.clone())
}

/// Groups by the month the payment was made. Unpaid records are excluded.
pub fn by_month(record: &PaymentRecord) -> Option<MonthKey> {
    record
        .paid_at
        .map(|paid_at| MonthKey::from_date(paid_at.date()))
}

/// A running sum that compensates for floating point rounding (Neumaier).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, value: f64) {
        let total = self.sum + value;

        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }

        self.sum = total;
    }

    pub(crate) fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut sum = CompensatedSum::default();

        for value in iter {
            sum.add(value);
        }

        sum
    }
}

/// The records that share a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket<K> {
    /// The grouping key.
    pub key: K,
    /// Display text for the key.
    pub label: String,
    /// Sum of the records' amounts.
    pub total: f64,
    /// Number of records in the bucket.
    pub count: usize,
    /// Display color for the key.
    pub color: &'static str,
}

/// Records grouped by a key, with buckets in key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate<K> {
    buckets: Vec<AggregateBucket<K>>,
    excluded: usize,
}

impl<K: BucketKey> Aggregate<K> {
    /// The buckets in key order.
    pub fn buckets(&self) -> &[AggregateBucket<K>] {
        &self.buckets
    }

    /// The bucket for `key`, if any record had that key.
    pub fn get(&self, key: &K) -> Option<&AggregateBucket<K>> {
        self.buckets
            .binary_search_by(|bucket| bucket.key.cmp(key))
            .ok()
            .map(|index| &self.buckets[index])
    }

    /// The total for `key`, or zero if no record had that key.
    pub fn total_for(&self, key: &K) -> f64 {
        self.get(key).map_or(0.0, |bucket| bucket.total)
    }

    /// The sum of every bucket's total.
    pub fn grand_total(&self) -> f64 {
        self.buckets
            .iter()
            .map(|bucket| bucket.total)
            .collect::<CompensatedSum>()
            .value()
    }

    /// The number of records across all buckets.
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    /// The number of records left out because no key could be computed.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Groups `records` by the key returned by `key_fn` and sums each group.
///
/// Records for which `key_fn` returns `None` are left out of the result and
/// counted in [Aggregate::excluded]. The sum of the bucket totals is the sum
/// of the included records' amounts.
pub fn aggregate<'a, K, F, I>(records: I, key_fn: F) -> Aggregate<K>
where
    K: BucketKey,
    F: Fn(&PaymentRecord) -> Option<K>,
    I: IntoIterator<Item = &'a PaymentRecord>,
{
    let mut groups: BTreeMap<K, (CompensatedSum, usize)> = BTreeMap::new();
    let mut excluded = 0;

    for record in records {
        let Some(key) = key_fn(record) else {
            excluded += 1;
            continue;
        };

        let (sum, count) = groups.entry(key).or_default();
        sum.add(record.amount);
        *count += 1;
    }

    if excluded > 0 {
        tracing::debug!("{excluded} records had no grouping key and were excluded");
    }

    let buckets = groups
        .into_iter()
        .map(|(key, (sum, count))| AggregateBucket {
            label: key.label(),
            color: key.color(),
            total: sum.value(),
            count,
            key,
        })
        .collect();

    Aggregate { buckets, excluded }
}
