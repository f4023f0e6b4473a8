//! The headline numbers of the dashboard and the report that bundles them.

use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    payment::{PaymentKind, PaymentRecord, PaymentStatus},
    report::{
        aggregation::{Aggregate, MonthKey, aggregate, by_kind, by_month},
        geometry::{BarSegment, Measure, PieSlice, bar_layout, pie_layout},
        insights::{Insight, generate_insights},
        trend::{Period, sum_amount, trend},
    },
};

/// Whether a metric is money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    /// Money kept by the company, e.g. discounts on payments.
    Income,
    /// Money paid to collaborators.
    Expense,
}

/// One headline number with its change since the previous period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    /// The name of the metric.
    pub title: String,
    /// The metric's total over the current period.
    pub value: f64,
    /// The period the value covers.
    pub period: Period,
    /// Signed change from the previous period in percent, if the previous
    /// period had anything to compare against.
    pub percent_change: Option<f64>,
    /// Whether the metric is income or expense.
    pub category: MetricCategory,
}

enum MetricScope {
    Statuses(&'static [PaymentStatus]),
    Kind(PaymentKind),
}

struct MetricDefinition {
    title: &'static str,
    scope: MetricScope,
    category: MetricCategory,
}

const METRICS: [MetricDefinition; 7] = [
    MetricDefinition {
        title: "Total Paid",
        scope: MetricScope::Statuses(&[PaymentStatus::Paid]),
        category: MetricCategory::Expense,
    },
    MetricDefinition {
        title: "Total Pending",
        scope: MetricScope::Statuses(&[
            PaymentStatus::Pending,
            PaymentStatus::Approved,
            PaymentStatus::Scheduled,
        ]),
        category: MetricCategory::Expense,
    },
    MetricDefinition {
        title: "Salaries",
        scope: MetricScope::Kind(PaymentKind::Salary),
        category: MetricCategory::Expense,
    },
    MetricDefinition {
        title: "Advances",
        scope: MetricScope::Kind(PaymentKind::Advance),
        category: MetricCategory::Expense,
    },
    MetricDefinition {
        title: "Travel",
        scope: MetricScope::Kind(PaymentKind::Travel),
        category: MetricCategory::Expense,
    },
    MetricDefinition {
        title: "Bonuses",
        scope: MetricScope::Kind(PaymentKind::Bonus),
        category: MetricCategory::Expense,
    },
    MetricDefinition {
        title: "Discounts",
        scope: MetricScope::Kind(PaymentKind::Discount),
        category: MetricCategory::Income,
    },
];

/// Cancelled payments never move money, so they are left out of every total.
fn counts_towards_totals(record: &PaymentRecord) -> bool {
    record.status != PaymentStatus::Cancelled
}

fn measure(scope: &MetricScope, window: &[&PaymentRecord]) -> f64 {
    match scope {
        MetricScope::Statuses(statuses) => {
            let matching: Vec<_> = window
                .iter()
                .copied()
                .filter(|record| statuses.contains(&record.status))
                .collect();

            sum_amount(&matching)
        }
        MetricScope::Kind(kind) => aggregate(
            window
                .iter()
                .copied()
                .filter(|record| counts_towards_totals(record)),
            by_kind,
        )
        .total_for(kind),
    }
}

/// Builds the metric cards for the `period` ending at `now`.
///
/// Every card is present even when there are no records, with a value of zero
/// and no percent change.
pub fn build_metric_cards(
    records: &[PaymentRecord],
    period: Period,
    now: OffsetDateTime,
) -> Vec<MetricCard> {
    METRICS
        .iter()
        .map(|definition| {
            let result = trend(records, |window| measure(&definition.scope, window), period, now);

            MetricCard {
                title: definition.title.to_owned(),
                value: result.current,
                period,
                percent_change: result.has_baseline().then_some(result.percent_change),
                category: definition.category,
            }
        })
        .collect()
}

/// Everything the dashboard and the exports show, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// The instant the report was computed for.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// The period the metric cards cover.
    pub period: Period,
    /// The headline numbers.
    pub cards: Vec<MetricCard>,
    /// Observations about the payments.
    pub insights: Vec<Insight>,
    /// Totals per payment kind, over all non-cancelled records.
    pub by_kind: Aggregate<PaymentKind>,
    /// Totals per month of payment.
    pub by_month: Aggregate<MonthKey>,
    /// Bars for the totals per payment kind.
    pub bar: Vec<BarSegment>,
    /// Pie slices for the totals per payment kind.
    pub pie: Vec<PieSlice>,
}

/// Computes the full dashboard report for the `period` ending at `now`.
pub fn build_report(
    records: &[PaymentRecord],
    period: Period,
    now: OffsetDateTime,
) -> DashboardReport {
    tracing::debug!(
        "building {} report for {} records",
        period.as_query_value(),
        records.len()
    );

    let active = || records.iter().filter(|record| counts_towards_totals(record));
    let by_kind = aggregate(active(), by_kind);
    let by_month = aggregate(active(), by_month);

    DashboardReport {
        generated_at: now,
        period,
        cards: build_metric_cards(records, period, now),
        insights: generate_insights(records, now),
        bar: bar_layout(by_kind.buckets(), Measure::Value),
        pie: pie_layout(by_kind.buckets(), Measure::Value),
        by_kind,
        by_month,
    }
}
