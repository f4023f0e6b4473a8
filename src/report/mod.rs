//! The metrics engine behind the dashboard.
//!
//! Everything in here is a pure function of the payment records and an
//! evaluation instant: aggregation by key, period-over-period trends, insight
//! rules, chart layouts and the metric cards that combine them.

mod aggregation;
mod export;
mod geometry;
mod insights;
mod metrics;
mod palette;
mod trend;

pub use aggregation::{
    Aggregate, AggregateBucket, BucketKey, MonthKey, aggregate, by_kind, by_month, by_status,
    format_month_label,
};
pub use export::{ExportFile, ExportFormat, export_report};
pub use geometry::{BarSegment, Measure, PieSlice, bar_layout, pie_layout};
pub use insights::{
    Insight, InsightRule, InsightThresholds, Severity, generate_insights, generate_insights_with,
    insight_messages,
};
pub use metrics::{DashboardReport, MetricCard, MetricCategory, build_metric_cards, build_report};
pub use palette::{FALLBACK_COLOR, kind_color, status_color};
pub use trend::{Period, TimeWindow, TrendResult, TrendWindows, record_count, sum_amount, trend};
