//! Chart-ready layouts of aggregated buckets.
//!
//! The layouts are plain numbers: bar lengths relative to the largest bar and
//! pie slice angles in degrees. Rendering them is left to the caller.

use serde::{Deserialize, Serialize};

use crate::report::aggregation::AggregateBucket;

/// Which number of a bucket a chart shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// The sum of the amounts.
    #[default]
    Value,
    /// The number of records.
    Count,
}

impl Measure {
    /// Reads the measure from `bucket`.
    ///
    /// Negative and non-finite numbers read as zero since they cannot be drawn.
    pub fn of<K>(self, bucket: &AggregateBucket<K>) -> f64 {
        let value = match self {
            Measure::Value => bucket.total,
            Measure::Count => bucket.count as f64,
        };

        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    /// Display text for the bar.
    pub label: String,
    /// The measured number.
    pub value: f64,
    /// The bar's length relative to the longest bar, between 0 and 1.
    pub ratio: f64,
    /// Display color for the bar.
    pub color: &'static str,
}

/// Lays out one bar per bucket, in bucket order.
///
/// The longest bar has a ratio of exactly 1. Returns no bars if every bucket
/// measures zero.
pub fn bar_layout<K>(buckets: &[AggregateBucket<K>], measure: Measure) -> Vec<BarSegment> {
    let max = buckets
        .iter()
        .map(|bucket| measure.of(bucket))
        .fold(0.0, f64::max);

    if max <= 0.0 {
        return Vec::new();
    }

    buckets
        .iter()
        .map(|bucket| {
            let value = measure.of(bucket);

            BarSegment {
                label: bucket.label.clone(),
                value,
                ratio: (value / max).clamp(0.0, 1.0),
                color: bucket.color,
            }
        })
        .collect()
}

/// One slice of a pie chart.
///
/// Angles are in degrees, measured clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    /// Display text for the slice.
    pub label: String,
    /// The measured number.
    pub value: f64,
    /// Where the slice starts.
    pub start_angle: f64,
    /// Where the slice ends.
    pub end_angle: f64,
    /// Display color for the slice.
    pub color: &'static str,
}

impl PieSlice {
    /// The angle the slice covers.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// The share of the pie the slice covers, between 0 and 100.
    pub fn percentage(&self) -> f64 {
        self.sweep() / 360.0 * 100.0
    }

    /// An SVG path `d` attribute drawing the slice as a wedge of the circle
    /// centred on (`cx`, `cy`).
    ///
    /// A slice covering the whole pie is drawn as two half circles, since a
    /// single SVG arc cannot start and end at the same point. Returns an empty
    /// string for slices that cover nothing.
    pub fn arc_path(&self, cx: f64, cy: f64, radius: f64) -> String {
        let sweep = self.sweep();

        if sweep.is_nan() || sweep <= 0.0 || radius.is_nan() || radius <= 0.0 {
            return String::new();
        }

        if sweep >= 360.0 - 1e-9 {
            return format!(
                "M {cx:.3} {top:.3} A {radius:.3} {radius:.3} 0 1 1 {cx:.3} {bottom:.3} \
                 A {radius:.3} {radius:.3} 0 1 1 {cx:.3} {top:.3} Z",
                top = cy - radius,
                bottom = cy + radius,
            );
        }

        let (start_x, start_y) = point_on_circle(cx, cy, radius, self.start_angle);
        let (end_x, end_y) = point_on_circle(cx, cy, radius, self.end_angle);
        let large_arc = u8::from(sweep > 180.0);

        format!(
            "M {cx:.3} {cy:.3} L {start_x:.3} {start_y:.3} \
             A {radius:.3} {radius:.3} 0 {large_arc} 1 {end_x:.3} {end_y:.3} Z"
        )
    }
}

fn point_on_circle(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();

    (cx + radius * radians.sin(), cy - radius * radians.cos())
}

/// Lays out one slice per bucket, in bucket order, starting at 0 degrees.
///
/// The last slice ends at exactly 360 degrees. Returns no slices if every
/// bucket measures zero.
pub fn pie_layout<K>(buckets: &[AggregateBucket<K>], measure: Measure) -> Vec<PieSlice> {
    let values: Vec<f64> = buckets.iter().map(|bucket| measure.of(bucket)).collect();
    let total: f64 = values.iter().sum();

    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(buckets.len());
    let mut start_angle = 0.0;

    for (bucket, value) in buckets.iter().zip(values) {
        let end_angle = (start_angle + value / total * 360.0).min(360.0);

        slices.push(PieSlice {
            label: bucket.label.clone(),
            value,
            start_angle,
            end_angle,
            color: bucket.color,
        });

        start_angle = end_angle;
    }

    if let Some(last) = slices.last_mut() {
        last.end_angle = 360.0;
    }

    slices
}

#[cfg(test)]
mod tests {
    use crate::{
        payment::{PaymentKind, PaymentRecord, PaymentStatus},
        report::aggregation::{AggregateBucket, aggregate, by_kind},
    };

    use super::{Measure, PieSlice, bar_layout, pie_layout};

    fn create_test_record(kind: PaymentKind, amount: f64) -> PaymentRecord {
        PaymentRecord {
            id: format!("{kind}-{amount}"),
            employee_id: "EMP001".to_owned(),
            employee_name: "João Silva".to_owned(),
            kind,
            amount,
            status: PaymentStatus::Paid,
            paid_at: None,
            due_at: None,
        }
    }

    fn bucket(label: &str, total: f64, count: usize) -> AggregateBucket<String> {
        AggregateBucket {
            key: label.to_owned(),
            label: label.to_owned(),
            total,
            count,
            color: "#000000",
        }
    }

    fn slice(start_angle: f64, end_angle: f64) -> PieSlice {
        PieSlice {
            label: "Salary".to_owned(),
            value: 1.0,
            start_angle,
            end_angle,
            color: "#3B82F6",
        }
    }

    #[test]
    fn bar_ratios_are_relative_to_the_largest_bucket() {
        let records = vec![
            create_test_record(PaymentKind::Salary, 1200.0),
            create_test_record(PaymentKind::Travel, 350.0),
        ];
        let by_kind = aggregate(&records, by_kind);

        let bars = bar_layout(by_kind.buckets(), Measure::Value);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Salary");
        assert_eq!(bars[0].ratio, 1.0);
        assert_eq!(bars[1].label, "Travel");
        assert!((bars[1].ratio - 0.2917).abs() < 1e-4, "{}", bars[1].ratio);
        assert_eq!(bars[1].color, "#10B981");
    }

    #[test]
    fn bar_layout_by_count() {
        let buckets = vec![bucket("a", 10.0, 4), bucket("b", 1000.0, 1)];

        let bars = bar_layout(&buckets, Measure::Count);

        assert_eq!(bars[0].ratio, 1.0);
        assert_eq!(bars[1].ratio, 0.25);
        assert_eq!(bars[1].value, 1.0);
    }

    #[test]
    fn bar_layout_is_empty_for_degenerate_input() {
        assert!(bar_layout::<String>(&[], Measure::Value).is_empty());
        assert!(bar_layout(&[bucket("a", 0.0, 0), bucket("b", 0.0, 0)], Measure::Value).is_empty());
        assert!(bar_layout(&[bucket("a", -5.0, 1)], Measure::Value).is_empty());
        assert!(bar_layout(&[bucket("a", f64::NAN, 1)], Measure::Value).is_empty());
    }

    #[test]
    fn negative_totals_draw_as_empty_bars() {
        let bars = bar_layout(&[bucket("a", 100.0, 1), bucket("b", -40.0, 1)], Measure::Value);

        assert_eq!(bars[1].value, 0.0);
        assert_eq!(bars[1].ratio, 0.0);
    }

    #[test]
    fn pie_slices_close_the_circle() {
        let buckets: Vec<_> = [0.1, 0.2, 0.3, 1.7, 13.0, 0.01]
            .into_iter()
            .enumerate()
            .map(|(i, total)| bucket(&i.to_string(), total, 1))
            .collect();

        let slices = pie_layout(&buckets, Measure::Value);

        assert_eq!(slices.len(), buckets.len());
        assert_eq!(slices[0].start_angle, 0.0);
        assert_eq!(slices.last().unwrap().end_angle, 360.0);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
            assert!(pair[0].start_angle <= pair[0].end_angle);
        }
        let total_percentage: f64 = slices.iter().map(PieSlice::percentage).sum();
        assert!((total_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pie_slice_angles_are_proportional() {
        let slices = pie_layout(
            &[bucket("a", 1.0, 3), bucket("b", 3.0, 1)],
            Measure::Value,
        );

        assert_eq!(slices[0].end_angle, 90.0);
        assert_eq!(slices[1].sweep(), 270.0);

        let by_count = pie_layout(
            &[bucket("a", 1.0, 3), bucket("b", 3.0, 1)],
            Measure::Count,
        );

        assert_eq!(by_count[0].end_angle, 270.0);
    }

    #[test]
    fn pie_layout_is_empty_for_degenerate_input() {
        assert!(pie_layout::<String>(&[], Measure::Value).is_empty());
        assert!(pie_layout(&[bucket("a", 0.0, 0)], Measure::Value).is_empty());
        assert!(pie_layout(&[bucket("a", -1.0, 2)], Measure::Value).is_empty());
    }

    #[test]
    fn layouts_are_deterministic() {
        let buckets = vec![bucket("a", 12.5, 2), bucket("b", 7.5, 1)];

        assert_eq!(
            pie_layout(&buckets, Measure::Value),
            pie_layout(&buckets, Measure::Value)
        );
        assert_eq!(
            bar_layout(&buckets, Measure::Value),
            bar_layout(&buckets, Measure::Value)
        );
    }

    #[test]
    fn arc_path_for_quarter_slice() {
        let path = slice(0.0, 90.0).arc_path(50.0, 50.0, 40.0);

        assert_eq!(
            path,
            "M 50.000 50.000 L 50.000 10.000 A 40.000 40.000 0 0 1 90.000 50.000 Z"
        );
    }

    #[test]
    fn arc_path_sets_large_arc_flag_past_half_circle() {
        let half = slice(0.0, 180.0).arc_path(50.0, 50.0, 40.0);
        let most = slice(0.0, 270.0).arc_path(50.0, 50.0, 40.0);

        assert!(half.contains(" 0 0 1 "), "{half}");
        assert!(most.contains(" 0 1 1 "), "{most}");
        assert!(most.ends_with("10.000 50.000 Z"), "{most}");
    }

    #[test]
    fn arc_path_for_full_circle_uses_two_arcs() {
        let path = slice(0.0, 360.0).arc_path(50.0, 50.0, 40.0);

        assert_eq!(path.matches('A').count(), 2);
        assert_eq!(
            path,
            "M 50.000 10.000 A 40.000 40.000 0 1 1 50.000 90.000 \
             A 40.000 40.000 0 1 1 50.000 10.000 Z"
        );
    }

    #[test]
    fn arc_path_is_empty_for_zero_sweep() {
        assert_eq!(slice(90.0, 90.0).arc_path(50.0, 50.0, 40.0), "");
        assert_eq!(slice(0.0, 90.0).arc_path(50.0, 50.0, 0.0), "");
    }
}
