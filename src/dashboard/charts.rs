//! Chart rendering for the dashboard.
//!
//! - **Monthly totals**: an ECharts line chart of paid amounts per month.
//! - **Totals by kind**: horizontal bars drawn with plain HTML.
//! - **Share by kind**: a pie chart drawn as inline SVG.
//!
//! The bar and pie geometry comes from the report; this module only turns it
//! into markup.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::{CARD_STYLE, HeadElement, format_currency},
    report::{Aggregate, BarSegment, BucketKey, MonthKey, PieSlice},
};

const PIE_SIZE: f64 = 200.0;
const PIE_RADIUS: f64 = 90.0;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Renders the containers that the ECharts charts are drawn into.
pub(super) fn chart_containers_view(charts: &[DashboardChart]) -> Markup {
    html!(
        @for chart in charts {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

pub(super) fn monthly_totals_chart(by_month: &Aggregate<MonthKey>) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = by_month
        .buckets()
        .iter()
        .map(|bucket| (bucket.key.label(), bucket.total))
        .unzip();

    Chart::new()
        .title(
            Title::new()
                .text("Paid per month")
                .subtext("All payments made"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Paid").data(values))
}

/// Renders one horizontal bar per segment, scaled to the segment's ratio.
pub(super) fn bar_chart_view(bars: &[BarSegment]) -> Markup {
    html! {
        div id="kind-bar-chart" class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Totals by kind" }

            @if bars.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "No payments to show." }
            } @else {
                ul class="space-y-3"
                {
                    @for bar in bars {
                        li
                        {
                            div class="flex justify-between text-sm mb-1"
                            {
                                span { (bar.label) }
                                span class="font-semibold" { (format_currency(bar.value)) }
                            }

                            div
                                class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5"
                                role="progressbar"
                                aria-valuenow=(format!("{:.0}", bar.ratio * 100.0))
                                aria-valuemin="0"
                                aria-valuemax="100"
                            {
                                div
                                    class="h-2.5 rounded-full"
                                    style=(format!(
                                        "width: {:.1}%; background-color: {}",
                                        bar.ratio * 100.0,
                                        bar.color
                                    ))
                                {}
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the slices as an SVG pie chart with a legend.
pub(super) fn pie_chart_view(slices: &[PieSlice]) -> Markup {
    let centre = PIE_SIZE / 2.0;

    html! {
        div id="kind-pie-chart" class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Share by kind" }

            @if slices.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "No payments to show." }
            } @else {
                div class="flex flex-col sm:flex-row items-center gap-6"
                {
                    svg
                        class="w-48 h-48"
                        viewBox=(format!("0 0 {PIE_SIZE} {PIE_SIZE}"))
                        role="img"
                        aria-label="Share of payments by kind"
                    {
                        @for slice in slices {
                            @let wedge = slice.arc_path(centre, centre, PIE_RADIUS);
                            @if !wedge.is_empty() {
                                path d=(wedge) fill=(slice.color)
                                {
                                    title {
                                        (slice.label) ": " (format!("{:.1}%", slice.percentage()))
                                    }
                                }
                            }
                        }
                    }

                    ul class="text-sm space-y-1"
                    {
                        @for slice in slices {
                            li class="flex items-center gap-2"
                            {
                                span
                                    class="inline-block w-3 h-3 rounded-sm"
                                    style=(format!("background-color: {}", slice.color))
                                {}
                                span { (slice.label) }
                                span class="text-gray-600 dark:text-gray-400"
                                {
                                    (format!("{:.1}%", slice.percentage()))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-PT', {
              style: 'currency',
              currency: 'EUR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        payment::{PaymentKind, PaymentRecord, PaymentStatus},
        report::{Measure, aggregate, bar_layout, by_kind, by_month, pie_layout},
    };

    use super::{bar_chart_view, monthly_totals_chart, pie_chart_view};

    fn paid(kind: PaymentKind, amount: f64) -> PaymentRecord {
        PaymentRecord {
            id: format!("{kind}"),
            employee_id: "EMP001".to_owned(),
            employee_name: "João Silva".to_owned(),
            kind,
            amount,
            status: PaymentStatus::Paid,
            paid_at: Some(datetime!(2024-01-31 17:00 UTC)),
            due_at: None,
        }
    }

    fn records() -> Vec<PaymentRecord> {
        vec![
            paid(PaymentKind::Salary, 1200.0),
            paid(PaymentKind::Travel, 350.0),
        ]
    }

    #[test]
    fn bar_widths_follow_ratios() {
        let by_kind = aggregate(&records(), by_kind);
        let bars = bar_layout(by_kind.buckets(), Measure::Value);

        let html = Html::parse_fragment(&bar_chart_view(&bars).into_string());
        let selector = Selector::parse("div[role='progressbar'] > div").unwrap();
        let styles: Vec<_> = html
            .select(&selector)
            .filter_map(|bar| bar.value().attr("style"))
            .collect();

        assert_eq!(styles.len(), 2);
        assert!(styles[0].starts_with("width: 100.0%"), "{}", styles[0]);
        assert!(styles[1].starts_with("width: 29.2%"), "{}", styles[1]);
    }

    #[test]
    fn pie_has_one_path_per_slice() {
        let by_kind = aggregate(&records(), by_kind);
        let slices = pie_layout(by_kind.buckets(), Measure::Value);

        let html = Html::parse_fragment(&pie_chart_view(&slices).into_string());
        let selector = Selector::parse("svg path").unwrap();
        let paths: Vec<_> = html.select(&selector).collect();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].value().attr("fill"), Some("#3B82F6"));
        assert!(
            paths[0]
                .value()
                .attr("d")
                .is_some_and(|d| d.starts_with("M 100.000 100.000"))
        );
    }

    #[test]
    fn empty_charts_show_placeholder() {
        let bars = bar_chart_view(&[]).into_string();
        let pie = pie_chart_view(&[]).into_string();

        assert!(bars.contains("No payments to show."));
        assert!(pie.contains("No payments to show."));
        assert!(!pie.contains("<svg"));
    }

    #[test]
    fn monthly_chart_has_one_point_per_month() {
        let by_month = aggregate(&records(), by_month);

        let options = monthly_totals_chart(&by_month).to_string();

        assert!(options.contains("Jan 2024"), "{options}");
        assert!(options.contains("1550"), "{options}");
    }
}
