//! Dashboard HTTP handlers and view rendering.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    dashboard::{
        cards::{insights_view, metric_cards_view},
        charts::{
            DashboardChart, bar_chart_view, chart_containers_view, charts_script,
            monthly_totals_chart, pie_chart_view,
        },
        tables::{kind_breakdown_table, payments_table},
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    payment::PaymentRecord,
    report::{DashboardReport, ExportFormat, Period, build_report},
};

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The period the metric cards cover, monthly if not given.
    #[serde(default)]
    pub period: Period,
}

/// Display a page with an overview of the payments.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let now = state.now()?;
    let nav_bar = NavBar::new(query.period);

    if state.payments.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let report = build_report(&state.payments, query.period, now);

    Ok(dashboard_view(nav_bar, &report, &state.payments).into_response())
}

fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once the payment source returns some payments.
                Start the server with a payments file or a source URL."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn export_links(period: Period) -> Markup {
    let url = |format: ExportFormat| {
        format!(
            "{}?format={}&period={}",
            endpoints::EXPORT_API,
            format.extension(),
            period.as_query_value()
        )
    };

    html!(
        p id="export-links" class="text-sm mb-4 self-end"
        {
            "Download: "
            (link(&url(ExportFormat::Csv), "CSV"))
            " · "
            (link(&url(ExportFormat::Json), "JSON"))
        }
    )
}

fn dashboard_view(nav_bar: NavBar, report: &DashboardReport, payments: &[PaymentRecord]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = [DashboardChart {
        id: "monthly-totals-chart",
        options: monthly_totals_chart(&report.by_month).to_string(),
    }];

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            (export_links(report.period))

            (metric_cards_view(&report.cards))

            (insights_view(&report.insights))

            section id="charts" class="w-full mx-auto mb-8"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    (bar_chart_view(&report.bar))
                    (pie_chart_view(&report.pie))
                    (chart_containers_view(&charts))
                    (kind_breakdown_table(&report.by_kind))
                }
            }

            section class="w-full mx-auto mb-8"
            {
                (payments_table(payments))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
