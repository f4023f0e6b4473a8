//! JSON and file download endpoints.
//!
//! These return the same numbers as the dashboard page for use by other
//! tools, e.g. a spreadsheet pulling the monthly figures.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    payment::{PaymentQuery, PaymentRecord},
    report::{ExportFormat, MetricCard, Period, build_metric_cards, build_report, export_report},
};

/// The query string of the metrics endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    period: Period,
}

/// The query string of the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    format: ExportFormat,
    #[serde(default)]
    period: Period,
}

fn into_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| Error::InvalidQuery(rejection.body_text()))
}

/// Get the payments that match the filters in the query string.
pub async fn get_payments(
    State(state): State<AppState>,
    query: Result<Query<PaymentQuery>, QueryRejection>,
) -> Result<Json<Vec<PaymentRecord>>, Error> {
    let query = into_query(query)?;
    let payments = query.apply(&state.payments);

    tracing::debug!("{} of {} payments match {query:?}", payments.len(), state.payments.len());

    Ok(Json(payments))
}

/// Get the metric cards for a period.
pub async fn get_metrics(
    State(state): State<AppState>,
    query: Result<Query<MetricsQuery>, QueryRejection>,
) -> Result<Json<Vec<MetricCard>>, Error> {
    let query = into_query(query)?;
    let now = state.now()?;

    Ok(Json(build_metric_cards(&state.payments, query.period, now)))
}

/// Download the report for a period as a file.
pub async fn get_report_export(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let query = into_query(query)?;
    let now = state.now()?;

    let report = build_report(&state.payments, query.period, now);
    let file = export_report(&report, query.format)?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.body,
    )
        .into_response())
}
