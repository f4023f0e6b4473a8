//! Paydesk is a payments dashboard for a fleet operator's collaborators.
//!
//! The library has two halves:
//! - [report], a pure metrics engine that groups payment records, compares
//!   periods, raises insights and lays out charts.
//! - A small web server that serves the dashboard as HTML and the same numbers
//!   as JSON and CSV.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod api;
mod app_state;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
pub mod payment;
pub mod report;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::internal_server_error::InternalServerError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// The metrics engine never fails: empty or odd input degrades to zeros and
/// empty layouts. These errors come from the edges, i.e. fetching payments,
/// parsing requests and writing exports.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The payment source could not be reached or read.
    ///
    /// The string describes the source and the underlying error.
    #[error("payment source unavailable: {0}")]
    PaymentSourceUnavailable(String),

    /// The payment source returned something other than a JSON array.
    #[error("invalid payment data: {0}")]
    InvalidPaymentData(String),

    /// The query parameters of a request could not be parsed or encoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The requested export format is recognised but not implemented.
    #[error("exporting as {0} is not supported")]
    UnsupportedExportFormat(String),

    /// An export could not be written.
    #[error("could not write export: {0}")]
    ExportError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::InvalidQuery(_) => {
                error_json(StatusCode::BAD_REQUEST, &self.to_string())
            }
            Error::UnsupportedExportFormat(_) => {
                error_json(StatusCode::NOT_IMPLEMENTED, &self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn invalid_query_is_a_bad_request() {
        let response = Error::InvalidQuery("from: invalid date".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unsupported_export_is_not_implemented() {
        let response = Error::UnsupportedExportFormat("pdf".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn other_errors_are_internal_server_errors() {
        let response = Error::ExportError("disk full".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
