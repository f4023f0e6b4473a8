//! Application router configuration.

use axum::{Router, response::Redirect, routing::get};

use crate::{
    AppState,
    api::{get_metrics, get_payments, get_report_export},
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PAYMENTS_API, get(get_payments))
        .route(endpoints::METRICS_API, get(get_metrics))
        .route(endpoints::EXPORT_API, get(get_report_export))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
