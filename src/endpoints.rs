//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The route for listing payments as JSON.
pub const PAYMENTS_API: &str = "/api/payments";
/// The route for the metric cards as JSON.
pub const METRICS_API: &str = "/api/metrics";
/// The route for downloading the report as a file.
pub const EXPORT_API: &str = "/api/reports/export";
