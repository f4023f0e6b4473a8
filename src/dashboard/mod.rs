//! Dashboard module
//!
//! Provides an overview page with the headline metrics, insights, charts and
//! the list of payments for the selected period.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
