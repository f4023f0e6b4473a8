//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::{Error, payment::PaymentRecord, timezone::local_now};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The payments loaded when the server started.
    pub payments: Arc<[PaymentRecord]>,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Lisbon".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] serving `payments`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Lisbon".
    pub fn new(payments: Vec<PaymentRecord>, local_timezone: &str) -> Self {
        Self {
            payments: payments.into(),
            local_timezone: local_timezone.to_owned(),
        }
    }

    /// The current instant in the local timezone, used as "now" for reports.
    ///
    /// # Errors
    /// Returns an error if the local timezone is not a valid timezone name.
    pub fn now(&self) -> Result<OffsetDateTime, Error> {
        local_now(&self.local_timezone)
    }
}
