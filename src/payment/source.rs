//! Where payment records come from.
//!
//! The dashboard does not own any payment data. Records are fetched from a
//! REST endpoint or read from a JSON export, and when neither is available
//! the fixed sample dataset is used instead so the dashboard still renders.

use std::{path::PathBuf, time::Duration};

use ureq::Agent;

use crate::{
    Error,
    payment::{PaymentQuery, PaymentRecord, sample_payments},
};

/// How long to wait for a remote payment source before giving up.
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// A supplier of payment records.
///
/// Implementations may do blocking I/O. Call them from a blocking context
/// (e.g. [tokio::task::spawn_blocking]) when inside an async runtime.
pub trait PaymentSource {
    /// Get the records that match `query`.
    ///
    /// # Errors
    /// Returns an error if the records could not be retrieved or parsed.
    fn fetch(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, Error>;

    /// A short description of the source for log messages.
    fn describe(&self) -> String;
}

/// Fetches payments with a GET request to a REST endpoint returning a JSON array.
///
/// The query filters are sent as URL parameters and applied again locally in
/// case the endpoint ignores some of them.
#[derive(Clone)]
pub struct HttpPaymentSource {
    url: String,
    agent: Agent,
}

impl HttpPaymentSource {
    /// Create a source for the endpoint at `url`, e.g. "https://erp.local/api/payments".
    pub fn new(url: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .build()
            .into();

        Self {
            url: url.to_owned(),
            agent,
        }
    }

    fn request_url(&self, query: &PaymentQuery) -> Result<String, Error> {
        let query_string = query.to_query_string()?;

        if query_string.is_empty() {
            return Ok(self.url.clone());
        }

        let separator = if self.url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{separator}{query_string}", self.url))
    }
}

impl PaymentSource for HttpPaymentSource {
    fn fetch(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, Error> {
        let url = self.request_url(query)?;
        tracing::debug!("fetching payments from {url}");

        let body = self
            .agent
            .get(&url)
            .call()
            .map_err(|error| Error::PaymentSourceUnavailable(format!("GET {url}: {error}")))?
            .body_mut()
            .read_to_string()
            .map_err(|error| Error::PaymentSourceUnavailable(format!("GET {url}: {error}")))?;

        let payments = parse_payments(&body)?;
        Ok(query.apply(&payments))
    }

    fn describe(&self) -> String {
        format!("REST endpoint {}", self.url)
    }
}

/// Reads payments from a JSON file containing an array of records.
#[derive(Debug, Clone)]
pub struct JsonFilePaymentSource {
    path: PathBuf,
}

impl JsonFilePaymentSource {
    /// Create a source that reads the file at `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PaymentSource for JsonFilePaymentSource {
    fn fetch(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, Error> {
        let text = std::fs::read_to_string(&self.path).map_err(|error| {
            Error::PaymentSourceUnavailable(format!("{}: {error}", self.path.display()))
        })?;

        let payments = parse_payments(&text)?;
        Ok(query.apply(&payments))
    }

    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }
}

/// Serves the fixed sample dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplePaymentSource;

impl PaymentSource for SamplePaymentSource {
    fn fetch(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, Error> {
        Ok(query.apply(&sample_payments()))
    }

    fn describe(&self) -> String {
        "sample dataset".to_owned()
    }
}

/// Fetch from `source`, falling back to the sample dataset if the fetch fails.
///
/// There are no retries: one failed attempt switches to the sample data.
pub fn fetch_or_sample(source: &dyn PaymentSource, query: &PaymentQuery) -> Vec<PaymentRecord> {
    match source.fetch(query) {
        Ok(payments) => {
            tracing::info!(
                "loaded {} payments from {}",
                payments.len(),
                source.describe()
            );
            payments
        }
        Err(error) => {
            tracing::warn!(
                "could not load payments from {}, using sample data instead: {error}",
                source.describe()
            );
            query.apply(&sample_payments())
        }
    }
}

/// Parse a JSON array of payment records.
///
/// Array elements that are not valid records are logged and skipped.
///
/// # Errors
/// Returns [Error::InvalidPaymentData] if `json` is not a JSON array.
pub fn parse_payments(json: &str) -> Result<Vec<PaymentRecord>, Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|error| Error::InvalidPaymentData(error.to_string()))?;

    let mut payments = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<PaymentRecord>(value) {
            Ok(payment) => payments.push(payment),
            Err(error) => tracing::warn!("skipping malformed payment at index {index}: {error}"),
        }
    }

    Ok(payments)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::{SystemTime, UNIX_EPOCH},
    };

    use axum::{Router, extract::RawQuery, routing::get};

    use crate::{
        Error,
        payment::{PaymentKind, PaymentQuery, PaymentStatus, sample_payments},
    };

    use super::{
        HttpPaymentSource, JsonFilePaymentSource, PaymentSource, SamplePaymentSource,
        fetch_or_sample, parse_payments,
    };

    const PAYMENTS_JSON: &str = r#"[
        {"id": "1", "employeeId": "e1", "employeeName": "Ana", "kind": "salary",
         "amount": 1000.0, "status": "paid", "paidAt": "2024-01-31"},
        {"id": "2", "employeeId": "e2", "employeeName": "Rui", "kind": "travel",
         "amount": 80.0, "status": "pending", "dueAt": "2024-02-10T00:00:00Z"}
    ]"#;

    fn temp_file_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("paydesk-{name}-{nanos}.json"))
    }

    #[test]
    fn parse_payments_skips_malformed_elements() {
        let json = r#"[
            {"id": "1", "employeeId": "e1", "employeeName": "Ana", "kind": "salary",
             "amount": 10.0, "status": "paid"},
            {"id": "2", "amount": "not a number"}
        ]"#;

        let payments = parse_payments(json).unwrap();

        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, "1");
    }

    #[test]
    fn parse_payments_rejects_non_array() {
        let result = parse_payments(r#"{"payments": []}"#);

        assert!(matches!(result, Err(Error::InvalidPaymentData(_))));
    }

    #[test]
    fn json_file_source_reads_and_filters() {
        let path = temp_file_path("file-source");
        std::fs::write(&path, PAYMENTS_JSON).unwrap();
        let source = JsonFilePaymentSource::new(&path);
        let query = PaymentQuery {
            kind: Some(PaymentKind::Travel),
            ..Default::default()
        };

        let payments = source.fetch(&query).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentStatus::Pending);
    }

    #[test]
    fn missing_file_falls_back_to_sample_data() {
        let source = JsonFilePaymentSource::new(temp_file_path("does-not-exist"));

        let payments = fetch_or_sample(&source, &PaymentQuery::default());

        assert_eq!(payments, sample_payments());
    }

    #[test]
    fn fallback_applies_query_to_sample_data() {
        let source = JsonFilePaymentSource::new(temp_file_path("does-not-exist"));
        let query = PaymentQuery {
            status: Some(PaymentStatus::Paid),
            ..Default::default()
        };

        let payments = fetch_or_sample(&source, &query);

        assert!(!payments.is_empty());
        assert!(
            payments
                .iter()
                .all(|payment| payment.status == PaymentStatus::Paid)
        );
    }

    #[test]
    fn sample_source_never_fails() {
        let payments = SamplePaymentSource.fetch(&PaymentQuery::default()).unwrap();

        assert_eq!(payments.len(), sample_payments().len());
    }

    #[test]
    fn request_url_appends_filters() {
        let source = HttpPaymentSource::new("http://localhost/api/payments?token=abc");
        let query = PaymentQuery {
            status: Some(PaymentStatus::Scheduled),
            ..Default::default()
        };

        assert_eq!(
            source.request_url(&query).unwrap(),
            "http://localhost/api/payments?token=abc&status=scheduled"
        );
        assert_eq!(
            source.request_url(&PaymentQuery::default()).unwrap(),
            "http://localhost/api/payments?token=abc"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn http_source_sends_filters_and_parses_body() {
        let seen_query = Arc::new(Mutex::new(None));
        let seen = seen_query.clone();
        let app = Router::new().route(
            "/payments",
            get(move |RawQuery(query): RawQuery| {
                let seen = seen.clone();
                async move {
                    *seen.lock().unwrap() = query;
                    PAYMENTS_JSON
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let source = HttpPaymentSource::new(&format!("http://{addr}/payments"));
        let query = PaymentQuery {
            employee_id: Some("e1".to_owned()),
            ..Default::default()
        };
        let payments = tokio::task::spawn_blocking(move || source.fetch(&query))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(seen_query.lock().unwrap().as_deref(), Some("employee_id=e1"));
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].employee_name, "Ana");
    }

    #[test]
    fn unreachable_endpoint_is_reported_as_unavailable() {
        let source = HttpPaymentSource::new("http://127.0.0.1:1/payments");

        let result = source.fetch(&PaymentQuery::default());

        assert!(matches!(result, Err(Error::PaymentSourceUnavailable(_))));
    }
}
