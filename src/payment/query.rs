//! Filters accepted by the payments API and forwarded to remote data sources.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    payment::{PaymentKind, PaymentRecord, PaymentStatus},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Optional filters over a payment collection.
///
/// Every filter that is set must match for a record to be kept. Empty query
/// string values (e.g. `?status=`) are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuery {
    /// Only keep records with this status.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<PaymentStatus>,

    /// Only keep records of this kind.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<PaymentKind>,

    /// Only keep records for this collaborator.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_id: Option<String>,

    /// Only keep records dated on or after this day.
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        serialize_with = "serialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<Date>,

    /// Only keep records dated on or before this day.
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        serialize_with = "serialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<Date>,
}

impl PaymentQuery {
    /// Whether the query has no filters set.
    pub fn is_empty(&self) -> bool {
        self == &PaymentQuery::default()
    }

    /// Whether `record` passes every filter that is set.
    ///
    /// A record without a timestamp never passes a date filter.
    pub fn matches(&self, record: &PaymentRecord) -> bool {
        if let Some(status) = &self.status {
            if &record.status != status {
                return false;
            }
        }

        if let Some(kind) = &self.kind {
            if &record.kind != kind {
                return false;
            }
        }

        if let Some(employee_id) = &self.employee_id {
            if &record.employee_id != employee_id {
                return false;
            }
        }

        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        let Some(date) = record.timestamp().map(|timestamp| timestamp.date()) else {
            return false;
        };

        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Clone the records that pass the filters, keeping their order.
    pub fn apply(&self, records: &[PaymentRecord]) -> Vec<PaymentRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }

    /// URL encode the filters that are set, e.g. "status=paid&from=2024-01-01".
    ///
    /// # Errors
    /// Returns [Error::InvalidQuery] if the query cannot be encoded.
    pub fn to_query_string(&self) -> Result<String, Error> {
        serde_urlencoded::to_string(self).map_err(|error| Error::InvalidQuery(error.to_string()))
    }
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value
        .filter(|text| !text.trim().is_empty())
        .map(|text| T::from(text.trim().to_owned())))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    Date::parse(text, DATE_FORMAT)
        .map(Some)
        .map_err(|error| D::Error::custom(format!("invalid date \"{text}\": {error}")))
}

fn serialize_date<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => {
            let text = date
                .format(DATE_FORMAT)
                .map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&text)
        }
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::payment::{PaymentKind, PaymentRecord, PaymentStatus};

    use super::PaymentQuery;

    fn record(id: &str, employee_id: &str, kind: PaymentKind, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            id: id.to_owned(),
            employee_id: employee_id.to_owned(),
            employee_name: format!("Employee {employee_id}"),
            kind,
            amount: 100.0,
            status,
            paid_at: Some(datetime!(2024-03-10 12:00 UTC)),
            due_at: None,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = PaymentQuery::default();
        let mut undated = record("1", "e1", PaymentKind::Salary, PaymentStatus::Pending);
        undated.paid_at = None;

        assert!(query.is_empty());
        assert!(query.matches(&undated));
    }

    #[test]
    fn filters_by_status_kind_and_employee() {
        let records = vec![
            record("1", "e1", PaymentKind::Salary, PaymentStatus::Paid),
            record("2", "e1", PaymentKind::Advance, PaymentStatus::Paid),
            record("3", "e2", PaymentKind::Salary, PaymentStatus::Paid),
            record("4", "e1", PaymentKind::Salary, PaymentStatus::Pending),
        ];
        let query = PaymentQuery {
            status: Some(PaymentStatus::Paid),
            kind: Some(PaymentKind::Salary),
            employee_id: Some("e1".to_owned()),
            ..Default::default()
        };

        let got = query.apply(&records);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "1");
    }

    #[test]
    fn date_range_is_inclusive_and_excludes_undated_records() {
        let mut undated = record("2", "e1", PaymentKind::Salary, PaymentStatus::Pending);
        undated.paid_at = None;
        let records = vec![
            record("1", "e1", PaymentKind::Salary, PaymentStatus::Paid),
            undated,
        ];
        let query = PaymentQuery {
            from: Some(date!(2024 - 03 - 10)),
            to: Some(date!(2024 - 03 - 10)),
            ..Default::default()
        };

        let got = query.apply(&records);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "1");
    }

    #[test]
    fn deserializes_from_url_query_and_ignores_empty_values() {
        let query: PaymentQuery =
            serde_urlencoded::from_str("status=paid&kind=&employee_id=e9&from=2024-01-01&to=")
                .unwrap();

        assert_eq!(
            query,
            PaymentQuery {
                status: Some(PaymentStatus::Paid),
                kind: None,
                employee_id: Some("e9".to_owned()),
                from: Some(date!(2024 - 01 - 01)),
                to: None,
            }
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = serde_urlencoded::from_str::<PaymentQuery>("from=01/02/2024");

        assert!(result.is_err());
    }

    #[test]
    fn encodes_only_set_filters() {
        let query = PaymentQuery {
            kind: Some(PaymentKind::SalaryAdjustment),
            to: Some(date!(2024 - 12 - 31)),
            ..Default::default()
        };

        assert_eq!(
            query.to_query_string().unwrap(),
            "kind=salary_adjustment&to=2024-12-31"
        );
    }
}
