//! Lenient (de)serialization for optional payment timestamps.
//!
//! Data sources are not consistent about how they send dates: some send full
//! RFC 3339 date-times, others plain `YYYY-MM-DD` dates, and some send empty
//! strings or garbage for records that have not been paid yet. Anything that
//! cannot be read as a date becomes `None`, which excludes the record from
//! time based reports instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serializer, de::IgnoredAny, ser::Error as _};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Unreadable(IgnoredAny),
}

pub(crate) fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date_time) => {
            let text = date_time.format(&Rfc3339).map_err(S::Error::custom)?;
            serializer.serialize_some(&text)
        }
        None => serializer.serialize_none(),
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;

    Ok(match raw {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::Unreadable(_)) | None => None,
    })
}

/// Parse an RFC 3339 date-time or a plain date (as midnight UTC).
///
/// Returns `None` for empty or unparseable text.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time);
    }

    match Date::parse(text, DATE_FORMAT) {
        Ok(date) => Some(date.midnight().assume_utc()),
        Err(error) => {
            tracing::debug!("ignoring unreadable timestamp {text:?}: {error}");
            None
        }
    }
}
