//! Payment records and the sources that supply them.

mod query;
mod record;
mod sample;
mod source;
mod timestamp;

pub use query::PaymentQuery;
pub use record::{PaymentKind, PaymentRecord, PaymentStatus};
pub use sample::sample_payments;
pub use source::{
    HttpPaymentSource, JsonFilePaymentSource, PaymentSource, SamplePaymentSource,
    fetch_or_sample, parse_payments,
};
pub use timestamp::parse_timestamp;
