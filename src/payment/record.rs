//! The payment record consumed by every report.
//!
//! Records come from an external data source and are never modified here.
//! Unknown kinds and statuses are kept as [PaymentKind::Other] and
//! [PaymentStatus::Other] instead of being rejected, so a single odd row in a
//! feed does not break the whole dashboard.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// What a payment was made for.
///
/// The derived ordering follows the declaration order, with [PaymentKind::Other]
/// last. Reports rely on this to lay out buckets in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentKind {
    /// Regular monthly salary.
    Salary,
    /// An advance on a future salary.
    Advance,
    /// Travel expenses.
    Travel,
    /// A one-off bonus.
    Bonus,
    /// A deduction from what a collaborator is owed.
    Discount,
    /// Vacation pay.
    Vacation,
    /// Paid leave.
    Leave,
    /// Reimbursement of an out-of-pocket expense.
    Reimbursement,
    /// A correction to a previously paid salary.
    SalaryAdjustment,
    /// Any kind this crate does not know about, holding the raw value.
    Other(String),
}

impl PaymentKind {
    /// Every known kind, in display order.
    pub const KNOWN: [PaymentKind; 9] = [
        PaymentKind::Salary,
        PaymentKind::Advance,
        PaymentKind::Travel,
        PaymentKind::Bonus,
        PaymentKind::Discount,
        PaymentKind::Vacation,
        PaymentKind::Leave,
        PaymentKind::Reimbursement,
        PaymentKind::SalaryAdjustment,
    ];

    /// The wire name of the kind, e.g. "salary_adjustment".
    pub fn slug(&self) -> &str {
        match self {
            PaymentKind::Salary => "salary",
            PaymentKind::Advance => "advance",
            PaymentKind::Travel => "travel",
            PaymentKind::Bonus => "bonus",
            PaymentKind::Discount => "discount",
            PaymentKind::Vacation => "vacation",
            PaymentKind::Leave => "leave",
            PaymentKind::Reimbursement => "reimbursement",
            PaymentKind::SalaryAdjustment => "salary_adjustment",
            PaymentKind::Other(raw) => raw,
        }
    }

    /// A human readable name for tables and chart legends.
    pub fn label(&self) -> String {
        match self {
            PaymentKind::Salary => "Salary".to_owned(),
            PaymentKind::Advance => "Advance".to_owned(),
            PaymentKind::Travel => "Travel".to_owned(),
            PaymentKind::Bonus => "Bonus".to_owned(),
            PaymentKind::Discount => "Discount".to_owned(),
            PaymentKind::Vacation => "Vacation".to_owned(),
            PaymentKind::Leave => "Leave".to_owned(),
            PaymentKind::Reimbursement => "Reimbursement".to_owned(),
            PaymentKind::SalaryAdjustment => "Salary adjustment".to_owned(),
            PaymentKind::Other(raw) if raw.trim().is_empty() => "Other".to_owned(),
            PaymentKind::Other(raw) => format!("Other ({raw})"),
        }
    }
}

impl From<&str> for PaymentKind {
    fn from(value: &str) -> Self {
        match normalize(value).as_str() {
            "salary" => PaymentKind::Salary,
            "advance" => PaymentKind::Advance,
            "travel" => PaymentKind::Travel,
            "bonus" => PaymentKind::Bonus,
            "discount" => PaymentKind::Discount,
            "vacation" => PaymentKind::Vacation,
            "leave" => PaymentKind::Leave,
            "reimbursement" => PaymentKind::Reimbursement,
            "salary_adjustment" => PaymentKind::SalaryAdjustment,
            _ => PaymentKind::Other(value.to_owned()),
        }
    }
}

impl From<String> for PaymentKind {
    fn from(value: String) -> Self {
        PaymentKind::from(value.as_str())
    }
}

impl From<PaymentKind> for String {
    fn from(value: PaymentKind) -> Self {
        value.slug().to_owned()
    }
}

impl Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Where a payment is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Waiting for approval.
    Pending,
    /// Approved and given a due date.
    Scheduled,
    /// Approved but not yet scheduled.
    Approved,
    /// Money has left the account.
    Paid,
    /// Will not be paid.
    Cancelled,
    /// Any status this crate does not know about, holding the raw value.
    Other(String),
}

impl PaymentStatus {
    /// The wire name of the status, e.g. "paid".
    pub fn slug(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Scheduled => "scheduled",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other(raw) => raw,
        }
    }

    /// A human readable name for tables.
    pub fn label(&self) -> String {
        match self {
            PaymentStatus::Pending => "Pending".to_owned(),
            PaymentStatus::Scheduled => "Scheduled".to_owned(),
            PaymentStatus::Approved => "Approved".to_owned(),
            PaymentStatus::Paid => "Paid".to_owned(),
            PaymentStatus::Cancelled => "Cancelled".to_owned(),
            PaymentStatus::Other(raw) if raw.trim().is_empty() => "Unknown".to_owned(),
            PaymentStatus::Other(raw) => format!("Unknown ({raw})"),
        }
    }

    /// Whether the payment is still owed, i.e. pending or approved.
    pub fn is_awaiting_payment(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Approved)
    }
}

impl From<&str> for PaymentStatus {
    fn from(value: &str) -> Self {
        match normalize(value).as_str() {
            "pending" => PaymentStatus::Pending,
            "scheduled" => PaymentStatus::Scheduled,
            "approved" => PaymentStatus::Approved,
            "paid" => PaymentStatus::Paid,
            "cancelled" | "canceled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Other(value.to_owned()),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        PaymentStatus::from(value.as_str())
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        value.slug().to_owned()
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// A payment to (or deduction from) a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Unique identifier assigned by the data source.
    pub id: String,
    /// The collaborator the payment belongs to.
    pub employee_id: String,
    /// Display name of the collaborator.
    pub employee_name: String,
    /// What the payment was for.
    pub kind: PaymentKind,
    /// The amount in euros. Expected to be non-negative.
    pub amount: f64,
    /// Where the payment is in its lifecycle.
    pub status: PaymentStatus,
    /// When the payment was made, absent for unpaid records.
    #[serde(default, with = "crate::payment::timestamp")]
    pub paid_at: Option<OffsetDateTime>,
    /// When the payment is due.
    #[serde(default, with = "crate::payment::timestamp")]
    pub due_at: Option<OffsetDateTime>,
}

impl PaymentRecord {
    /// The instant used to place the record in a time window.
    ///
    /// This is the payment date if there is one, otherwise the due date.
    pub fn timestamp(&self) -> Option<OffsetDateTime> {
        self.paid_at.or(self.due_at)
    }
}
