//! The fixed dataset served when no payment source is reachable.

use time::{OffsetDateTime, macros::datetime};

use crate::payment::{PaymentKind, PaymentRecord, PaymentStatus};

fn sample(
    id: &str,
    employee: (&str, &str),
    kind: PaymentKind,
    amount: f64,
    status: PaymentStatus,
    paid_at: Option<OffsetDateTime>,
    due_at: Option<OffsetDateTime>,
) -> PaymentRecord {
    PaymentRecord {
        id: id.to_owned(),
        employee_id: employee.0.to_owned(),
        employee_name: employee.1.to_owned(),
        kind,
        amount,
        status,
        paid_at,
        due_at,
    }
}

/// A small, fixed set of payments covering every status and the common kinds.
pub fn sample_payments() -> Vec<PaymentRecord> {
    const JOAO: (&str, &str) = ("EMP001", "João Silva");
    const MARIA: (&str, &str) = ("EMP002", "Maria Santos");
    const PEDRO: (&str, &str) = ("EMP003", "Pedro Costa");

    vec![
        sample(
            "PAY001",
            JOAO,
            PaymentKind::Salary,
            1200.0,
            PaymentStatus::Paid,
            Some(datetime!(2024-01-31 17:00 UTC)),
            Some(datetime!(2024-01-31 0:00 UTC)),
        ),
        sample(
            "PAY002",
            MARIA,
            PaymentKind::Salary,
            1350.0,
            PaymentStatus::Paid,
            Some(datetime!(2024-01-31 17:05 UTC)),
            Some(datetime!(2024-01-31 0:00 UTC)),
        ),
        sample(
            "PAY003",
            PEDRO,
            PaymentKind::Advance,
            300.0,
            PaymentStatus::Paid,
            Some(datetime!(2024-02-12 10:30 UTC)),
            None,
        ),
        sample(
            "PAY004",
            JOAO,
            PaymentKind::Travel,
            350.0,
            PaymentStatus::Approved,
            None,
            Some(datetime!(2024-02-20 0:00 UTC)),
        ),
        sample(
            "PAY005",
            MARIA,
            PaymentKind::Bonus,
            500.0,
            PaymentStatus::Scheduled,
            None,
            Some(datetime!(2024-02-29 0:00 UTC)),
        ),
        sample(
            "PAY006",
            PEDRO,
            PaymentKind::Salary,
            1100.0,
            PaymentStatus::Pending,
            None,
            Some(datetime!(2024-02-29 0:00 UTC)),
        ),
        sample(
            "PAY007",
            JOAO,
            PaymentKind::Discount,
            75.0,
            PaymentStatus::Paid,
            Some(datetime!(2024-02-29 17:00 UTC)),
            None,
        ),
        sample(
            "PAY008",
            MARIA,
            PaymentKind::Reimbursement,
            42.5,
            PaymentStatus::Cancelled,
            None,
            None,
        ),
    ]
}
