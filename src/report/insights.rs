//! Heuristic observations about a set of payments.
//!
//! Each rule looks at the payments on its own and either produces one message
//! or nothing. Rules never see each other's output, and the messages come out
//! in a fixed order.

use serde::Serialize;
use time::{Duration, Month, OffsetDateTime};

use crate::{
    payment::{PaymentKind, PaymentRecord, PaymentStatus},
    report::aggregation::CompensatedSum,
};

/// The limits the insight rules compare against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightThresholds {
    /// Average paid amount (in euros) above which payments are flagged as high.
    pub high_average_payment: f64,
    /// Share of paid payments, between 0 and 1, above which advances are a risk.
    pub advance_share: f64,
    /// Number of pending or approved payments above which the backlog is flagged.
    pub pending_backlog: usize,
    /// How far ahead to look for scheduled payments.
    pub upcoming_window: Duration,
}

impl InsightThresholds {
    /// The thresholds used by the dashboard.
    pub const DEFAULT: InsightThresholds = InsightThresholds {
        high_average_payment: 800.0,
        advance_share: 0.30,
        pending_backlog: 5,
        upcoming_window: Duration::days(7),
    };
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The rule that produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightRule {
    /// The average paid amount is above the reference value.
    HighAveragePayment,
    /// Advances are a large share of the paid payments.
    AdvanceConcentration,
    /// Many payments are waiting to be paid.
    PendingBacklog,
    /// Scheduled payments fall due soon.
    UpcomingScheduled,
    /// It is December, when the 13th-month salary is due.
    YearEndBonus,
}

/// How much attention an insight needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth knowing.
    Info,
    /// Worth acting on.
    Warning,
}

impl InsightRule {
    /// How much attention insights from this rule need.
    pub fn severity(self) -> Severity {
        match self {
            InsightRule::AdvanceConcentration | InsightRule::PendingBacklog => Severity::Warning,
            InsightRule::HighAveragePayment
            | InsightRule::UpcomingScheduled
            | InsightRule::YearEndBonus => Severity::Info,
        }
    }
}

/// One observation about the payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// The rule that produced the observation.
    pub rule: InsightRule,
    /// How much attention the observation needs.
    pub severity: Severity,
    /// The observation as a sentence.
    pub message: String,
}

type RuleFn = fn(&[PaymentRecord], OffsetDateTime, &InsightThresholds) -> Option<String>;

/// The rules in evaluation order.
const RULES: [(InsightRule, RuleFn); 5] = [
    (InsightRule::HighAveragePayment, high_average_payment),
    (InsightRule::AdvanceConcentration, advance_concentration),
    (InsightRule::PendingBacklog, pending_backlog),
    (InsightRule::UpcomingScheduled, upcoming_scheduled),
    (InsightRule::YearEndBonus, year_end_bonus),
];

/// Evaluates every rule with the default thresholds at the instant `now`.
pub fn generate_insights(records: &[PaymentRecord], now: OffsetDateTime) -> Vec<Insight> {
    generate_insights_with(records, now, &InsightThresholds::DEFAULT)
}

/// Evaluates every rule with `thresholds` at the instant `now`.
pub fn generate_insights_with(
    records: &[PaymentRecord],
    now: OffsetDateTime,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    RULES
        .iter()
        .filter_map(|(rule, evaluate)| {
            evaluate(records, now, thresholds).map(|message| Insight {
                rule: *rule,
                severity: rule.severity(),
                message,
            })
        })
        .collect()
}

/// The messages from [generate_insights], without the rule metadata.
pub fn insight_messages(records: &[PaymentRecord], now: OffsetDateTime) -> Vec<String> {
    generate_insights(records, now)
        .into_iter()
        .map(|insight| insight.message)
        .collect()
}

fn format_euros(amount: f64) -> String {
    format!("€{amount:.2}")
}

fn paid(records: &[PaymentRecord]) -> impl Iterator<Item = &PaymentRecord> {
    records
        .iter()
        .filter(|record| record.status == PaymentStatus::Paid)
}

fn high_average_payment(
    records: &[PaymentRecord],
    _now: OffsetDateTime,
    thresholds: &InsightThresholds,
) -> Option<String> {
    let (sum, count) = paid(records).fold(
        (CompensatedSum::default(), 0usize),
        |(mut sum, count), record| {
            sum.add(record.amount);
            (sum, count + 1)
        },
    );

    if count == 0 {
        return None;
    }

    let average = sum.value() / count as f64;

    (average > thresholds.high_average_payment).then(|| {
        format!(
            "High average payment: paid payments average {}, above the {} reference.",
            format_euros(average),
            format_euros(thresholds.high_average_payment)
        )
    })
}

fn advance_concentration(
    records: &[PaymentRecord],
    _now: OffsetDateTime,
    thresholds: &InsightThresholds,
) -> Option<String> {
    let (advances, total) = paid(records).fold((0usize, 0usize), |(advances, total), record| {
        let is_advance = record.kind == PaymentKind::Advance;
        (advances + usize::from(is_advance), total + 1)
    });

    if total == 0 {
        return None;
    }

    let share = advances as f64 / total as f64;

    (share > thresholds.advance_share).then(|| {
        format!(
            "Cash-flow risk: advances are {:.0}% of paid payments ({advances} of {total}).",
            share * 100.0
        )
    })
}

fn pending_backlog(
    records: &[PaymentRecord],
    _now: OffsetDateTime,
    thresholds: &InsightThresholds,
) -> Option<String> {
    let awaiting: Vec<_> = records
        .iter()
        .filter(|record| record.status.is_awaiting_payment())
        .collect();

    if awaiting.len() <= thresholds.pending_backlog {
        return None;
    }

    let total: CompensatedSum = awaiting.iter().map(|record| record.amount).collect();

    Some(format!(
        "{} payments are pending or approved, totalling {}.",
        awaiting.len(),
        format_euros(total.value())
    ))
}

fn upcoming_scheduled(
    records: &[PaymentRecord],
    now: OffsetDateTime,
    thresholds: &InsightThresholds,
) -> Option<String> {
    let horizon = now + thresholds.upcoming_window;
    let count = records
        .iter()
        .filter(|record| record.status == PaymentStatus::Scheduled)
        .filter_map(|record| record.due_at)
        .filter(|due_at| now <= *due_at && *due_at <= horizon)
        .count();

    let days = thresholds.upcoming_window.whole_days();

    match count {
        0 => None,
        1 => Some(format!(
            "1 scheduled payment is due in the next {days} days."
        )),
        _ => Some(format!(
            "{count} scheduled payments are due in the next {days} days."
        )),
    }
}

fn year_end_bonus(
    _records: &[PaymentRecord],
    now: OffsetDateTime,
    _thresholds: &InsightThresholds,
) -> Option<String> {
    (now.month() == Month::December).then(|| {
        "December: remember to budget for the 13th-month salary.".to_owned()
    })
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::payment::{PaymentKind, PaymentRecord, PaymentStatus};

    use super::{
        InsightRule, InsightThresholds, Severity, generate_insights, generate_insights_with,
        insight_messages,
    };

    const NOW: OffsetDateTime = datetime!(2024-06-12 10:00 UTC);
    const DECEMBER: OffsetDateTime = datetime!(2024-12-05 10:00 UTC);

    fn create_test_record(kind: PaymentKind, amount: f64, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            id: format!("{kind}-{status}-{amount}"),
            employee_id: "EMP002".to_owned(),
            employee_name: "Maria Santos".to_owned(),
            kind,
            amount,
            status,
            paid_at: None,
            due_at: None,
        }
    }

    fn paid_records(advances: usize, total: usize) -> Vec<PaymentRecord> {
        (0..total)
            .map(|i| {
                let kind = if i < advances {
                    PaymentKind::Advance
                } else {
                    PaymentKind::Salary
                };
                create_test_record(kind, 100.0, PaymentStatus::Paid)
            })
            .collect()
    }

    fn rules(records: &[PaymentRecord], now: OffsetDateTime) -> Vec<InsightRule> {
        generate_insights(records, now)
            .into_iter()
            .map(|insight| insight.rule)
            .collect()
    }

    #[test]
    fn no_insights_for_empty_records_outside_december() {
        assert!(generate_insights(&[], NOW).is_empty());
    }

    #[test]
    fn high_average_payment_reports_the_average() {
        let records = vec![
            create_test_record(PaymentKind::Salary, 1000.0, PaymentStatus::Paid),
            create_test_record(PaymentKind::Salary, 900.0, PaymentStatus::Paid),
            // Unpaid records are not part of the average.
            create_test_record(PaymentKind::Salary, 10.0, PaymentStatus::Pending),
        ];

        let insights = generate_insights(&records, NOW);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].rule, InsightRule::HighAveragePayment);
        assert!(insights[0].message.contains("€950.00"), "{}", insights[0].message);
    }

    #[test]
    fn average_equal_to_threshold_is_not_high() {
        let records = vec![create_test_record(
            PaymentKind::Salary,
            800.0,
            PaymentStatus::Paid,
        )];

        assert!(generate_insights(&records, NOW).is_empty());
    }

    #[test]
    fn warns_when_advances_exceed_thirty_percent_of_paid() {
        let insights = generate_insights(&paid_records(4, 10), NOW);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].rule, InsightRule::AdvanceConcentration);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].message.contains("40%"));
        assert!(insights[0].message.contains("4 of 10"));
    }

    #[test]
    fn no_warning_when_advances_are_twenty_percent_of_paid() {
        assert!(rules(&paid_records(2, 10), NOW).is_empty());
    }

    #[test]
    fn no_warning_when_advances_are_exactly_thirty_percent() {
        assert!(rules(&paid_records(3, 10), NOW).is_empty());
    }

    #[test]
    fn unpaid_advances_do_not_count_towards_the_share() {
        let mut records = paid_records(0, 10);
        records.extend(
            (0..5).map(|_| create_test_record(PaymentKind::Advance, 50.0, PaymentStatus::Cancelled)),
        );

        assert!(rules(&records, NOW).is_empty());
    }

    #[test]
    fn pending_backlog_counts_pending_and_approved() {
        let mut records: Vec<_> = (0..3)
            .map(|_| create_test_record(PaymentKind::Travel, 100.0, PaymentStatus::Pending))
            .collect();
        records.extend(
            (0..3).map(|_| create_test_record(PaymentKind::Bonus, 50.0, PaymentStatus::Approved)),
        );

        let insights = generate_insights(&records, NOW);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].rule, InsightRule::PendingBacklog);
        assert_eq!(
            insights[0].message,
            "6 payments are pending or approved, totalling €450.00."
        );
    }

    #[test]
    fn five_pending_payments_are_not_a_backlog() {
        let records: Vec<_> = (0..5)
            .map(|_| create_test_record(PaymentKind::Travel, 100.0, PaymentStatus::Pending))
            .collect();

        assert!(rules(&records, NOW).is_empty());
    }

    #[test]
    fn reminds_about_scheduled_payments_due_within_a_week() {
        let scheduled = |due_at| PaymentRecord {
            due_at: Some(due_at),
            ..create_test_record(PaymentKind::Salary, 100.0, PaymentStatus::Scheduled)
        };
        let records = vec![
            scheduled(NOW + Duration::days(1)),
            scheduled(NOW + Duration::days(7)),
            // Too far ahead.
            scheduled(NOW + Duration::days(8)),
            // Already overdue.
            scheduled(NOW - Duration::days(1)),
        ];

        let insights = generate_insights(&records, NOW);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].rule, InsightRule::UpcomingScheduled);
        assert_eq!(
            insights[0].message,
            "2 scheduled payments are due in the next 7 days."
        );
    }

    #[test]
    fn no_reminder_without_upcoming_scheduled_payments() {
        let records = vec![PaymentRecord {
            due_at: Some(NOW + Duration::days(2)),
            ..create_test_record(PaymentKind::Salary, 100.0, PaymentStatus::Approved)
        }];

        assert!(!rules(&records, NOW).contains(&InsightRule::UpcomingScheduled));
    }

    #[test]
    fn december_always_adds_the_thirteenth_month_note() {
        let messages = insight_messages(&[], DECEMBER);

        assert_eq!(
            messages,
            vec!["December: remember to budget for the 13th-month salary."]
        );
    }

    #[test]
    fn insights_follow_rule_order() {
        let mut records = paid_records(5, 5);
        records[0].amount = 5000.0;
        records.extend(
            (0..6).map(|_| create_test_record(PaymentKind::Travel, 10.0, PaymentStatus::Pending)),
        );
        records.push(PaymentRecord {
            due_at: Some(DECEMBER + Duration::days(3)),
            ..create_test_record(PaymentKind::Salary, 100.0, PaymentStatus::Scheduled)
        });

        assert_eq!(
            rules(&records, DECEMBER),
            vec![
                InsightRule::HighAveragePayment,
                InsightRule::AdvanceConcentration,
                InsightRule::PendingBacklog,
                InsightRule::UpcomingScheduled,
                InsightRule::YearEndBonus,
            ]
        );
    }

    #[test]
    fn insights_are_idempotent() {
        let records = paid_records(4, 10);

        assert_eq!(
            generate_insights(&records, DECEMBER),
            generate_insights(&records, DECEMBER)
        );
    }

    #[test]
    fn custom_thresholds_change_the_outcome() {
        let thresholds = InsightThresholds {
            advance_share: 0.10,
            ..InsightThresholds::DEFAULT
        };

        let insights = generate_insights_with(&paid_records(2, 10), NOW, &thresholds);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].rule, InsightRule::AdvanceConcentration);
    }
}
