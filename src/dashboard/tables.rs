//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    html::{BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    payment::{PaymentKind, PaymentRecord},
    report::{Aggregate, status_color},
};

const TABLE_STYLE: &str = "w-full text-sm text-left text-gray-500 dark:text-gray-400";
const AMOUNT_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";

/// Renders the totals and counts per payment kind, with a grand total row.
pub(super) fn kind_breakdown_table(by_kind: &Aggregate<PaymentKind>) -> Markup {
    html! {
        div id="kind-breakdown"
        {
            h3 class="text-xl font-semibold mb-4" { "Breakdown by kind" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Payments" }
                            th scope="col" class=(AMOUNT_CELL_STYLE) { "Total" }
                        }
                    }

                    tbody
                    {
                        @for bucket in by_kind.buckets() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class=(TABLE_CELL_STYLE)
                                {
                                    span
                                        class="inline-block w-3 h-3 mr-2 rounded-sm"
                                        style=(format!("background-color: {}", bucket.color))
                                    {}
                                    (bucket.label)
                                }
                                td class=(TABLE_CELL_STYLE) { (bucket.count) }
                                td class=(AMOUNT_CELL_STYLE) { (format_currency(bucket.total)) }
                            }
                        }
                    }

                    tfoot
                    {
                        tr class="font-semibold text-gray-900 dark:text-white"
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                            td class=(TABLE_CELL_STYLE) { (by_kind.record_count()) }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(by_kind.grand_total())) }
                        }
                    }
                }
            }
        }
    }
}

/// Renders every payment, most recent first.
pub(super) fn payments_table(payments: &[PaymentRecord]) -> Markup {
    let mut payments: Vec<_> = payments.iter().collect();
    payments.sort_by(|a, b| {
        b.timestamp()
            .cmp(&a.timestamp())
            .then_with(|| a.id.cmp(&b.id))
    });

    html! {
        div id="payments"
        {
            h3 class="text-xl font-semibold mb-4" { "Payments" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Collaborator" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(AMOUNT_CELL_STYLE) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for payment in payments {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (payment.id) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (payment.employee_name)
                                    " "
                                    span class="text-xs text-gray-400" { "(" (payment.employee_id) ")" }
                                }
                                td class=(TABLE_CELL_STYLE) { (payment.kind.label()) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span
                                        class=(BADGE_STYLE)
                                        style=(format!(
                                            "color: white; background-color: {}",
                                            status_color(payment.status.slug())
                                        ))
                                    {
                                        (payment.status.label())
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @match payment.timestamp() {
                                        Some(timestamp) => (timestamp.date().to_string()),
                                        None => "-",
                                    }
                                }
                                td class=(AMOUNT_CELL_STYLE) { (format_currency(payment.amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}
