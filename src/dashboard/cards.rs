//! Card components for the headline metrics and insights.
//!
//! Each metric card shows the total for the current period and how it moved
//! since the previous period. Whether a move is good depends on the card's
//! category: more income is good, more expense is not.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, format_currency, format_percent_change},
    report::{Insight, MetricCard, MetricCategory, Severity},
};

const CHANGE_UP_GOOD_STYLE: &str = "text-sm font-medium text-green-600 dark:text-green-400";
const CHANGE_UP_BAD_STYLE: &str = "text-sm font-medium text-red-600 dark:text-red-400";
const CHANGE_NEUTRAL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";

/// The colour for a percent change, given whether the metric is income or expense.
fn change_style(percent_change: f64, category: MetricCategory) -> &'static str {
    if percent_change.round() == 0.0 {
        return CHANGE_NEUTRAL_STYLE;
    }

    let went_up = percent_change > 0.0;

    match (category, went_up) {
        (MetricCategory::Income, true) | (MetricCategory::Expense, false) => CHANGE_UP_GOOD_STYLE,
        (MetricCategory::Income, false) | (MetricCategory::Expense, true) => CHANGE_UP_BAD_STYLE,
    }
}

/// Renders the grid of metric cards.
pub(super) fn metric_cards_view(cards: &[MetricCard]) -> Markup {
    html! {
        section id="metric-cards" class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-4"
            {
                @for card in cards {
                    (metric_card(card))
                }
            }
        }
    }
}

fn metric_card(card: &MetricCard) -> Markup {
    html! {
        div class={(CARD_STYLE) " flex flex-col justify-between"} data-category=(category_name(card.category))
        {
            h4 class="text-lg font-semibold mb-2 truncate" title=(card.title) { (card.title) }

            div class="text-3xl font-bold mb-1" { (format_currency(card.value)) }

            @match card.percent_change {
                Some(change) => {
                    div class=(change_style(change, card.category))
                    {
                        (format_percent_change(change)) " vs. previous period"
                    }
                }
                None => {
                    div class=(CHANGE_NEUTRAL_STYLE) { "No previous data" }
                }
            }

            div class="text-xs text-gray-500 dark:text-gray-400 mt-2" { (card.period.label()) }
        }
    }
}

fn category_name(category: MetricCategory) -> &'static str {
    match category {
        MetricCategory::Income => "income",
        MetricCategory::Expense => "expense",
    }
}

fn insight_style(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "p-3 rounded-lg border border-amber-300 bg-amber-50 \
            text-amber-900 dark:bg-amber-900/30 dark:text-amber-100",
        Severity::Info => "p-3 rounded-lg border border-blue-200 bg-blue-50 \
            text-blue-900 dark:bg-blue-900/30 dark:text-blue-100",
    }
}

/// Renders the insight messages, or nothing if there are none.
pub(super) fn insights_view(insights: &[Insight]) -> Markup {
    if insights.is_empty() {
        return html! {};
    }

    html! {
        section id="insights" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Insights" }

            ul class="space-y-2"
            {
                @for insight in insights {
                    li class=(insight_style(insight.severity)) { (insight.message) }
                }
            }
        }
    }
}
