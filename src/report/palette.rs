//! Display colors for report buckets.

/// The color given to any key that has no entry in the lookup tables.
pub const FALLBACK_COLOR: &str = "#9CA3AF";

/// Colors for payment kinds, keyed by the kind's wire name.
const KIND_COLORS: [(&str, &str); 9] = [
    ("salary", "#3B82F6"),
    ("advance", "#F59E0B"),
    ("travel", "#10B981"),
    ("bonus", "#8B5CF6"),
    ("discount", "#EF4444"),
    ("vacation", "#06B6D4"),
    ("leave", "#84CC16"),
    ("reimbursement", "#EC4899"),
    ("salary_adjustment", "#6366F1"),
];

/// Colors for payment statuses, keyed by the status' wire name.
const STATUS_COLORS: [(&str, &str); 5] = [
    ("pending", "#F59E0B"),
    ("scheduled", "#3B82F6"),
    ("approved", "#8B5CF6"),
    ("paid", "#10B981"),
    ("cancelled", "#6B7280"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> &'static str {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// The color for a payment kind's wire name, e.g. "salary".
pub fn kind_color(key: &str) -> &'static str {
    lookup(&KIND_COLORS, key)
}

/// The color for a payment status' wire name, e.g. "paid".
pub fn status_color(key: &str) -> &'static str {
    lookup(&STATUS_COLORS, key)
}
