use tracing::trace;

use crate::config::ConversionRule;
use crate::model::{ConsolidatedEntry, QuoteLine, SupplierQuote};
use crate::money::UnitPrice;
use crate::normalize::normalize;

/// First line of `quote` naming the same good as `entry`, if any.
pub fn find_match<'q>(entry: &ConsolidatedEntry, quote: &'q SupplierQuote) -> Option<&'q QuoteLine> {
    find_line(&entry.key, &quote.items)
}

fn find_line<'q>(key: &str, lines: &'q [QuoteLine]) -> Option<&'q QuoteLine> {
    lines.iter().find(|line| normalize(&line.item_name) == key)
}

/// Quantity to multiply a matched unit price by.
///
/// The first conversion rule that applies turns the demanded quantity into
/// a pack count; otherwise the consolidated quantity is used unchanged.
/// Only money totals go through this. Unit prices are compared raw.
pub fn effective_quantity(
    entry: &ConsolidatedEntry,
    unit_price: UnitPrice,
    rules: &[ConversionRule],
) -> u64 {
    match rules
        .iter()
        .find(|r| r.applies(&entry.display_name, entry.total_quantity, unit_price))
    {
        Some(rule) => {
            let packs = rule.packs_for(entry.total_quantity);
            trace!(
                item = %entry.display_name,
                rule = %rule.name,
                quantity = entry.total_quantity,
                packs,
                "pack conversion applied"
            );
            packs
        }
        None => entry.total_quantity,
    }
}

/// Money total in cents for buying `entry` at `unit_price`. Saturates.
pub fn line_cost(entry: &ConsolidatedEntry, unit_price: UnitPrice, rules: &[ConversionRule]) -> i64 {
    unit_price.cost_cents(effective_quantity(entry, unit_price, rules))
}

/// Total a quote is worth against the current demand table.
///
/// Lines naming a good nobody asked for contribute nothing. This is the
/// value snapshotted into `SupplierQuote::total_value_cents` at save time.
pub fn quote_total(entries: &[ConsolidatedEntry], lines: &[QuoteLine], rules: &[ConversionRule]) -> i64 {
    lines
        .iter()
        .filter_map(|line| {
            let key = normalize(&line.item_name);
            entries
                .iter()
                .find(|e| e.key == key)
                .map(|entry| line_cost(entry, line.unit_price, rules))
        })
        .fold(0, i64::saturating_add)
}

impl SupplierQuote {
    /// Copy of this quote with `total_value_cents` re-snapshotted.
    pub fn with_snapshot_total(mut self, entries: &[ConsolidatedEntry], rules: &[ConversionRule]) -> Self {
        self.total_value_cents = quote_total(entries, &self.items, rules);
        self
    }
}
