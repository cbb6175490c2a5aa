use tracing::{debug, trace};

use crate::config::{PlannerConfig, SplitQuantity};
use crate::matcher::{find_match, line_cost};
use crate::model::{
    BestOffer, BudgetAnalysis, ConsolidatedEntry, Recommendation, SupplierQuote, SupplierTotal,
};
use crate::money::UnitPrice;

/// Analyze with the default config (paper-ream rule, raw split quantities).
pub fn analyze(entries: &[ConsolidatedEntry], quotes: &[SupplierQuote]) -> Option<BudgetAnalysis> {
    analyze_with(entries, quotes, &PlannerConfig::default())
}

/// Compare exclusive single-supplier purchasing against the per-item split.
///
/// Returns `None` when there is no demand or no quote to analyze.
pub fn analyze_with(
    entries: &[ConsolidatedEntry],
    quotes: &[SupplierQuote],
    config: &PlannerConfig,
) -> Option<BudgetAnalysis> {
    if entries.is_empty() || quotes.is_empty() {
        return None;
    }

    let recommendations: Vec<Recommendation> = entries
        .iter()
        .map(|entry| recommend(entry, quotes, &config.unquoted_label))
        .collect();

    let supplier_totals: Vec<SupplierTotal> = quotes
        .iter()
        .map(|quote| exclusive_total(entries, quote, config))
        .collect();

    // Strict `<` keeps the earliest quote on ties.
    let mut best = &supplier_totals[0];
    for total in &supplier_totals[1..] {
        if total.total_cents < best.total_cents {
            best = total;
        }
    }

    let split_supplier_total_cents = entries
        .iter()
        .zip(&recommendations)
        .map(|(entry, rec)| split_cost(entry, rec, config))
        .fold(0, i64::saturating_add);

    debug!(
        entries = entries.len(),
        quotes = quotes.len(),
        best_global = %best.supplier,
        best_global_total = best.total_cents,
        split_total = split_supplier_total_cents,
        "budget analysis complete"
    );

    Some(BudgetAnalysis {
        best_global_supplier: best.supplier.clone(),
        best_global_total_cents: best.total_cents,
        split_supplier_total_cents,
        split_quantity: config.split_quantity,
        recommendations,
        supplier_totals,
    })
}

/// Cheapest unit price for one entry across all quotes.
fn recommend(entry: &ConsolidatedEntry, quotes: &[SupplierQuote], unquoted_label: &str) -> Recommendation {
    let mut offer = BestOffer::Unquoted;

    for (quote_index, quote) in quotes.iter().enumerate() {
        let Some(line) = find_match(entry, quote) else {
            continue;
        };
        let cheaper = match &offer {
            BestOffer::Unquoted => true,
            BestOffer::Quoted { unit_price, .. } => line.unit_price < *unit_price,
        };
        if cheaper {
            offer = BestOffer::Quoted {
                supplier: quote.supplier_name.clone(),
                quote_index,
                unit_price: line.unit_price,
            };
        }
    }

    let best_supplier = match &offer {
        BestOffer::Quoted { supplier, .. } => supplier.clone(),
        BestOffer::Unquoted => unquoted_label.to_string(),
    };
    trace!(item = %entry.display_name, supplier = %best_supplier, "best offer");

    Recommendation {
        item_name: entry.display_name.clone(),
        key: entry.key.clone(),
        best_supplier,
        offer,
    }
}

/// What buying every entry from `quote` alone would cost. Unquoted
/// entries contribute nothing.
fn exclusive_total(entries: &[ConsolidatedEntry], quote: &SupplierQuote, config: &PlannerConfig) -> SupplierTotal {
    let mut total_cents = 0;
    let mut matched_items = 0;

    for entry in entries {
        if let Some(line) = find_match(entry, quote) {
            total_cents = line_cost(entry, line.unit_price, &config.conversions).saturating_add(total_cents);
            matched_items += 1;
        }
    }

    SupplierTotal {
        quote_id: quote.id.clone(),
        supplier: quote.supplier_name.clone(),
        total_cents,
        matched_items,
        missing_items: entries.len() - matched_items,
    }
}

/// Cost of one recommendation under the configured split convention.
pub(crate) fn split_cost(entry: &ConsolidatedEntry, rec: &Recommendation, config: &PlannerConfig) -> i64 {
    let price: UnitPrice = rec.unit_price();
    match config.split_quantity {
        SplitQuantity::Raw => price.cost_cents(entry.total_quantity),
        SplitQuantity::Effective => line_cost(entry, price, &config.conversions),
    }
}
