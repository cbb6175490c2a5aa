use serde::Serialize;

use crate::matcher::find_match;
use crate::model::{ConsolidatedEntry, SupplierQuote};
use crate::money::UnitPrice;

/// Side-by-side unit prices for every quote, one row per entry.
#[derive(Debug, Clone, Serialize)]
pub struct PriceMatrix {
    pub suppliers: Vec<String>,
    pub rows: Vec<PriceRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub item_name: String,
    pub total_quantity: u64,
    /// Unit price per quote, aligned with `PriceMatrix::suppliers`.
    pub prices: Vec<Option<UnitPrice>>,
    pub best_price: Option<UnitPrice>,
    /// Indices of every quote offering `best_price`.
    pub best_quotes: Vec<usize>,
}

/// Build the comparison matrix for entries whose name contains `term`
/// (case-insensitive). An empty or blank term selects every entry.
pub fn price_matrix(entries: &[ConsolidatedEntry], quotes: &[SupplierQuote], term: &str) -> PriceMatrix {
    let needle = term.trim().to_lowercase();

    let rows = entries
        .iter()
        .filter(|e| needle.is_empty() || e.display_name.to_lowercase().contains(&needle))
        .map(|entry| {
            let prices: Vec<Option<UnitPrice>> = quotes
                .iter()
                .map(|q| find_match(entry, q).map(|line| line.unit_price))
                .collect();
            let best_price = prices.iter().flatten().copied().min();
            let best_quotes = match best_price {
                Some(best) => prices
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| **p == Some(best))
                    .map(|(i, _)| i)
                    .collect(),
                None => Vec::new(),
            };
            PriceRow {
                item_name: entry.display_name.clone(),
                total_quantity: entry.total_quantity,
                prices,
                best_price,
                best_quotes,
            }
        })
        .collect();

    PriceMatrix {
        suppliers: quotes.iter().map(|q| q.supplier_name.clone()).collect(),
        rows,
    }
}
