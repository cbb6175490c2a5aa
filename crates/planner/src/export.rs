use serde::Serialize;

use crate::analyze::split_cost;
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::model::{BudgetAnalysis, ConsolidatedEntry};
use crate::money::{format_cents, UnitPrice};

/// Column labels of the purchasing plan export, as the household reads it.
pub const CSV_HEADER: [&str; 5] = [
    "Item",
    "Melhor Fornecedor",
    "Preco Unitario",
    "Quantidade Total",
    "Custo Total",
];

/// One row of the purchasing plan export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRow {
    pub item: String,
    pub best_supplier: String,
    pub unit_price: UnitPrice,
    pub total_quantity: u64,
    pub total_cost_cents: i64,
}

/// Flatten the analysis into export rows, in recommendation order.
pub fn plan_rows(analysis: &BudgetAnalysis, entries: &[ConsolidatedEntry], config: &PlannerConfig) -> Vec<PlanRow> {
    analysis
        .recommendations
        .iter()
        .map(|rec| {
            let entry = entries.iter().find(|e| e.key == rec.key);
            PlanRow {
                item: rec.item_name.clone(),
                best_supplier: rec.best_supplier.clone(),
                unit_price: rec.unit_price(),
                total_quantity: entry.map(|e| e.total_quantity).unwrap_or(0),
                total_cost_cents: entry.map(|e| split_cost(e, rec, config)).unwrap_or(0),
            }
        })
        .collect()
}

/// Render rows as CSV text with a header line.
pub fn to_csv(rows: &[PlanRow]) -> Result<String, PlanError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| PlanError::Io(e.to_string()))?;
    for row in rows {
        writer
            .write_record([
                row.item.as_str(),
                row.best_supplier.as_str(),
                &row.unit_price.to_string(),
                &row.total_quantity.to_string(),
                &format_cents(row.total_cost_cents),
            ])
            .map_err(|e| PlanError::Io(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PlanError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PlanError::Io(e.to_string()))
}
