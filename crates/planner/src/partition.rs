use std::collections::HashMap;

use crate::analyze::split_cost;
use crate::config::PlannerConfig;
use crate::model::{ConsolidatedEntry, PlanLine, Recommendation, StoreGroup};

/// Group recommendations into per-store pick lists (default config).
pub fn partition_by_supplier(
    recommendations: &[Recommendation],
    entries: &[ConsolidatedEntry],
) -> Vec<StoreGroup> {
    partition_with(recommendations, entries, &PlannerConfig::default())
}

/// Group recommendations by winning supplier, in first-seen group order.
///
/// Line costs follow the configured split convention so the subtotals add
/// up to the analysis split total. A recommendation with no backing entry
/// is still listed, with no quantity and zero cost.
pub fn partition_with(
    recommendations: &[Recommendation],
    entries: &[ConsolidatedEntry],
    config: &PlannerConfig,
) -> Vec<StoreGroup> {
    let by_key: HashMap<&str, &ConsolidatedEntry> =
        entries.iter().map(|e| (e.key.as_str(), e)).collect();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<StoreGroup> = Vec::new();

    for rec in recommendations {
        let entry = by_key.get(rec.key.as_str()).copied();
        let line = PlanLine {
            recommendation: rec.clone(),
            quantity: entry.map(|e| e.total_quantity),
            cost_cents: entry.map(|e| split_cost(e, rec, config)).unwrap_or(0),
        };

        let pos = *index.entry(rec.best_supplier.as_str()).or_insert_with(|| {
            groups.push(StoreGroup {
                supplier: rec.best_supplier.clone(),
                lines: Vec::new(),
                subtotal_cents: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[pos];
        group.subtotal_cents = group.subtotal_cents.saturating_add(line.cost_cents);
        group.lines.push(line);
    }

    groups
}
