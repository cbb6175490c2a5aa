use tracing::info;

use crate::analyze::analyze_with;
use crate::config::PlannerConfig;
use crate::consolidate::consolidate;
use crate::model::{PlanMeta, PlanResult, PlanSummary, SourceList, SupplierQuote};
use crate::partition::partition_with;

/// Run the whole pipeline over one snapshot of lists and quotes.
///
/// Consolidate, analyze, partition. Every stage is recomputed from the
/// inputs, so calling this again after any list or quote change is always
/// correct.
pub fn run(config: &PlannerConfig, lists: &[SourceList], quotes: &[SupplierQuote]) -> PlanResult {
    let consolidated = consolidate(lists);
    let analysis = analyze_with(&consolidated, quotes, config);

    let plan = match analysis {
        Some(ref a) => partition_with(&a.recommendations, &consolidated, config),
        None => Vec::new(),
    };

    let summary = PlanSummary {
        lists: lists.len(),
        items: lists.iter().map(|l| l.items.len()).sum(),
        entries: consolidated.len(),
        quotes: quotes.len(),
        unquoted_entries: analysis
            .as_ref()
            .map(|a| a.recommendations.iter().filter(|r| !r.offer.is_quoted()).count())
            .unwrap_or(consolidated.len()),
    };

    info!(
        plan = %config.name,
        entries = summary.entries,
        quotes = summary.quotes,
        analyzed = analysis.is_some(),
        "plan computed"
    );

    PlanResult {
        meta: PlanMeta {
            plan_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        consolidated,
        analysis,
        plan,
    }
}
