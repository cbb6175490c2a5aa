use std::path::PathBuf;

use supplyplan_planner::compare::price_matrix;
use supplyplan_planner::config::{PlannerConfig, SplitQuantity};
use supplyplan_planner::export::{plan_rows, to_csv};
use supplyplan_planner::input::{LoadedInput, PlanInput};
use supplyplan_planner::model::{BestOffer, PlanResult};
use supplyplan_planner::money::UnitPrice;
use supplyplan_planner::{consolidate, run};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(name: &str, config: &PlannerConfig) -> LoadedInput {
    PlanInput::read(&fixtures_dir().join(name))
        .unwrap()
        .load(config)
        .unwrap()
}

fn load_and_run(name: &str, config: &PlannerConfig) -> PlanResult {
    let input = load(name, config);
    run(config, &input.lists, &input.quotes)
}

fn effective_config() -> PlannerConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join("effective.config.toml")).unwrap();
    PlannerConfig::from_toml(&toml).unwrap()
}

// -------------------------------------------------------------------------
// Two lists, two suppliers
// -------------------------------------------------------------------------

#[test]
fn consolidates_across_children() {
    let result = load_and_run("back-to-school.plan.toml", &PlannerConfig::default());
    let names: Vec<_> = result
        .consolidated
        .iter()
        .map(|e| (e.display_name.as_str(), e.total_quantity))
        .collect();
    assert_eq!(names, vec![("Lápis", 5), ("Borracha", 1)]);
    assert_eq!(result.summary.lists, 2);
    assert_eq!(result.summary.items, 3);
}

#[test]
fn exclusive_supplier_can_beat_split() {
    let result = load_and_run("back-to-school.plan.toml", &PlannerConfig::default());
    let a = result.analysis.unwrap();

    assert_eq!(a.supplier_totals[0].total_cents, 700);
    assert_eq!(a.supplier_totals[1].total_cents, 400);
    assert_eq!(a.best_global_supplier, "SupplierB");
    assert_eq!(a.best_global_total_cents, 400);

    assert_eq!(a.recommendations[0].best_supplier, "SupplierB");
    assert_eq!(a.recommendations[1].best_supplier, "SupplierA");
    assert_eq!(a.split_supplier_total_cents, 600);

    // The single supplier skips the eraser entirely, so it looks cheaper.
    assert!(!a.split_beats_exclusive());
    assert_eq!(a.savings_cents(), -200);
}

#[test]
fn shopping_plan_groups_by_store() {
    let result = load_and_run("back-to-school.plan.toml", &PlannerConfig::default());
    let stores: Vec<_> = result
        .plan
        .iter()
        .map(|g| (g.supplier.as_str(), g.subtotal_cents))
        .collect();
    assert_eq!(stores, vec![("SupplierB", 400), ("SupplierA", 200)]);
    assert_eq!(result.plan[0].lines[0].quantity, Some(5));
}

#[test]
fn snapshot_totals_taken_at_load() {
    let input = load("back-to-school.plan.toml", &PlannerConfig::default());
    assert_eq!(input.quotes[0].total_value_cents, 700);
    assert_eq!(input.quotes[1].total_value_cents, 400);
}

#[test]
fn snapshot_not_resynced_when_lists_change() {
    let config = PlannerConfig::default();
    let mut input = load("back-to-school.plan.toml", &config);
    input.lists[0].items[0].quantity = 20;

    let result = run(&config, &input.lists, &input.quotes);
    let a = result.analysis.unwrap();
    // live totals follow the new demand, stored snapshots do not
    assert_eq!(a.supplier_totals[0].total_cents, 2300 + 200);
    assert_eq!(input.quotes[0].total_value_cents, 700);
}

#[test]
fn rerun_is_deterministic() {
    let config = PlannerConfig::default();
    let input = load("back-to-school.plan.toml", &config);
    let first = run(&config, &input.lists, &input.quotes);
    let second = run(&config, &input.lists, &input.quotes);
    assert_eq!(first.consolidated, second.consolidated);
    assert_eq!(first.analysis, second.analysis);
    assert_eq!(first.plan, second.plan);
}

// -------------------------------------------------------------------------
// Paper reams
// -------------------------------------------------------------------------

#[test]
fn ream_quotes_compare_in_packs() {
    let result = load_and_run("paper.plan.toml", &PlannerConfig::default());
    let a = result.analysis.unwrap();
    // 750 sheets -> 2 reams
    assert_eq!(a.supplier_totals[0].total_cents, 2 * 2490 + 2 * 1200);
    assert_eq!(a.supplier_totals[1].total_cents, 2 * 2250 + 2 * 1500);
    assert_eq!(a.best_global_supplier, "Atacado");
    assert_eq!(a.recommendations[0].best_supplier, "Bairro");
    assert_eq!(a.recommendations[1].best_supplier, "Atacado");
}

#[test]
fn raw_split_convention_is_pinned() {
    let result = load_and_run("paper.plan.toml", &PlannerConfig::default());
    let a = result.analysis.unwrap();
    assert_eq!(a.split_quantity, SplitQuantity::Raw);
    assert_eq!(a.split_supplier_total_cents, 2250 * 750 + 1200 * 2);
    assert!(!a.split_beats_exclusive());
}

#[test]
fn effective_split_convention_is_pinned() {
    let config = effective_config();
    let result = load_and_run("paper.plan.toml", &config);
    assert_eq!(result.meta.plan_name, "Paper run");
    let a = result.analysis.unwrap();
    assert_eq!(a.split_quantity, SplitQuantity::Effective);
    assert_eq!(a.split_supplier_total_cents, 2 * 2250 + 2 * 1200);
    assert!(a.split_beats_exclusive());
    assert_eq!(a.savings_cents(), 7380 - 6900);

    let subtotal: i64 = result.plan.iter().map(|g| g.subtotal_cents).sum();
    assert_eq!(subtotal, a.split_supplier_total_cents);
}

#[test]
fn paper_snapshot_uses_packs() {
    let input = load("paper.plan.toml", &PlannerConfig::default());
    assert_eq!(input.quotes[0].total_value_cents, 7380);
    assert_eq!(input.quotes[1].total_value_cents, 7500);
}

#[test]
fn disabling_rules_restores_sheet_math() {
    let config = PlannerConfig::from_toml("conversion = []").unwrap();
    let result = load_and_run("paper.plan.toml", &config);
    let a = result.analysis.unwrap();
    assert_eq!(a.supplier_totals[0].total_cents, 2490 * 750 + 1200 * 2);
}

/// Split should never cost more than the best single supplier when every
/// supplier quotes every item and no pack conversion is involved.
#[test]
fn split_never_worse_with_full_coverage() {
    let input = PlanInput::from_toml(
        r#"
[[lists]]
items = [ { name = "Lápis", quantity = 10 }, { name = "Cola", quantity = 3 } ]

[[quotes]]
supplier_name = "A"
items = [ { item_name = "Lápis", unit_price = "0.50" }, { item_name = "Cola", unit_price = "4.00" } ]

[[quotes]]
supplier_name = "B"
items = [ { item_name = "Lápis", unit_price = "0.70" }, { item_name = "Cola", unit_price = "2.50" } ]
"#,
    )
    .unwrap()
    .load(&PlannerConfig::default())
    .unwrap();
    let result = run(&PlannerConfig::default(), &input.lists, &input.quotes);
    let a = result.analysis.unwrap();
    assert!(
        a.split_beats_exclusive(),
        "split {} > exclusive {}",
        a.split_supplier_total_cents,
        a.best_global_total_cents
    );
    assert_eq!(a.split_supplier_total_cents, 500 + 750);
}

// -------------------------------------------------------------------------
// Comparison + export
// -------------------------------------------------------------------------

#[test]
fn comparison_matrix_for_search_term() {
    let config = PlannerConfig::default();
    let input = load("back-to-school.plan.toml", &config);
    let entries = consolidate(&input.lists);
    let m = price_matrix(&entries, &input.quotes, "lap");
    assert!(m.rows.is_empty(), "accented names do not match unaccented terms");

    let m = price_matrix(&entries, &input.quotes, "láp");
    assert_eq!(m.rows.len(), 1);
    assert_eq!(
        m.rows[0].prices,
        vec![Some(UnitPrice::from_cents(100)), Some(UnitPrice::from_cents(80))]
    );
    assert_eq!(m.rows[0].best_quotes, vec![1]);
}

#[test]
fn csv_export_follows_recommendations() {
    let config = PlannerConfig::default();
    let result = load_and_run("back-to-school.plan.toml", &config);
    let analysis = result.analysis.as_ref().unwrap();
    let csv = to_csv(&plan_rows(analysis, &result.consolidated, &config)).unwrap();
    assert_eq!(
        csv,
        "Item,Melhor Fornecedor,Preco Unitario,Quantidade Total,Custo Total\n\
         Lápis,SupplierB,0.80,5,4.00\n\
         Borracha,SupplierA,2.00,1,2.00\n"
    );
}

#[test]
fn result_serializes_with_tagged_offers() {
    let result = load_and_run("back-to-school.plan.toml", &PlannerConfig::default());
    let json = serde_json::to_value(&result).unwrap();
    let rec = &json["analysis"]["recommendations"][0];
    assert_eq!(rec["offer"]["status"], "quoted");
    assert_eq!(rec["offer"]["unit_price"], "0.80");
    assert_eq!(json["analysis"]["split_supplier_total"], "6.00");
    assert_eq!(json["analysis"]["split_quantity"], "raw");
    assert!(matches!(
        result.analysis.unwrap().recommendations[1].offer,
        BestOffer::Quoted { quote_index: 0, .. }
    ));
}

// -------------------------------------------------------------------------
// Sub-cent prices and large demand
// -------------------------------------------------------------------------

fn load_inline(doc: &str) -> LoadedInput {
    PlanInput::from_toml(doc)
        .unwrap()
        .load(&PlannerConfig::default())
        .unwrap()
}

#[test]
fn per_sheet_prices_keep_their_fraction_of_a_cent() {
    let input = load_inline(
        r#"
[[lists]]
items = [ { name = "Papel sulfite", quantity = 1000 } ]

[[quotes]]
supplier_name = "A"
items = [ { item_name = "Papel sulfite", unit_price = "0.054" } ]

[[quotes]]
supplier_name = "B"
items = [ { item_name = "Papel sulfite", unit_price = 0.051 } ]
"#,
    );
    assert_eq!(input.quotes[0].total_value_cents, 5400);
    assert_eq!(input.quotes[1].total_value_cents, 5100);

    let result = run(&PlannerConfig::default(), &input.lists, &input.quotes);
    let a = result.analysis.unwrap();
    assert_eq!(a.recommendations[0].best_supplier, "B");
    assert_eq!(a.best_global_supplier, "B");
    assert_eq!(a.split_supplier_total_cents, 5100);

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["recommendations"][0]["offer"]["unit_price"], "0.051");
}

#[test]
fn ream_threshold_sees_prices_just_above_one() {
    let input = load_inline(
        r#"
[[lists]]
items = [ { name = "Papel A4", quantity = 750 } ]

[[quotes]]
supplier_name = "A"
items = [ { item_name = "Papel A4", unit_price = "1.004" } ]
"#,
    );
    // 2 reams at 1.004 each
    assert_eq!(input.quotes[0].total_value_cents, 201);
}

#[test]
fn demand_past_u32_runs_without_overflow() {
    let input = load_inline(
        r#"
[[lists]]
items = [ { name = "Lápis", quantity = 3000000000 } ]

[[lists]]
items = [ { name = "Lápis", quantity = 3000000000 } ]

[[quotes]]
supplier_name = "A"
items = [ { item_name = "Lápis", unit_price = "1.00" } ]

[[quotes]]
supplier_name = "B"
items = [ { item_name = "Lápis", unit_price = "922337203685477.00" } ]
"#,
    );
    let result = run(&PlannerConfig::default(), &input.lists, &input.quotes);
    assert_eq!(result.consolidated[0].total_quantity, 6_000_000_000);

    let a = result.analysis.unwrap();
    assert_eq!(a.supplier_totals[0].total_cents, 600_000_000_000);
    assert_eq!(a.supplier_totals[1].total_cents, i64::MAX);
    assert_eq!(a.best_global_supplier, "A");
    assert_eq!(result.plan[0].lines[0].quantity, Some(6_000_000_000));
}
