// Human-readable rendering. Plans and tables go to stdout, summaries to stderr.

use supplyplan_planner::compare::PriceMatrix;
use supplyplan_planner::model::{PlanResult, SourceList, SupplierQuote};
use supplyplan_planner::money::Money;

/// Display width, counting chars so accented names line up.
fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    let fill = w.saturating_sub(width(s));
    format!("{s}{}", " ".repeat(fill))
}

/// Per-store pick list.
pub fn print_plan(result: &PlanResult) {
    if result.plan.is_empty() {
        return;
    }

    let name_w = result
        .plan
        .iter()
        .flat_map(|g| g.lines.iter())
        .map(|l| width(&l.recommendation.item_name))
        .max()
        .unwrap_or(0);

    for (i, group) in result.plan.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}  {}", group.supplier, Money(group.subtotal_cents));
        for line in &group.lines {
            let qty = line.quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".into());
            println!(
                "  {}  {:>6} x {:>8}  {:>10}",
                pad(&line.recommendation.item_name, name_w),
                qty,
                line.recommendation.unit_price(),
                Money(line.cost_cents),
            );
        }
    }
}

pub fn print_summary(result: &PlanResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} entries from {} lists ({} items), {} quotes",
        result.meta.plan_name, s.entries, s.lists, s.items, s.quotes,
    );

    let Some(ref analysis) = result.analysis else {
        eprintln!("nothing to analyze: add at least one list and one quote");
        return;
    };

    eprintln!(
        "best single supplier: {} {}",
        analysis.best_global_supplier,
        Money(analysis.best_global_total_cents),
    );
    eprintln!(
        "split across stores: {} (savings {}, {} quantities)",
        Money(analysis.split_supplier_total_cents),
        Money(analysis.savings_cents()),
        analysis.split_quantity,
    );
    if s.unquoted_entries > 0 {
        eprintln!("{} entries have no quote", s.unquoted_entries);
    }
}

pub fn print_matrix(matrix: &PriceMatrix) {
    let name_w = matrix
        .rows
        .iter()
        .map(|r| width(&r.item_name))
        .chain(std::iter::once(width("Item")))
        .max()
        .unwrap_or(0);
    let col_w: Vec<usize> = matrix.suppliers.iter().map(|s| width(s).max(9)).collect();

    let mut header = format!("{}  {:>6}", pad("Item", name_w), "Qty");
    for (supplier, w) in matrix.suppliers.iter().zip(&col_w) {
        header.push_str(&format!("  {}", pad(supplier, *w)));
    }
    println!("{}", header.trim_end());

    for row in &matrix.rows {
        let mut line = format!("{}  {:>6}", pad(&row.item_name, name_w), row.total_quantity);
        for (i, (price, w)) in row.prices.iter().zip(&col_w).enumerate() {
            let cell = match price {
                Some(price) if row.best_quotes.contains(&i) => format!("*{price}"),
                Some(price) => price.to_string(),
                None => "-".to_string(),
            };
            line.push_str(&format!("  {}", pad(&cell, *w)));
        }
        println!("{}", line.trim_end());
    }
}

pub fn print_lists(lists: &[SourceList]) {
    for list in lists {
        let units: u64 = list.items.iter().map(|i| u64::from(i.quantity)).sum();
        println!("{}  {}  ({} items, {} units)", list.id, list.title, list.items.len(), units);
    }
}

pub fn print_quotes(quotes: &[SupplierQuote]) {
    for quote in quotes {
        let date = if quote.date.is_empty() { "-" } else { quote.date.as_str() };
        println!(
            "{}  {}  {}  ({} items, total {})",
            quote.id,
            quote.supplier_name,
            date,
            quote.items.len(),
            Money(quote.total_value_cents),
        );
    }
}
