use std::collections::HashMap;

use tracing::debug;

use crate::model::{ConsolidatedEntry, SourceList};
use crate::normalize::normalize;

/// Merge every list's items into one demand table keyed by normalized name.
///
/// Walks lists then items in order. The first item seen for a key provides
/// the display name; later ones add their quantity and are appended to the
/// contributing items. Output keeps first-seen key order.
pub fn consolidate(lists: &[SourceList]) -> Vec<ConsolidatedEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<ConsolidatedEntry> = Vec::new();

    for list in lists {
        for item in &list.items {
            let key = normalize(&item.name);
            match index.get(&key) {
                Some(&pos) => {
                    let entry = &mut entries[pos];
                    entry.total_quantity = entry.total_quantity.saturating_add(u64::from(item.quantity));
                    entry.items.push(item.clone());
                }
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push(ConsolidatedEntry {
                        key,
                        display_name: item.name.clone(),
                        total_quantity: u64::from(item.quantity),
                        items: vec![item.clone()],
                    });
                }
            }
        }
    }

    debug!(lists = lists.len(), entries = entries.len(), "consolidated source lists");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    fn list(id: &str, items: &[(&str, u32)]) -> SourceList {
        SourceList {
            id: id.into(),
            title: format!("List {id}"),
            items: items.iter().map(|(n, q)| Item::new(*n, *q)).collect(),
        }
    }

    #[test]
    fn merges_by_normalized_name() {
        let lists = vec![list("a", &[("Caderno", 2)]), list("b", &[(" caderno ", 3)])];
        let entries = consolidate(&lists);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "caderno");
        assert_eq!(entries[0].display_name, "Caderno");
        assert_eq!(entries[0].total_quantity, 5);
        assert_eq!(entries[0].items.len(), 2);
        assert_eq!(entries[0].items[1].name, " caderno ");
    }

    #[test]
    fn first_seen_order_not_alphabetical() {
        let lists = vec![
            list("a", &[("Tesoura", 1), ("Borracha", 1)]),
            list("b", &[("Apontador", 1), ("tesoura", 1)]),
        ];
        let names: Vec<_> = consolidate(&lists)
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names, vec!["Tesoura", "Borracha", "Apontador"]);
    }

    #[test]
    fn display_name_from_first_occurrence() {
        let lists = vec![list("a", &[("LÁPIS", 1)]), list("b", &[("Lápis", 4)])];
        let entries = consolidate(&lists);
        assert_eq!(entries[0].display_name, "LÁPIS");
        assert_eq!(entries[0].total_quantity, 5);
    }

    #[test]
    fn duplicates_within_one_list_merge() {
        let entries = consolidate(&[list("a", &[("Cola", 1), ("COLA", 2)])]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_quantity, 3);
    }

    #[test]
    fn empty_iff_no_items() {
        assert!(consolidate(&[]).is_empty());
        assert!(consolidate(&[list("a", &[]), list("b", &[])]).is_empty());
        assert_eq!(consolidate(&[list("a", &[]), list("b", &[("Cola", 1)])]).len(), 1);
    }

    #[test]
    fn totals_past_u32_do_not_wrap() {
        let lists = vec![
            list("a", &[("Lápis", 3_000_000_000)]),
            list("b", &[("lápis", 3_000_000_000)]),
        ];
        let entries = consolidate(&lists);
        assert_eq!(entries[0].total_quantity, 6_000_000_000);
    }
}
