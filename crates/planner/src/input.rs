//! Input documents: source lists and quotes as written by hand or dumped
//! from the extraction service.
//!
//! ```toml
//! [[lists]]
//! title = "Ana (3º ano)"
//! items = [
//!   { name = "Lápis", quantity = 2, category = "escrita" },
//! ]
//!
//! [[quotes]]
//! supplier_name = "Papelaria Central"
//! date = "2027-01-12"
//! items = [ { item_name = "Lápis", unit_price = "0.80" } ]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::config::PlannerConfig;
use crate::consolidate::consolidate;
use crate::error::PlanError;
use crate::model::{Item, QuoteLine, SourceList, SupplierQuote};

/// Title given to a list extracted without one.
pub const UNTITLED_LIST: &str = "Lista sem nome";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanInput {
    #[serde(default)]
    pub lists: Vec<ListInput>,
    #[serde(default)]
    pub quotes: Vec<QuoteInput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteInput {
    #[serde(default)]
    pub id: Option<String>,
    pub supplier_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub items: Vec<QuoteLine>,
    /// Snapshot total; recomputed from the lists when absent.
    #[serde(default, with = "optional_decimal")]
    pub total_value: Option<i64>,
}

/// Lists and quotes ready for the engine.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub lists: Vec<SourceList>,
    pub quotes: Vec<SupplierQuote>,
}

impl PlanInput {
    pub fn from_toml(input: &str) -> Result<Self, PlanError> {
        toml::from_str(input).map_err(|e| PlanError::InputParse(e.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self, PlanError> {
        serde_json::from_str(input).map_err(|e| PlanError::InputParse(e.to_string()))
    }

    /// Parse by file extension: `.json` is JSON, anything else TOML.
    pub fn parse_for_path(path: &Path, input: &str) -> Result<Self, PlanError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(input),
            _ => Self::from_toml(input),
        }
    }

    pub fn read(path: &Path) -> Result<Self, PlanError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PlanError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::parse_for_path(path, &data)
    }

    /// Validate items, assign positional ids, fill in titles and snapshot
    /// totals for quotes that came without one.
    pub fn load(self, config: &PlannerConfig) -> Result<LoadedInput, PlanError> {
        let lists = self
            .lists
            .into_iter()
            .enumerate()
            .map(|(i, list)| list.into_source_list(i))
            .collect::<Result<Vec<_>, _>>()?;

        let entries = consolidate(&lists);

        let quotes = self
            .quotes
            .into_iter()
            .enumerate()
            .map(|(i, q)| {
                let total = q.total_value;
                let quote = SupplierQuote {
                    id: q.id.unwrap_or_else(|| format!("quote-{}", i + 1)),
                    supplier_name: q.supplier_name,
                    date: q.date,
                    items: q.items,
                    total_value_cents: total.unwrap_or(0),
                };
                match total {
                    Some(_) => quote,
                    None => quote.with_snapshot_total(&entries, &config.conversions),
                }
            })
            .collect();

        Ok(LoadedInput { lists, quotes })
    }
}

impl ListInput {
    pub fn into_source_list(self, position: usize) -> Result<SourceList, PlanError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED_LIST.to_string());

        validate_items(&title, &self.items)?;

        Ok(SourceList {
            id: self.id.unwrap_or_else(|| format!("list-{}", position + 1)),
            title,
            items: self.items,
        })
    }
}

/// Quantities must be positive and names non-blank.
pub fn validate_items(list_title: &str, items: &[Item]) -> Result<(), PlanError> {
    for (i, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(PlanError::InputParse(format!(
                "list '{list_title}', item {}: name is empty",
                i + 1
            )));
        }
        if item.quantity == 0 {
            return Err(PlanError::InputParse(format!(
                "list '{list_title}', item '{}': quantity must be positive",
                item.name
            )));
        }
    }
    Ok(())
}

mod optional_decimal {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "crate::money::decimal")] i64);

        Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(v)| v))
    }
}
